use clap::Parser;
use control_hub_analysis::Network;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Random network generator for the control hub analysis.
///
/// Writes a directed network in the text format read by `control-hub`:
///
/// *Vertices <n>
/// <id> <name>        (one line per node)
/// *Edges
/// <src> <des>        (one line per arc)
///
/// Every ordered pair of distinct nodes becomes an arc independently with
/// probability `density`. Arcs may be duplicated to exercise parallel-edge
/// handling, and nodes are named `N1`, `N2`, ... unless `--unnamed` is given.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate random directed networks for control hub analysis"
)]
struct Args {
    /// Number of nodes
    #[arg(long)]
    nodes: usize,

    /// Probability of an arc between an ordered pair of nodes
    #[arg(long, default_value_t = 0.05)]
    density: f64,

    /// Probability that a generated arc is emitted twice
    #[arg(long, default_value_t = 0.0)]
    parallel_prob: f64,

    /// Allow arcs from a node to itself
    #[arg(long)]
    self_loops: bool,

    /// Leave nodes without names
    #[arg(long)]
    unnamed: bool,

    /// Random seed (if omitted, uses entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Output file path
    #[arg(long)]
    output: PathBuf,
}

/// Draw the arc list in row-major order
fn generate_arcs<R: Rng>(
    n: usize,
    density: f64,
    parallel_prob: f64,
    self_loops: bool,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    let mut arcs = Vec::new();
    for src in 1..=n {
        for des in 1..=n {
            if src == des && !self_loops {
                continue;
            }
            if rng.gen::<f64>() < density {
                arcs.push((src, des));
                if rng.gen::<f64>() < parallel_prob {
                    arcs.push((src, des));
                }
            }
        }
    }
    arcs
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    if args.nodes == 0 {
        eprintln!("Error: nodes must be positive.");
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&args.density) || !(0.0..=1.0).contains(&args.parallel_prob) {
        eprintln!("Error: density and parallel_prob must be in [0,1].");
        std::process::exit(1);
    }

    let mut rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let arcs = generate_arcs(
        args.nodes,
        args.density,
        args.parallel_prob,
        args.self_loops,
        &mut rng,
    );
    let names = if args.unnamed {
        Vec::new()
    } else {
        (1..=args.nodes).map(|v| Some(format!("N{}", v))).collect()
    };

    let network = match Network::with_names(args.nodes, arcs, names) {
        Ok(network) => network,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Generated network:");
    println!("  nodes = {}", network.num_nodes());
    println!("  arcs = {}", network.num_edges());
    println!("  density = {:.3}", args.density);
    println!("  parallel_prob = {:.3}", args.parallel_prob);
    println!("  self_loops = {}", args.self_loops);
    if let Some(seed) = args.seed {
        println!("  seed = {}", seed);
    }
    println!("  output file: {:?}", args.output);

    let mut writer = File::create(&args.output)?;
    writer.write_all(network.to_pajek().as_bytes())?;
    writer.flush()?;

    Ok(())
}
