use clap::{Parser, Subcommand};
use control_hub_analysis::{
    adapter::{load_network, InputFormat},
    classification::classify_cancellable,
    report::{self, Report},
    scheme::find_scheme_cancellable,
    sensitivity::find_sensitive_hubs,
    validation::{self, Ollama, Validator},
    CancelFlag, Classification, Network,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Structural controllability profile of a directed network
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input network
    #[arg(short, long)]
    input: PathBuf,

    /// Input format: 'pajek' or 'petgraph-json'
    #[arg(short, long, default_value = "pajek")]
    format: InputFormat,

    /// Directory receiving the report files
    #[arg(short, long, default_value = "./result")]
    output_dir: PathBuf,

    /// Abort the analysis after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Worker threads for the sensitivity analysis (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// Label every node as head, Tail, Head,Tail or Control_hub
    Classify {
        #[arg(long, default_value = "nodeType.txt")]
        output: PathBuf,
    },

    /// Find a maximum matching and its minimum driver node set
    Scheme {
        #[arg(long, default_value = "find_schemes.txt")]
        output: PathBuf,
    },

    /// Find control hubs that lose their status when any single edge is removed
    Sensitive {
        #[arg(long, default_value = "sensitive_control_hub.txt")]
        output: PathBuf,

        /// Also write which hubs each edge removal costs
        #[arg(long)]
        by_edge: Option<PathBuf>,
    },

    /// Ask a local ollama model about every control hub
    Validate {
        #[arg(long, default_value = validation::DEFAULT_MODEL)]
        model: String,

        /// Prompt sent per hub; `{name}` is replaced by the hub's name
        #[arg(long, default_value = validation::DEFAULT_PROMPT)]
        prompt: String,

        #[arg(long, default_value = "control_hub_validation.txt")]
        output: PathBuf,
    },

    /// Classification, control scheme and sensitivity in one run
    All,

    /// Write the loaded network in `*Vertices` / `*Edges` text form
    Export { output: PathBuf },
}

/// Progress lines on stdout unless `--quiet`
struct Status {
    quiet: bool,
}

impl Status {
    fn line(&self, msg: impl std::fmt::Display) {
        if !self.quiet {
            println!("{}", msg);
        }
    }
}

fn classify_step(
    network: &Network,
    cancel: &CancelFlag,
    status: &Status,
) -> Result<Classification, control_hub_analysis::Error> {
    let start = Instant::now();
    let c = classify_cancellable(network, cancel)?;
    status.line(format!(
        "Classified nodes: {} head, {} tail, {} control hubs ({:.3}s)",
        c.head.len(),
        c.tail.len(),
        c.control_hub.len(),
        start.elapsed().as_secs_f64()
    ));
    Ok(c)
}

fn build_reports(
    args: &Args,
    network: &Network,
    cancel: &CancelFlag,
    status: &Status,
) -> Result<Vec<Report>, Box<dyn std::error::Error>> {
    let dir = &args.output_dir;
    let mut reports = Vec::new();

    let want_classify = matches!(args.task, Task::Classify { .. } | Task::All);
    let want_scheme = matches!(args.task, Task::Scheme { .. } | Task::All);
    let want_sensitive = matches!(args.task, Task::Sensitive { .. } | Task::All);

    if let Task::Export { output } = &args.task {
        reports.push(Report::new(output, network.to_pajek()));
        return Ok(reports);
    }

    if let Task::Validate {
        model,
        prompt,
        output,
    } = &args.task
    {
        let classification = classify_step(network, cancel, status)?;
        status.line(format!(
            "Querying model '{}' for {} control hubs...",
            model,
            classification.control_hub.len()
        ));
        let validator = Validator::new(
            Ollama {
                model: model.clone(),
            },
            prompt.as_str(),
        );
        let annotations = validator.annotate(network, &classification);
        reports.push(Report::new(dir.join(output), validation::render(&annotations)));
        return Ok(reports);
    }

    let classification = if want_classify || want_sensitive {
        Some(classify_step(network, cancel, status)?)
    } else {
        None
    };

    if let (true, Some(c)) = (want_classify, &classification) {
        let output = match &args.task {
            Task::Classify { output } => output.as_path(),
            _ => Path::new("nodeType.txt"),
        };
        reports.push(Report::new(dir.join(output), report::node_types(c)));
    }

    if want_scheme {
        let start = Instant::now();
        let scheme = find_scheme_cancellable(network, cancel)?;
        status.line(format!(
            "Control scheme: {} matched edges, {} driver nodes ({:.3}s)",
            scheme.matched_edges.len(),
            scheme.driver_nodes.len(),
            start.elapsed().as_secs_f64()
        ));
        let output = match &args.task {
            Task::Scheme { output } => output.as_path(),
            _ => Path::new("find_schemes.txt"),
        };
        reports.push(Report::new(dir.join(output), report::control_scheme(&scheme)));
    }

    if let (true, Some(c)) = (want_sensitive, &classification) {
        status.line(format!(
            "Reclassifying after each of {} edge removals...",
            network.num_edges()
        ));
        let start = Instant::now();
        let sensitivity = find_sensitive_hubs(network, c, cancel)?;
        status.line(format!(
            "Sensitive control hubs: {} ({:.3}s)",
            sensitivity.sensitive.len(),
            start.elapsed().as_secs_f64()
        ));
        let (output, by_edge) = match &args.task {
            Task::Sensitive { output, by_edge } => (output.as_path(), by_edge.as_deref()),
            _ => (Path::new("sensitive_control_hub.txt"), None),
        };
        reports.push(Report::new(
            dir.join(output),
            report::sensitive_hubs(&sensitivity),
        ));
        if let Some(path) = by_edge {
            reports.push(Report::new(
                dir.join(path),
                report::sensitivity_by_edge(network, &sensitivity),
            ));
        }
    }

    Ok(reports)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let status = Status { quiet: args.quiet };

    let network = load_network(&args.input, args.format)?;
    status.line(format!(
        "Network {:?}: {} nodes, {} edges",
        args.input,
        network.num_nodes(),
        network.num_edges()
    ));

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let cancel = CancelFlag::new();
    if let Some(secs) = args.timeout {
        cancel.cancel_after(Duration::from_secs(secs));
    }

    let start = Instant::now();
    let reports = build_reports(args, &network, &cancel, &status)?;
    report::write_all(&reports)?;

    for r in &reports {
        status.line(format!("Wrote {:?}", r.path));
    }
    status.line(format!(
        "Computation time: {:.3}s",
        start.elapsed().as_secs_f64()
    ));
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
