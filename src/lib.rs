use std::ops::RangeInclusive;

/// A directed arc between two 1-indexed nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub src: usize,
    pub des: usize,
}

/// Represents a directed multigraph as an edge list with per-node incidence lists.
///
/// Nodes are numbered `1..=n` and edges `1..=m` in input order; `0` is never a
/// valid id for either. Parallel arcs are kept as distinct edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// Number of vertices
    n: usize,
    /// `edges[i]` holds edge id `i + 1`
    edges: Vec<Edge>,
    /// `names[v]` for `v` in `1..=n`, slot 0 unused
    names: Vec<Option<String>>,
    /// Edge ids where the node is the source, in input order
    out_edges: Vec<Vec<usize>>,
    /// Edge ids where the node is the destination, in input order
    in_edges: Vec<Vec<usize>>,
}

impl Network {
    pub fn new(n: usize, edges: Vec<(usize, usize)>) -> Result<Self> {
        Self::with_names(n, edges, Vec::new())
    }

    /// Build a network whose node `i + 1` is named `names[i]`.
    ///
    /// `names` may be shorter than `n`; missing entries are unnamed.
    pub fn with_names(
        n: usize,
        edges: Vec<(usize, usize)>,
        names: Vec<Option<String>>,
    ) -> Result<Self> {
        if names.len() > n {
            return Err(Error::format(format!(
                "{} node names given for {} vertices",
                names.len(),
                n
            )));
        }

        let mut out_edges = node_table(n, Vec::new())?;
        let mut in_edges = node_table(n, Vec::new())?;
        let mut arcs = Vec::with_capacity(edges.len());

        for (idx, (src, des)) in edges.into_iter().enumerate() {
            let id = idx + 1;
            for endpoint in [src, des] {
                if endpoint == 0 || endpoint > n {
                    return Err(Error::format(format!(
                        "edge {} ({} -> {}) has endpoint {} outside [1, {}]",
                        id, src, des, endpoint, n
                    )));
                }
            }
            out_edges[src].push(id);
            in_edges[des].push(id);
            arcs.push(Edge { src, des });
        }

        let mut slots = node_table(n, None)?;
        for (slot, name) in slots[1..].iter_mut().zip(names) {
            *slot = name;
        }

        Ok(Network {
            n,
            edges: arcs,
            names: slots,
            out_edges,
            in_edges,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.n
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> RangeInclusive<usize> {
        1..=self.n
    }

    /// Look up edge `id` (1-indexed).
    pub fn edge(&self, id: usize) -> Option<Edge> {
        id.checked_sub(1).and_then(|i| self.edges.get(i)).copied()
    }

    /// All edges paired with their ids, in input order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, Edge)> + '_ {
        self.edges.iter().enumerate().map(|(i, &e)| (i + 1, e))
    }

    /// Edge ids where `node` is the source.
    pub fn out_edges(&self, node: usize) -> &[usize] {
        self.out_edges.get(node).map_or(&[], Vec::as_slice)
    }

    /// Edge ids where `node` is the destination.
    pub fn in_edges(&self, node: usize) -> &[usize] {
        self.in_edges.get(node).map_or(&[], Vec::as_slice)
    }

    pub fn name(&self, node: usize) -> Option<&str> {
        self.names.get(node).and_then(|n| n.as_deref())
    }

    /// The node's name, or its id when it has none.
    pub fn display_name(&self, node: usize) -> String {
        match self.name(node) {
            Some(name) => name.to_string(),
            None => node.to_string(),
        }
    }

    /// Derive a network with edge `id` removed. Remaining edges keep their
    /// relative order and are renumbered densely.
    pub fn without_edge(&self, id: usize) -> Result<Network> {
        if self.edge(id).is_none() {
            return Err(Error::format(format!(
                "edge {} outside [1, {}]",
                id,
                self.num_edges()
            )));
        }
        let edges = self
            .edges()
            .filter(|&(e, _)| e != id)
            .map(|(_, arc)| (arc.src, arc.des))
            .collect();
        let names = self.names[1..].to_vec();
        Network::with_names(self.n, edges, names)
    }

    /// Render in the `*Vertices` / `*Edges` text format accepted by [`parser`].
    ///
    /// Names containing whitespace are double-quoted so they read back whole.
    pub fn to_pajek(&self) -> String {
        let vertices: String = self
            .nodes()
            .map(|v| match self.name(v) {
                Some(name) if name.contains(char::is_whitespace) => {
                    format!("{}\t\"{}\"\n", v, name)
                }
                Some(name) => format!("{}\t{}\n", v, name),
                None => format!("{}\n", v),
            })
            .collect();
        let arcs: String = self
            .edges()
            .map(|(_, arc)| format!("{}\t{}\n", arc.src, arc.des))
            .collect();
        format!("*Vertices {}\n{}*Edges\n{}", self.n, vertices, arcs)
    }
}

/// Per-node table indexed `0..=n`, slot 0 unused.
///
/// Fails instead of aborting when `n` is too large to address.
fn node_table<T: Clone>(n: usize, fill: T) -> Result<Vec<T>> {
    let too_large = || Error::format(format!("vertex count {} is too large", n));
    let len = n.checked_add(1).ok_or_else(too_large)?;
    let mut table = Vec::new();
    table.try_reserve_exact(len).map_err(|_| too_large())?;
    table.resize(len, fill);
    Ok(table)
}

// Module declarations
pub mod adapter;
pub mod cancel;
pub mod classification;
pub mod error;
pub mod matching;
pub mod parser;
pub mod report;
pub mod scheme;
pub mod sensitivity;
pub mod validation;

pub use cancel::CancelFlag;
pub use classification::{classify, Classification, NodeRole};
pub use error::{Error, Result};
pub use scheme::{find_scheme, ControlScheme};
pub use sensitivity::{find_sensitive_hubs, Sensitivity};
