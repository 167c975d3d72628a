//! Loading networks from sources other than the text reader.

use crate::parser::parse_network_file;
use crate::{Error, Network, Result};
use std::path::Path;

/// Minimal view of an external directed graph.
///
/// Node ids are 1-indexed; every pair returned by [`GraphSource::edge_pairs`]
/// must lie in `[1, node_count]`.
pub trait GraphSource {
    fn node_count(&self) -> usize;

    /// `(src, des)` pairs in a stable order; the order defines edge ids.
    fn edge_pairs(&self) -> Vec<(usize, usize)>;

    fn node_name(&self, _id: usize) -> Option<String> {
        None
    }
}

impl Network {
    /// Build a network from any [`GraphSource`], validating it like the
    /// text reader does.
    pub fn from_source<G: GraphSource + ?Sized>(source: &G) -> Result<Network> {
        // Building the topology first rejects an unaddressable node count
        // before any per-node name lookup.
        let mut network = Network::new(source.node_count(), source.edge_pairs())?;
        for node in 1..=network.n {
            network.names[node] = source.node_name(node);
        }
        Ok(network)
    }
}

/// On-disk representation of an input network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// `*Vertices` / `*Edges` text
    #[default]
    Pajek,
    /// serde-JSON dump of a petgraph `DiGraph<String, ()>`
    PetgraphJson,
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pajek" | "net" => Ok(InputFormat::Pajek),
            "petgraph-json" | "json" => Ok(InputFormat::PetgraphJson),
            _ => Err(format!(
                "Invalid input format: {}. Use 'pajek' or 'petgraph-json'",
                s
            )),
        }
    }
}

/// Load a network from `path` in the given format.
pub fn load_network(path: &Path, format: InputFormat) -> Result<Network> {
    match format {
        InputFormat::Pajek => parse_network_file(path),
        InputFormat::PetgraphJson => load_petgraph_json(path),
    }
}

#[cfg(feature = "petgraph")]
fn load_petgraph_json(path: &Path) -> Result<Network> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let graph: petgraph::graph::DiGraph<String, ()> = serde_json::from_str(&content)
        .map_err(|e| Error::format(format!("invalid petgraph JSON: {}", e)))?;
    Network::from_source(&graph)
}

#[cfg(not(feature = "petgraph"))]
fn load_petgraph_json(_path: &Path) -> Result<Network> {
    Err(Error::Capability(
        "petgraph-json input requires the `petgraph` feature".to_string(),
    ))
}

#[cfg(feature = "petgraph")]
mod petgraph_source {
    use super::GraphSource;
    use petgraph::graph::{Graph, NodeIndex};
    use petgraph::visit::EdgeRef;
    use petgraph::Directed;
    use std::fmt::Display;

    /// petgraph node index `i` becomes node id `i + 1`; the node weight's
    /// `Display` output is its name.
    impl<N: Display, E> GraphSource for Graph<N, E, Directed> {
        fn node_count(&self) -> usize {
            Graph::node_count(self)
        }

        fn edge_pairs(&self) -> Vec<(usize, usize)> {
            self.edge_references()
                .map(|e| (e.source().index() + 1, e.target().index() + 1))
                .collect()
        }

        fn node_name(&self, id: usize) -> Option<String> {
            let weight = self.node_weight(NodeIndex::new(id.checked_sub(1)?))?;
            let name = weight.to_string();
            (!name.is_empty()).then_some(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Edge;

    struct Pairs(usize, Vec<(usize, usize)>);

    impl GraphSource for Pairs {
        fn node_count(&self) -> usize {
            self.0
        }

        fn edge_pairs(&self) -> Vec<(usize, usize)> {
            self.1.clone()
        }
    }

    #[test]
    fn from_custom_source() {
        let g = Network::from_source(&Pairs(3, vec![(1, 2), (3, 2)])).unwrap();
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.edge(2), Some(Edge { src: 3, des: 2 }));
        assert_eq!(g.name(1), None);
    }

    #[test]
    fn custom_source_is_validated() {
        assert!(matches!(
            Network::from_source(&Pairs(2, vec![(1, 3)])),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn oversized_source_is_rejected() {
        assert!(matches!(
            Network::from_source(&Pairs(usize::MAX, vec![])),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn input_format_from_str() {
        assert_eq!("Pajek".parse::<InputFormat>(), Ok(InputFormat::Pajek));
        assert_eq!(
            "petgraph-json".parse::<InputFormat>(),
            Ok(InputFormat::PetgraphJson)
        );
        assert!("graphml".parse::<InputFormat>().is_err());
    }

    #[cfg(not(feature = "petgraph"))]
    #[test]
    fn petgraph_json_needs_feature() {
        let err = load_network(Path::new("graph.json"), InputFormat::PetgraphJson).unwrap_err();
        assert!(matches!(err, Error::Capability(_)));
    }

    #[cfg(feature = "petgraph")]
    mod petgraph {
        use super::*;
        use ::petgraph::graph::DiGraph;

        fn demo_graph() -> DiGraph<String, ()> {
            let mut g = DiGraph::new();
            let names = ["A", "B", "C", "D", "E"];
            let idx: Vec<_> = names.iter().map(|n| g.add_node(n.to_string())).collect();
            for (s, d) in [(0, 1), (0, 3), (2, 1), (3, 2), (3, 4)] {
                g.add_edge(idx[s], idx[d], ());
            }
            g
        }

        #[test]
        fn from_digraph() {
            let g = Network::from_source(&demo_graph()).unwrap();
            assert_eq!(g.num_nodes(), 5);
            assert_eq!(g.num_edges(), 5);
            assert_eq!(g.edge(1), Some(Edge { src: 1, des: 2 }));
            assert_eq!(g.edge(5), Some(Edge { src: 4, des: 5 }));
            assert_eq!(g.name(3), Some("C"));
        }

        #[test]
        fn from_json_dump() {
            let json = serde_json::to_string(&demo_graph()).unwrap();
            let path = std::env::temp_dir().join(format!("petgraph-{}.json", std::process::id()));
            std::fs::write(&path, json).unwrap();
            let g = load_network(&path, InputFormat::PetgraphJson).unwrap();
            std::fs::remove_file(&path).unwrap();
            assert_eq!(g, Network::from_source(&demo_graph()).unwrap());
        }
    }
}
