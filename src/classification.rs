use crate::matching::{Matcher, Orientation};
use crate::{CancelFlag, Network, Result};
use std::collections::BTreeSet;
use std::fmt;

/// Structural role of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Head,
    Tail,
    HeadTail,
    ControlHub,
}

impl NodeRole {
    /// Label used in the node-type report.
    pub fn label(self) -> &'static str {
        match self {
            NodeRole::Head => "head",
            NodeRole::Tail => "Tail",
            NodeRole::HeadTail => "Head,Tail",
            NodeRole::ControlHub => "Control_hub",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Head, Tail and Control-hub sets of a network.
///
/// `control_hub` is always `[1, n] - (head ∪ tail)`; `head` and `tail` may
/// overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub num_nodes: usize,
    pub head: BTreeSet<usize>,
    pub tail: BTreeSet<usize>,
    pub control_hub: BTreeSet<usize>,
}

impl Classification {
    pub fn role(&self, node: usize) -> NodeRole {
        match (self.head.contains(&node), self.tail.contains(&node)) {
            (true, true) => NodeRole::HeadTail,
            (true, false) => NodeRole::Head,
            (false, true) => NodeRole::Tail,
            (false, false) => NodeRole::ControlHub,
        }
    }

    pub fn is_control_hub(&self, node: usize) -> bool {
        self.control_hub.contains(&node)
    }

    /// `(node, role)` for every node in ascending id order.
    pub fn roles(&self) -> impl Iterator<Item = (usize, NodeRole)> + '_ {
        (1..=self.num_nodes).map(|v| (v, self.role(v)))
    }
}

/// Classify every node of `network`.
pub fn classify(network: &Network) -> Classification {
    let tail = Matcher::new(network, Orientation::SourceSeeded)
        .finish()
        .worklist;
    let head = Matcher::new(network, Orientation::DestinationSeeded)
        .finish()
        .worklist;
    from_worklists(network.num_nodes(), head, tail)
}

/// [`classify`], checking `cancel` at every matching phase boundary.
pub fn classify_cancellable(network: &Network, cancel: &CancelFlag) -> Result<Classification> {
    let tail = Matcher::new(network, Orientation::SourceSeeded)
        .run(cancel)?
        .worklist;
    let head = Matcher::new(network, Orientation::DestinationSeeded)
        .run(cancel)?
        .worklist;
    Ok(from_worklists(network.num_nodes(), head, tail))
}

// Tail comes from the source-seeded run and Head from the destination-seeded
// one; each is the final BFS worklist of its run.
fn from_worklists(n: usize, head: Vec<usize>, tail: Vec<usize>) -> Classification {
    let head: BTreeSet<usize> = head.into_iter().collect();
    let tail: BTreeSet<usize> = tail.into_iter().collect();
    let control_hub = (1..=n)
        .filter(|v| !head.contains(v) && !tail.contains(v))
        .collect();
    Classification {
        num_nodes: n,
        head,
        tail,
        control_hub,
    }
}
