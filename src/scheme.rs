use crate::matching::{Matcher, MatchOutcome, Orientation};
use crate::{CancelFlag, Network, Result};
use std::collections::BTreeSet;

/// One concrete way to control the network: a maximum matching expressed as
/// edge ids, and the driver nodes it leaves unmatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlScheme {
    pub matched_edges: BTreeSet<usize>,
    pub driver_nodes: BTreeSet<usize>,
}

/// Compute a control scheme from a destination-seeded maximum matching.
pub fn find_scheme(network: &Network) -> ControlScheme {
    let outcome = Matcher::new(network, Orientation::DestinationSeeded).finish();
    scheme_from(network, &outcome)
}

/// [`find_scheme`], checking `cancel` at every matching phase boundary.
pub fn find_scheme_cancellable(network: &Network, cancel: &CancelFlag) -> Result<ControlScheme> {
    let outcome = Matcher::new(network, Orientation::DestinationSeeded).run(cancel)?;
    Ok(scheme_from(network, &outcome))
}

fn scheme_from(network: &Network, outcome: &MatchOutcome) -> ControlScheme {
    let mut matched_edges = BTreeSet::new();
    let mut driver_nodes = BTreeSet::new();
    for des in network.nodes() {
        let Some(src) = outcome.state.src_of(des) else {
            driver_nodes.insert(des);
            continue;
        };
        // parallel arcs: the first one in input order stands for the pair
        let first = network
            .in_edges(des)
            .iter()
            .copied()
            .find(|&e| network.edge(e).is_some_and(|arc| arc.src == src));
        if let Some(edge) = first {
            matched_edges.insert(edge);
        }
    }
    ControlScheme {
        matched_edges,
        driver_nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn chain_scheme() {
        let g = Network::new(4, vec![(1, 2), (2, 3), (3, 4)]).unwrap();
        let scheme = find_scheme(&g);
        assert_eq!(scheme.matched_edges, BTreeSet::from([1, 2, 3]));
        assert_eq!(scheme.driver_nodes, BTreeSet::from([1]));
    }

    #[test]
    fn isolated_node_drives_itself() {
        let g = Network::new(1, vec![]).unwrap();
        let scheme = find_scheme(&g);
        assert!(scheme.matched_edges.is_empty());
        assert_eq!(scheme.driver_nodes, BTreeSet::from([1]));
    }

    #[test]
    fn parallel_arcs_report_first_edge() {
        let g = Network::new(2, vec![(2, 1), (1, 2), (1, 2)]).unwrap();
        let scheme = find_scheme(&g);
        assert_eq!(scheme.matched_edges, BTreeSet::from([1, 2]));
        assert!(scheme.driver_nodes.is_empty());
    }

    #[test]
    fn demo_network_from_adapter_example() {
        let g = Network::new(5, vec![(1, 2), (1, 4), (3, 2), (4, 3), (4, 5)]).unwrap();
        let scheme = find_scheme(&g);
        assert_eq!(scheme.driver_nodes.len(), 5 - scheme.matched_edges.len());
        assert_eq!(scheme.matched_edges.len(), 3);
        assert!(scheme.driver_nodes.contains(&1));
    }

    #[test]
    fn cancellable_matches_plain() {
        let g = Network::new(3, vec![(1, 2), (2, 3)]).unwrap();
        assert_eq!(
            find_scheme_cancellable(&g, &CancelFlag::new()).unwrap(),
            find_scheme(&g)
        );
    }

    fn arb_network() -> impl Strategy<Value = Network> {
        (1usize..10).prop_flat_map(|n| {
            prop::collection::vec((1..=n, 1..=n), 0..24)
                .prop_map(move |edges| Network::new(n, edges).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_driver_count(g in arb_network()) {
            let scheme = find_scheme(&g);
            prop_assert_eq!(scheme.driver_nodes.len(), g.num_nodes() - scheme.matched_edges.len());

            // matched edges form a matching: no shared source or destination
            let arcs: Vec<_> = scheme.matched_edges.iter().map(|&e| g.edge(e).unwrap()).collect();
            let srcs: BTreeSet<_> = arcs.iter().map(|a| a.src).collect();
            let dess: BTreeSet<_> = arcs.iter().map(|a| a.des).collect();
            prop_assert_eq!(srcs.len(), arcs.len());
            prop_assert_eq!(dess.len(), arcs.len());
            prop_assert!(dess.is_disjoint(&scheme.driver_nodes));
        }
    }
}
