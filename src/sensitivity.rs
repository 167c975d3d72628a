use crate::classification::{classify_cancellable, Classification};
use crate::{CancelFlag, Network, Result};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Control hubs that lose their status when a single edge is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sensitivity {
    /// Union over all single-edge removals.
    pub sensitive: BTreeSet<usize>,
    /// Edge id -> hubs lost by removing it; edges that lose none are absent.
    pub lost_by_edge: BTreeMap<usize, BTreeSet<usize>>,
}

/// Reclassify `network` once per removed edge and collect every baseline
/// control hub that stops being one.
///
/// Removals are independent, so they run on the current rayon pool; each
/// task derives its own network and matcher state.
pub fn find_sensitive_hubs(
    network: &Network,
    baseline: &Classification,
    cancel: &CancelFlag,
) -> Result<Sensitivity> {
    let lost = (1..=network.num_edges())
        .into_par_iter()
        .map(|edge| -> Result<(usize, BTreeSet<usize>)> {
            let derived = network.without_edge(edge)?;
            let reclassified = classify_cancellable(&derived, cancel)?;
            let lost: BTreeSet<usize> = baseline
                .control_hub
                .difference(&reclassified.control_hub)
                .copied()
                .collect();
            Ok((edge, lost))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut result = Sensitivity::default();
    for (edge, hubs) in lost {
        if hubs.is_empty() {
            continue;
        }
        result.sensitive.extend(hubs.iter().copied());
        result.lost_by_edge.insert(edge, hubs);
    }
    Ok(result)
}
