//! Text renderings of analysis results and the writer that puts them on disk.

use crate::{Classification, ControlScheme, Error, Network, Result, Sensitivity};
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};

/// One `<id>: <role>` line per node.
pub fn node_types(classification: &Classification) -> String {
    classification
        .roles()
        .map(|(v, role)| format!("{}: {}\n", v, role))
        .collect()
}

pub fn control_scheme(scheme: &ControlScheme) -> String {
    format!(
        "maximum matching edgeID for scheme1:\n{}\nminimum driver node set for scheme1:\n{}\n",
        scheme.matched_edges.iter().join(" "),
        scheme.driver_nodes.iter().join(" "),
    )
}

pub fn sensitive_hubs(sensitivity: &Sensitivity) -> String {
    let hubs: String = sensitivity
        .sensitive
        .iter()
        .map(|hub| format!("{}\n", hub))
        .collect();
    format!("sensitive control hub id:\n{}", hubs)
}

/// Which hubs each edge removal costs, one edge per line.
pub fn sensitivity_by_edge(network: &Network, sensitivity: &Sensitivity) -> String {
    let lines: String = sensitivity
        .lost_by_edge
        .iter()
        .filter_map(|(&edge, hubs)| {
            network.edge(edge).map(|arc| {
                format!(
                    "edge {} ({}->{}): {}\n",
                    edge,
                    arc.src,
                    arc.des,
                    hubs.iter().join(" ")
                )
            })
        })
        .collect();
    format!("edge (src->des): lost control hubs\n{}", lines)
}

/// A rendered report and where it belongs.
#[derive(Debug, Clone)]
pub struct Report {
    pub path: PathBuf,
    pub contents: String,
}

impl Report {
    pub fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        Report {
            path: path.into(),
            contents,
        }
    }
}

/// Write `contents` to a sibling temporary file, then rename it over `path`.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).map_err(|e| Error::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| Error::io(path, e))
}

/// Write every report. Callers render all of them first, so nothing reaches
/// disk unless the whole analysis succeeded.
pub fn write_all(reports: &[Report]) -> Result<()> {
    reports
        .iter()
        .try_for_each(|r| write_atomic(&r.path, &r.contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify, find_scheme, find_sensitive_hubs, CancelFlag};

    fn chain() -> Network {
        Network::new(4, vec![(1, 2), (2, 3), (3, 4)]).unwrap()
    }

    #[test]
    fn node_type_report() {
        let c = classify(&Network::new(5, vec![(1, 2), (2, 3), (3, 4)]).unwrap());
        assert_eq!(
            node_types(&c),
            "1: head\n2: Control_hub\n3: Control_hub\n4: Tail\n5: Head,Tail\n"
        );
    }

    #[test]
    fn scheme_report() {
        let s = find_scheme(&chain());
        assert_eq!(
            control_scheme(&s),
            "maximum matching edgeID for scheme1:\n1 2 3\nminimum driver node set for scheme1:\n1\n"
        );
    }

    #[test]
    fn sensitivity_reports() {
        let g = chain();
        let s = find_sensitive_hubs(&g, &classify(&g), &CancelFlag::new()).unwrap();
        assert_eq!(sensitive_hubs(&s), "sensitive control hub id:\n2\n3\n");
        assert_eq!(
            sensitivity_by_edge(&g, &s),
            "edge (src->des): lost control hubs\n\
             edge 1 (1->2): 2\n\
             edge 2 (2->3): 2 3\n\
             edge 3 (3->4): 3\n"
        );
    }

    #[test]
    fn atomic_write_creates_directories() {
        let dir = std::env::temp_dir().join(format!("reports-{}", std::process::id()));
        let path = dir.join("nested").join("nodeType.txt");
        write_all(&[Report::new(&path, "1: head\n".to_string())]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1: head\n");
        assert!(!path.with_extension("txt.tmp").exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
