//! Maximum matching between the source-role and destination-role copies of a
//! network's nodes.
//!
//! An arc `(s, d)` links source copy `s` to destination copy `d`. The matcher
//! alternates a global BFS layering from every unmatched node of the *seed*
//! side with a DFS that augments along layer-respecting paths, until a BFS
//! phase reaches no unmatched node on the far side. Incident arcs are always
//! explored in input order, so the result is deterministic.

use crate::{CancelFlag, Error, Network, Result};

/// Which side of the bipartite projection seeds the BFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Seeds are source-role nodes, walking arcs forwards.
    SourceSeeded,
    /// Seeds are destination-role nodes, walking arcs backwards.
    DestinationSeeded,
}

/// A matching between source-role and destination-role nodes.
///
/// Both vectors are indexed by node id with slot 0 unused; `0` as a value
/// means unmatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    matched_as_src: Vec<usize>,
    matched_as_des: Vec<usize>,
}

impl MatchState {
    /// Number of matched pairs.
    pub fn size(&self) -> usize {
        self.matched_as_src.iter().skip(1).filter(|&&d| d != 0).count()
    }

    /// Destination matched to source-role node `src`.
    pub fn des_of(&self, src: usize) -> Option<usize> {
        self.matched_as_src.get(src).copied().filter(|&d| d != 0)
    }

    /// Source matched to destination-role node `des`.
    pub fn src_of(&self, des: usize) -> Option<usize> {
        self.matched_as_des.get(des).copied().filter(|&s| s != 0)
    }

    /// Matched `(src, des)` pairs in ascending source order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.matched_as_src
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(_, &d)| d != 0)
            .map(|(s, &d)| (s, d))
    }

    pub fn unmatched_sources(&self) -> impl Iterator<Item = usize> + '_ {
        unmatched(&self.matched_as_src)
    }

    pub fn unmatched_destinations(&self) -> impl Iterator<Item = usize> + '_ {
        unmatched(&self.matched_as_des)
    }

    /// Whether the two directions of the matching agree with each other.
    pub fn is_consistent(&self) -> bool {
        let forward = self
            .pairs()
            .all(|(s, d)| self.matched_as_des.get(d) == Some(&s));
        let backward = self
            .matched_as_des
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(_, &s)| s != 0)
            .all(|(d, &s)| self.matched_as_src.get(s) == Some(&d));
        forward && backward
    }
}

fn unmatched(mates: &[usize]) -> impl Iterator<Item = usize> + '_ {
    mates
        .iter()
        .enumerate()
        .skip(1)
        .filter(|&(_, &m)| m == 0)
        .map(|(v, _)| v)
}

/// Result of running the matcher to completion.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub orientation: Orientation,
    pub state: MatchState,
    /// Worklist of the final BFS phase: every unmatched seed-side node, then
    /// the matched seed-side nodes reachable from them along alternating
    /// paths, in visiting order.
    pub worklist: Vec<usize>,
}

/// One level of the augmenting-path search.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    /// Next position in `node`'s incidence list
    cursor: usize,
    /// Far-side node this frame stepped to
    via: usize,
}

/// Scratch state for one matching run. Owned by a single invocation and
/// never shared, so independent runs can proceed on separate threads.
pub struct Matcher<'a> {
    network: &'a Network,
    orientation: Orientation,
    mate_seed: Vec<usize>,
    mate_far: Vec<usize>,
    dist_seed: Vec<usize>,
    dist_far: Vec<usize>,
    worklist: Vec<usize>,
    stack: Vec<Frame>,
}

impl<'a> Matcher<'a> {
    pub fn new(network: &'a Network, orientation: Orientation) -> Self {
        let slots = network.num_nodes() + 1;
        Matcher {
            network,
            orientation,
            mate_seed: vec![0; slots],
            mate_far: vec![0; slots],
            dist_seed: vec![0; slots],
            dist_far: vec![0; slots],
            worklist: Vec::with_capacity(slots),
            stack: Vec::new(),
        }
    }

    /// Incident arcs of a seed-side node.
    fn seed_edges(&self, node: usize) -> &'a [usize] {
        match self.orientation {
            Orientation::SourceSeeded => self.network.out_edges(node),
            Orientation::DestinationSeeded => self.network.in_edges(node),
        }
    }

    /// Far-side endpoint of an arc.
    fn far_end(&self, edge: usize) -> usize {
        let arc = self.network.edges[edge - 1];
        match self.orientation {
            Orientation::SourceSeeded => arc.des,
            Orientation::DestinationSeeded => arc.src,
        }
    }

    /// Layer the graph from all unmatched seed-side nodes. Returns whether an
    /// unmatched far-side node was reached.
    fn bfs(&mut self) -> bool {
        let mut found = false;
        self.worklist.clear();
        for v in self.network.nodes() {
            self.dist_seed[v] = 0;
            self.dist_far[v] = 0;
            if self.mate_seed[v] == 0 {
                self.worklist.push(v);
            }
        }

        let mut head = 0;
        while head < self.worklist.len() {
            let u = self.worklist[head];
            head += 1;
            for &edge in self.seed_edges(u) {
                let v = self.far_end(edge);
                if self.dist_far[v] != 0 {
                    continue;
                }
                self.dist_far[v] = self.dist_seed[u] + 1;
                let w = self.mate_far[v];
                if w == 0 {
                    found = true;
                } else if self.dist_seed[w] == 0 {
                    self.dist_seed[w] = self.dist_far[v] + 1;
                    self.worklist.push(w);
                }
            }
        }
        found
    }

    /// Search a layer-respecting augmenting path from `root` and flip it.
    ///
    /// Equivalent to the recursive formulation that tries each incident arc
    /// in order and recurses into the mate of every fresh far-side node, but
    /// keeps its frames on the heap so long alternating paths cannot exhaust
    /// the call stack.
    fn dfs(&mut self, root: usize) -> bool {
        self.stack.clear();
        self.stack.push(Frame {
            node: root,
            cursor: 0,
            via: 0,
        });

        while let Some(depth) = self.stack.len().checked_sub(1) {
            let u = self.stack[depth].node;
            let edges = self.seed_edges(u);
            let target = self.dist_seed[u] + 1;

            let mut next = None;
            while self.stack[depth].cursor < edges.len() {
                let v = self.far_end(edges[self.stack[depth].cursor]);
                self.stack[depth].cursor += 1;
                if self.dist_far[v] == target {
                    next = Some(v);
                    break;
                }
            }

            let Some(v) = next else {
                self.stack.pop();
                continue;
            };

            // visited: each far-side node is tried once per phase
            self.dist_far[v] = 0;
            self.stack[depth].via = v;
            let w = self.mate_far[v];
            if w == 0 {
                for frame in self.stack.drain(..) {
                    self.mate_seed[frame.node] = frame.via;
                    self.mate_far[frame.via] = frame.node;
                }
                return true;
            }
            self.stack.push(Frame {
                node: w,
                cursor: 0,
                via: 0,
            });
        }
        false
    }

    /// One BFS layering followed by a DFS from every unmatched seed-side
    /// node. Returns false once no augmenting path is left.
    fn phase(&mut self) -> bool {
        if !self.bfs() {
            return false;
        }
        for u in self.network.nodes() {
            if self.mate_seed[u] == 0 {
                self.dfs(u);
            }
        }
        true
    }

    /// Run phases until no augmenting path remains, checking `cancel` before
    /// each phase.
    pub fn run(mut self, cancel: &CancelFlag) -> Result<MatchOutcome> {
        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            if !self.phase() {
                return Ok(self.into_outcome());
            }
        }
    }

    /// Run phases until no augmenting path remains.
    pub fn finish(mut self) -> MatchOutcome {
        while self.phase() {}
        self.into_outcome()
    }

    fn into_outcome(self) -> MatchOutcome {
        let state = match self.orientation {
            Orientation::SourceSeeded => MatchState {
                matched_as_src: self.mate_seed,
                matched_as_des: self.mate_far,
            },
            Orientation::DestinationSeeded => MatchState {
                matched_as_src: self.mate_far,
                matched_as_des: self.mate_seed,
            },
        };
        MatchOutcome {
            orientation: self.orientation,
            state,
            worklist: self.worklist,
        }
    }
}

/// Compute a maximum matching in the given orientation.
pub fn maximum_matching(network: &Network, orientation: Orientation) -> MatchOutcome {
    Matcher::new(network, orientation).finish()
}
