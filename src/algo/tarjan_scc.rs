//! Strongly connected components.

use fixedbitset::FixedBitSet;

use crate::graph::{DiGraph, NodeIndex};

const UNVISITED: usize = usize::MAX;

/// Reusable state for computing strongly connected components with
/// Tarjan's algorithm.
///
/// Allocations survive between runs, so one value can decompose many
/// graphs.
#[derive(Debug, Default)]
pub struct TarjanScc {
    /// Next discovery time to hand out.
    clock: usize,
    /// Discovery time per node slot, `UNVISITED` before the first visit.
    discovery: Vec<usize>,
    /// Smallest discovery time reachable from the slot's subtree through
    /// nodes that are still open.
    low: Vec<usize>,
    /// Nodes whose component is not yet complete, in visit order.
    open: Vec<NodeIndex>,
    /// Membership mirror of `open`.
    on_open: FixedBitSet,
}

impl TarjanScc {
    /// Fresh state with no allocations yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decompose `g` into strongly connected components, calling `f` on
    /// each component as it completes.
    ///
    /// A component is complete only once everything reachable from it
    /// has been closed, so `f` sees the components in reverse
    /// topological order of the condensation. Node order inside a
    /// component carries no meaning.
    pub fn run<N, E, F>(&mut self, g: &DiGraph<N, E>, mut f: F)
    where
        F: FnMut(&[NodeIndex]),
    {
        let bound = g.node_bound();
        self.clock = 0;
        self.discovery.clear();
        self.discovery.resize(bound, UNVISITED);
        self.low.clear();
        self.low.resize(bound, UNVISITED);
        self.open.clear();
        self.on_open = FixedBitSet::with_capacity(bound);

        for a in g.node_indices() {
            if self.discovery[a.index()] == UNVISITED {
                self.explore(a, g, &mut f);
            }
        }

        debug_assert!(self.open.is_empty());
    }

    /// Depth-first walk from `v`.
    ///
    /// On return, `low[v]` is the smallest discovery time reachable from
    /// `v` without leaving the open stack; `v` heads a complete
    /// component exactly when that minimum is its own discovery time,
    /// and the component is then everything pushed at or after `v`.
    fn explore<N, E, F>(&mut self, v: NodeIndex, g: &DiGraph<N, E>, f: &mut F)
    where
        F: FnMut(&[NodeIndex]),
    {
        let slot = v.index();
        let opened_at = self.open.len();
        self.discovery[slot] = self.clock;
        self.low[slot] = self.clock;
        self.clock += 1;
        self.open.push(v);
        self.on_open.insert(slot);

        for w in g.successors(v) {
            if self.discovery[w.index()] == UNVISITED {
                self.explore(w, g, f);
                self.low[slot] = self.low[slot].min(self.low[w.index()]);
            } else if self.on_open.contains(w.index()) {
                // back or cross edge into the open region
                self.low[slot] = self.low[slot].min(self.discovery[w.index()]);
            }
        }

        if self.low[slot] == self.discovery[slot] {
            for w in &self.open[opened_at..] {
                self.on_open.set(w.index(), false);
            }
            f(&self.open[opened_at..]);
            self.open.truncate(opened_at);
        }
    }
}

/// Collect the strongly connected components of a directed graph.
///
/// Convenience front end for [`TarjanScc`]: the components are gathered
/// into vectors, in reverse topological order of the condensation.
///
/// Computes in **O(|V| + |E|)** time.
pub fn tarjan_scc<N, E>(g: &DiGraph<N, E>) -> Vec<Vec<NodeIndex>> {
    let mut sccs = Vec::new();
    {
        let mut tarjan = TarjanScc::new();
        tarjan.run(g, |scc| sccs.push(scc.to_vec()));
    }
    sccs
}
