//! Algorithms on [`DiGraph`]: topological sort, strongly connected
//! components, condensation, transitive reduction, reachability.

pub mod tarjan_scc;
pub mod tred;

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::error::Error;
use std::fmt;

use fixedbitset::FixedBitSet;

use crate::dag::Dag;
use crate::graph::{DiGraph, Incoming, NodeIndex};
use crate::set::ComparableSet;

pub use tarjan_scc::{tarjan_scc, TarjanScc};
pub use tred::transitive_reduction;

/// An algorithm error: a cycle was found in the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cycle<N>(pub(crate) N);

impl<N> Cycle<N> {
    /// Return a node id that participates in the cycle.
    pub fn node_id(&self) -> N
    where
        N: Copy,
    {
        self.0
    }
}

impl<N: fmt::Debug> fmt::Display for Cycle<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "the graph contains a cycle through {:?}", self.0)
    }
}

impl<N: fmt::Debug> Error for Cycle<N> {}

/// Perform a topological sort of a directed graph.
///
/// Returns a total order consistent with the edges: every node is ordered
/// before its successors. Whenever several nodes are ready at once, the
/// one with the smallest index is emitted first, so the order is
/// deterministic.
///
/// Returns `Err(Cycle)` if the graph is not acyclic; self loops count as
/// cycles.
///
/// Computes in **O(|V| log |V| + |E|)** time.
pub fn toposort<N, E>(g: &DiGraph<N, E>) -> Result<Vec<NodeIndex>, Cycle<NodeIndex>> {
    let mut indegree = vec![0usize; g.node_bound()];
    let mut ready: BinaryHeap<Reverse<NodeIndex>> = BinaryHeap::new();
    for a in g.node_indices() {
        let d = g.degree(a, Incoming);
        indegree[a.index()] = d;
        if d == 0 {
            ready.push(Reverse(a));
        }
    }

    let mut order = Vec::with_capacity(g.node_count());
    while let Some(Reverse(a)) = ready.pop() {
        order.push(a);
        for b in g.successors(a) {
            indegree[b.index()] -= 1;
            if indegree[b.index()] == 0 {
                ready.push(Reverse(b));
            }
        }
    }
    if order.len() == g.node_count() {
        return Ok(order);
    }

    // Some node was never released: walk backwards through the unreleased
    // region until a node repeats; that node lies on a cycle.
    let start = g
        .node_indices()
        .find(|a| indegree[a.index()] > 0)
        .expect("an unsorted node remains when the order is incomplete");
    let mut seen = FixedBitSet::with_capacity(g.node_bound());
    let mut current = start;
    loop {
        if seen.put(current.index()) {
            return Err(Cycle(current));
        }
        current = g
            .predecessors(current)
            .find(|p| indegree[p.index()] > 0)
            .expect("an unreleased node keeps an unreleased predecessor");
    }
}

/// Return `true` if the directed graph contains a cycle.
pub fn is_cyclic_directed<N, E>(g: &DiGraph<N, E>) -> bool {
    toposort(g).is_err()
}

/// Check if there exists a directed path starting at `from` and reaching
/// `to`. Returns `true` when `from` and `to` are equal.
///
/// Computes in **O(|V| + |E|)** time.
pub fn has_path_connecting<N, E>(g: &DiGraph<N, E>, from: NodeIndex, to: NodeIndex) -> bool {
    if from == to {
        return g.contains_node(from);
    }
    let mut visited = FixedBitSet::with_capacity(g.node_bound());
    let mut stack = vec![from];
    while let Some(a) = stack.pop() {
        if visited.put(a.index()) {
            continue;
        }
        for b in g.successors(a) {
            if b == to {
                return true;
            }
            stack.push(b);
        }
    }
    false
}

/// Condense every strongly connected component into a single node.
///
/// Each condensation node carries the ordered set of the original nodes'
/// content; edges between distinct components are kept (identical
/// parallel edges collapse). The result is acyclic by construction and is
/// returned as a [`Dag`].
///
/// Computes in **O(|V| + |E|)** time.
pub fn condensation<N, E>(g: &DiGraph<N, E>) -> Dag<ComparableSet<N>, ()>
where
    N: Ord + Clone,
{
    let sccs = tarjan_scc(g);
    let mut condensed = DiGraph::with_capacity(sccs.len(), g.edge_count());
    let mut component = vec![None; g.node_bound()];
    for comp in &sccs {
        let members: ComparableSet<N> = comp.iter().map(|&a| g[a].clone()).collect();
        let ix = condensed.add_node(members);
        for &a in comp {
            component[a.index()] = Some(ix);
        }
    }
    for e in g.edge_indices() {
        let (a, b) = match g.edge_endpoints(e) {
            Some(ends) => ends,
            None => continue,
        };
        if let (Some(ca), Some(cb)) = (component[a.index()], component[b.index()]) {
            if ca != cb {
                condensed.add_edge(ca, cb, ());
            }
        }
    }
    Dag::new_unchecked(condensed)
}

#[cfg(test)]
mod tests {
    use super::{condensation, has_path_connecting, is_cyclic_directed, toposort};
    use crate::graph::DiGraph;
    use crate::set::ComparableSet;

    #[test]
    fn toposort_breaks_ties_by_index() {
        let mut g: DiGraph<(), ()> = DiGraph::new();
        let a = g.add_node(());
        let b = g.add_node(());
        let c = g.add_node(());
        let d = g.add_node(());
        g.add_edge(c, a, ());
        g.add_edge(a, d, ());
        g.add_edge(b, d, ());
        // b and c are both ready at the start; b has the smaller index
        assert_eq!(toposort(&g).unwrap(), vec![b, c, a, d]);
    }

    #[test]
    fn toposort_detects_self_loop() {
        let mut g: DiGraph<(), ()> = DiGraph::new();
        let a = g.add_node(());
        g.add_edge(a, a, ());
        assert!(toposort(&g).is_err());
        assert!(is_cyclic_directed(&g));
    }

    #[test]
    fn path_connecting() {
        let mut g: DiGraph<(), ()> = DiGraph::new();
        let a = g.add_node(());
        let b = g.add_node(());
        let c = g.add_node(());
        g.add_edge(a, b, ());
        g.add_edge(b, c, ());
        assert!(has_path_connecting(&g, a, c));
        assert!(has_path_connecting(&g, a, a));
        assert!(!has_path_connecting(&g, c, a));
    }

    #[test]
    fn condensation_collapses_cycle() {
        // a -> b -> c -> a, with an exit edge b -> d
        let mut g = DiGraph::new();
        let a = g.add_node('a');
        let b = g.add_node('b');
        let c = g.add_node('c');
        let d = g.add_node('d');
        g.add_edge(a, b, ());
        g.add_edge(b, c, ());
        g.add_edge(c, a, ());
        g.add_edge(b, d, ());
        let cond = condensation(&g);
        assert_eq!(cond.node_count(), 2);
        assert_eq!(cond.edge_count(), 1);
        let cyclic: ComparableSet<char> = "abc".chars().collect();
        assert!(cond.node_indices().any(|ix| cond[ix] == cyclic));
        assert!(!is_cyclic_directed(cond.graph()));
    }
}
