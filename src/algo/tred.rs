//! Transitive reduction of directed acyclic graphs.
//!
//! An edge `u -> v` is redundant when some other path `u -> … -> v`
//! exists; the reduction removes every redundant edge and nothing else,
//! leaving the reachability relation intact. The reduction is only
//! well-defined on acyclic graphs.

use fixedbitset::FixedBitSet;

use super::{toposort, Cycle};
use crate::graph::{DiGraph, NodeIndex};

/// Remove every transitively redundant edge of an acyclic graph.
///
/// Returns the number of edges removed, or `Err(Cycle)` when the graph is
/// not acyclic.
///
/// Nodes are processed in reverse topological order while reachability
/// sets are accumulated per node (Habib, Morvan and Rampon); an edge to a
/// node already reachable through an earlier successor is a shortcut.
///
/// Computes in **O(|V|·|E| / w)** time with *w* the machine word size.
pub fn transitive_reduction<N, E>(g: &mut DiGraph<N, E>) -> Result<usize, Cycle<NodeIndex>> {
    let topo = toposort(g)?;
    Ok(reduce_in_order(g, &topo))
}

/// Reduction body, assuming `topo` is a valid topological order of `g`.
pub(crate) fn reduce_in_order<N, E>(g: &mut DiGraph<N, E>, topo: &[NodeIndex]) -> usize {
    let n = topo.len();
    let mut rank = vec![usize::MAX; g.node_bound()];
    for (i, &a) in topo.iter().enumerate() {
        rank[a.index()] = i;
    }

    // reach[i]: ranks reachable from the node of rank i, filled back to front
    let mut reach: Vec<FixedBitSet> = (0..n).map(|_| FixedBitSet::with_capacity(n)).collect();
    let mut removed = 0;
    for i in (0..n).rev() {
        let u = topo[i];
        let mut succ: Vec<NodeIndex> = g.successors(u).collect();
        succ.sort_by_key(|v| rank[v.index()]);

        let mut reach_u = FixedBitSet::with_capacity(n);
        for v in succ {
            let rv = rank[v.index()];
            if reach_u.contains(rv) {
                if let Some(e) = g.find_edge(u, v) {
                    g.remove_edge(e);
                    removed += 1;
                }
            } else {
                reach_u.insert(rv);
                reach_u.union_with(&reach[rv]);
            }
        }
        reach[i] = reach_u;
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::transitive_reduction;
    use crate::graph::DiGraph;

    #[test]
    fn triangle() {
        let mut g: DiGraph<(), ()> = DiGraph::new();
        let a = g.add_node(());
        let b = g.add_node(());
        let c = g.add_node(());
        g.add_edge(a, b, ());
        g.add_edge(a, c, ());
        g.add_edge(b, c, ());
        assert_eq!(transitive_reduction(&mut g), Ok(1));
        assert!(g.contains_edge(a, b));
        assert!(g.contains_edge(b, c));
        assert!(!g.contains_edge(a, c));
    }

    #[test]
    fn rejects_cycles() {
        let mut g: DiGraph<(), ()> = DiGraph::new();
        let a = g.add_node(());
        let b = g.add_node(());
        g.add_edge(a, b, ());
        g.add_edge(b, a, ());
        assert!(transitive_reduction(&mut g).is_err());
    }
}
