//! A wrapper around [`DiGraph`] that enforces an acyclicity invariant.

use std::ops::Deref;

use fixedbitset::FixedBitSet;

use crate::algo::{has_path_connecting, toposort, tred, Cycle};
use crate::graph::{DiGraph, Direction, EdgeIndex, Incoming, NodeIndex, Outgoing};

/// A directed acyclic graph.
///
/// Wraps a [`DiGraph`] and exposes an API that cannot create cycles:
/// [`Dag::add_edge`] refuses self loops and edges closing a directed
/// cycle, reporting the refusal as an ordinary `None` result. All read
/// access of the underlying graph is available through `Deref`.
#[derive(Clone, Debug, Default)]
pub struct Dag<N, E> {
    graph: DiGraph<N, E>,
}

impl<N, E> Dag<N, E> {
    /// Create a new empty acyclic graph.
    pub fn new() -> Self {
        Dag {
            graph: DiGraph::new(),
        }
    }

    /// Wrap a graph that is known to be acyclic.
    ///
    /// Callers inside the crate use this when acyclicity holds by
    /// construction (condensations, cover diagrams, inclusion orders).
    pub(crate) fn new_unchecked(graph: DiGraph<N, E>) -> Self {
        debug_assert!(
            !crate::algo::is_cyclic_directed(&graph),
            "graph handed to Dag::new_unchecked contains a cycle"
        );
        Dag { graph }
    }

    /// Read access to the underlying graph.
    pub fn graph(&self) -> &DiGraph<N, E> {
        &self.graph
    }

    /// Consume the wrapper and return the underlying graph.
    pub fn into_inner(self) -> DiGraph<N, E> {
        self.graph
    }

    /// Add a node with content `weight`; return its index.
    pub fn add_node(&mut self, weight: N) -> NodeIndex {
        self.graph.add_node(weight)
    }

    /// Add an edge from `a` to `b` if doing so keeps the graph acyclic.
    ///
    /// Returns `None`, leaving the graph unchanged, for self loops, for
    /// edges that would close a cycle, and in the cases refused by
    /// [`DiGraph::add_edge`].
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, weight: E) -> Option<EdgeIndex>
    where
        E: PartialEq,
    {
        if a == b || has_path_connecting(&self.graph, b, a) {
            return None;
        }
        self.graph.add_edge(a, b, weight)
    }

    /// Remove edge `e`; return its content, or `None` if it was absent.
    pub fn remove_edge(&mut self, e: EdgeIndex) -> Option<E> {
        self.graph.remove_edge(e)
    }

    /// Remove node `a` and every incident edge; return its content.
    pub fn remove_node(&mut self, a: NodeIndex) -> Option<N> {
        self.graph.remove_node(a)
    }

    /// Access the content of node `a` mutably.
    ///
    /// Content changes cannot affect acyclicity.
    pub fn node_weight_mut(&mut self, a: NodeIndex) -> Option<&mut N> {
        self.graph.node_weight_mut(a)
    }

    /// A topological order of the nodes, smallest ready index first.
    pub fn toposort(&self) -> Vec<NodeIndex> {
        match toposort(&self.graph) {
            Ok(order) => order,
            Err(_) => unreachable!("acyclicity invariant of Dag is broken"),
        }
    }

    /// Remove every transitively redundant edge; return the count removed.
    pub fn transitive_reduction(&mut self) -> usize {
        let topo = self.toposort();
        tred::reduce_in_order(&mut self.graph, &topo)
    }

    fn reachable(&self, a: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut visited = FixedBitSet::with_capacity(self.graph.node_bound());
        let mut stack = vec![a];
        while let Some(x) = stack.pop() {
            if visited.put(x.index()) {
                continue;
            }
            stack.extend(self.graph.neighbors_directed(x, dir));
        }
        visited.ones().map(NodeIndex::new).collect()
    }
}

impl<N: Clone, E: Clone + PartialEq> Dag<N, E> {
    /// The filter of `a`: the induced subgraph on `a` and all of its
    /// descendants. Empty when `a` is not a node of the graph.
    pub fn filter(&self, a: NodeIndex) -> Dag<N, E> {
        if !self.graph.contains_node(a) {
            return Dag::new();
        }
        Dag::new_unchecked(self.graph.subgraph(&self.reachable(a, Outgoing)))
    }

    /// The ideal of `a`: the induced subgraph on `a` and all of its
    /// ancestors. Empty when `a` is not a node of the graph.
    pub fn ideal(&self, a: NodeIndex) -> Dag<N, E> {
        if !self.graph.contains_node(a) {
            return Dag::new();
        }
        Dag::new_unchecked(self.graph.subgraph(&self.reachable(a, Incoming)))
    }
}

impl<N, E> Deref for Dag<N, E> {
    type Target = DiGraph<N, E>;

    fn deref(&self) -> &DiGraph<N, E> {
        &self.graph
    }
}

impl<N, E> TryFrom<DiGraph<N, E>> for Dag<N, E> {
    type Error = Cycle<NodeIndex>;

    /// Wrap a graph, checking that it is acyclic.
    fn try_from(graph: DiGraph<N, E>) -> Result<Self, Cycle<NodeIndex>> {
        match toposort(&graph) {
            Ok(_) => Ok(Dag { graph }),
            Err(cycle) => Err(cycle),
        }
    }
}
