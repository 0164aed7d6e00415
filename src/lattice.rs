//! Concept lattices and the two ways of building them.
//!
//! [`complete_lattice`] materializes the full inclusion order between
//! closed sets; [`diagram_lattice`] builds the Hasse diagram (covering
//! relation) directly, without a reduction pass. Both orient edges from
//! smaller to larger intent, so the bottom concept (the closure of the
//! empty set) is the unique source and the closure of the ground set the
//! unique sink.

use std::collections::VecDeque;
use std::ops::Deref;

use hashbrown::HashMap;
use tracing::debug;

use crate::closure::{closures, ClosureSystem};
use crate::concept::Concept;
use crate::dag::Dag;
use crate::graph::{DiGraph, NodeIndex};
use crate::set::ComparableSet;

/// A lattice of concepts: a directed acyclic graph whose nodes are
/// [`Concept`]s and whose edges encode the order on intents.
///
/// Depending on the builder the edges are the covering relation (Hasse
/// diagram) or the full transitive order; in both cases an edge points
/// from the concept with the smaller intent to the one with the larger.
#[derive(Clone, Debug)]
pub struct ConceptLattice<A, O = A> {
    dag: Dag<Concept<A, O>, ()>,
}

impl<A: Ord + Clone, O: Ord + Clone> ConceptLattice<A, O> {
    /// Number of concepts in the lattice.
    pub fn concept_count(&self) -> usize {
        self.dag.node_count()
    }

    /// The bottom concept (smallest intent), if the lattice is not empty.
    pub fn bottom(&self) -> Option<NodeIndex> {
        self.dag.sources().next()
    }

    /// The top concept (largest intent), if the lattice is not empty.
    pub fn top(&self) -> Option<NodeIndex> {
        self.dag.sinks().next()
    }

    /// Find the concept whose intent is `intent`.
    pub fn find(&self, intent: &ComparableSet<A>) -> Option<NodeIndex> {
        self.dag
            .node_indices()
            .find(|&ix| self.dag[ix].intent() == Some(intent))
    }

    /// Iterate over the concepts with their node indices.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Concept<A, O>)> {
        self.dag.node_indices().map(move |ix| (ix, &self.dag[ix]))
    }

    /// Number of nodes on a longest bottom-to-top chain.
    ///
    /// The empty lattice has height 0, a single concept height 1.
    pub fn height(&self) -> usize {
        let order = self.dag.toposort();
        let mut longest = vec![0usize; self.dag.node_bound()];
        let mut height = 0;
        for &ix in &order {
            let from_below = self
                .dag
                .predecessors(ix)
                .map(|p| longest[p.index()])
                .max()
                .unwrap_or(0);
            longest[ix.index()] = from_below + 1;
            height = height.max(longest[ix.index()]);
        }
        height
    }

    /// Fill in the extent of every concept from its intent.
    ///
    /// The builders only know intents; a context completes the nodes to
    /// full concepts by supplying its derivation operator here.
    pub fn complete_extents<F>(&mut self, mut extent_of: F)
    where
        F: FnMut(&ComparableSet<A>) -> ComparableSet<O>,
    {
        let nodes: Vec<NodeIndex> = self.dag.node_indices().collect();
        for ix in nodes {
            let completed = match self.dag[ix].intent() {
                Some(intent) => {
                    let extent = extent_of(intent);
                    self.dag[ix].clone().with_extent(extent)
                }
                None => continue,
            };
            if let Some(weight) = self.dag.node_weight_mut(ix) {
                *weight = completed;
            }
        }
    }

    /// Consume the lattice and return the underlying graph.
    pub fn into_inner(self) -> Dag<Concept<A, O>, ()> {
        self.dag
    }
}

/// Wrap an acyclic graph of concepts back into a lattice, e.g. after
/// running graph algorithms on [`ConceptLattice::into_inner`].
impl<A, O> From<Dag<Concept<A, O>, ()>> for ConceptLattice<A, O> {
    fn from(dag: Dag<Concept<A, O>, ()>) -> Self {
        ConceptLattice { dag }
    }
}

impl<A, O> Deref for ConceptLattice<A, O> {
    type Target = Dag<Concept<A, O>, ()>;

    fn deref(&self) -> &Dag<Concept<A, O>, ()> {
        &self.dag
    }
}

/// Build the transitively closed concept lattice of `system`.
///
/// Every closed set becomes a concept node; an edge joins each pair of
/// concepts whose intents are in strict inclusion.
///
/// Computes in **O(c·|E|·T_cl + c²)** time for `c` concepts.
pub fn complete_lattice<S, O>(system: &S) -> ConceptLattice<S::Element, O>
where
    S: ClosureSystem,
    O: Ord + Clone,
{
    let closed: Vec<ComparableSet<S::Element>> = closures(system).collect();
    let mut graph = DiGraph::with_capacity(closed.len(), closed.len());
    let nodes: Vec<NodeIndex> = closed
        .iter()
        .map(|c| graph.add_node(Concept::Intent(c.clone())))
        .collect();
    for (i, small) in closed.iter().enumerate() {
        for (j, large) in closed.iter().enumerate() {
            if i != j && small.is_proper_subset(large) {
                graph.add_edge(nodes[i], nodes[j], ());
            }
        }
    }
    debug!(
        concepts = closed.len(),
        edges = graph.edge_count(),
        "complete lattice built"
    );
    ConceptLattice {
        dag: Dag::new_unchecked(graph),
    }
}

/// Build the Hasse diagram of the concept lattice of `system`.
///
/// Worklist construction from the bottom concept: for each concept `X`
/// the candidate successors are the closures `cl(X ∪ {e})` over the free
/// elements `e ∉ X`; the covers of `X` are the inclusion-minimal
/// candidates (every closed set strictly above `X` contains one of the
/// candidates, so a non-minimal candidate has another candidate strictly
/// between itself and `X`). One covering edge is added per cover and no
/// transitive shortcut is ever created.
///
/// Computes in **O(c·|E|·T_cl)** time for `c` concepts.
pub fn diagram_lattice<S, O>(system: &S) -> ConceptLattice<S::Element, O>
where
    S: ClosureSystem,
    O: Ord + Clone,
{
    let elements = system.elements();
    let mut graph = DiGraph::new();
    let mut seen: HashMap<ComparableSet<S::Element>, NodeIndex> = HashMap::new();

    let bottom = system.closure(&ComparableSet::new());
    let bottom_ix = graph.add_node(Concept::Intent(bottom.clone()));
    seen.insert(bottom.clone(), bottom_ix);

    let mut worklist = VecDeque::from([bottom]);
    while let Some(current) = worklist.pop_front() {
        let current_ix = seen[&current];

        // distinct closures over the free elements
        let mut candidates: Vec<ComparableSet<S::Element>> = Vec::new();
        for e in elements.iter() {
            if current.contains(e) {
                continue;
            }
            let mut seed = current.clone();
            seed.insert(e.clone());
            let candidate = system.closure(&seed);
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        // the covers are the inclusion-minimal candidates
        for i in 0..candidates.len() {
            let is_cover = candidates
                .iter()
                .enumerate()
                .all(|(j, other)| j == i || !other.is_proper_subset(&candidates[i]));
            if !is_cover {
                continue;
            }
            let cover = &candidates[i];
            let cover_ix = match seen.get(cover) {
                Some(&ix) => ix,
                None => {
                    let ix = graph.add_node(Concept::Intent(cover.clone()));
                    seen.insert(cover.clone(), ix);
                    worklist.push_back(cover.clone());
                    ix
                }
            };
            graph.add_edge(current_ix, cover_ix, ());
        }
    }

    debug!(
        concepts = graph.node_count(),
        edges = graph.edge_count(),
        "Hasse diagram built"
    );
    ConceptLattice {
        dag: Dag::new_unchecked(graph),
    }
}

#[cfg(test)]
mod tests {
    use super::{complete_lattice, diagram_lattice, ConceptLattice};
    use crate::closure::ClosureSystem;
    use crate::set::ComparableSet;

    /// Closure system of the down-sets of the chain 0 < 1 < 2.
    struct Chain(u8);

    impl ClosureSystem for Chain {
        type Element = u8;

        fn elements(&self) -> ComparableSet<u8> {
            (0..self.0).collect()
        }

        fn closure(&self, s: &ComparableSet<u8>) -> ComparableSet<u8> {
            match s.last() {
                Some(&m) => (0..=m).collect(),
                None => ComparableSet::new(),
            }
        }
    }

    #[test]
    fn chain_diagram_is_a_path() {
        let lattice: ConceptLattice<u8> = diagram_lattice(&Chain(3));
        assert_eq!(lattice.concept_count(), 4);
        assert_eq!(lattice.edge_count(), 3);
        assert_eq!(lattice.height(), 4);
        let bottom = lattice.bottom().unwrap();
        assert_eq!(lattice[bottom].intent(), Some(&ComparableSet::new()));
        let top = lattice.top().unwrap();
        assert_eq!(lattice[top].intent(), Some(&[0, 1, 2].into()));
    }

    #[test]
    fn chain_complete_lattice_is_transitive() {
        let lattice: ConceptLattice<u8> = complete_lattice(&Chain(3));
        assert_eq!(lattice.concept_count(), 4);
        // all 6 inclusion pairs are materialized
        assert_eq!(lattice.edge_count(), 6);
    }
}
