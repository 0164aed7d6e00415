//! Closure systems and the algorithms shared by all of them.
//!
//! A closure system is a ground set of elements together with a closure
//! operator. Everything else (lectic enumeration of the closed sets, the
//! precedence graph, reducible-element detection) is derived from those
//! two primitives and implemented here as free-standing generic
//! functions.

use std::hash::Hash;

use indexmap::IndexMap;
use tracing::debug;

use crate::algo::tarjan_scc;
use crate::graph::{DiGraph, NodeIndex};
use crate::set::ComparableSet;

/// A ground set with a closure operator.
///
/// Implementations must make `closure` *extensive* (`S ⊆ cl(S)`),
/// *monotone* (`S ⊆ T` implies `cl(S) ⊆ cl(T)`) and *idempotent*
/// (`cl(cl(S)) = cl(S)`); the enumeration and reduction algorithms rely
/// on all three.
pub trait ClosureSystem {
    /// The element type of the ground set.
    type Element: Ord + Clone + Hash;

    /// The ground set.
    fn elements(&self) -> ComparableSet<Self::Element>;

    /// The closure of `s`.
    fn closure(&self, s: &ComparableSet<Self::Element>) -> ComparableSet<Self::Element>;
}

/// Given a closed set, find the lectically next closed set.
///
/// Returns `None` when `current` is the lectically last closed set (the
/// closure of the whole ground set). This is the Next-Closure step of
/// Ganter: try each element in descending order as the pivot and keep
/// the first candidate whose new elements do not precede the pivot.
///
/// Computes in **O(|E|)** closure evaluations.
pub fn next_closure<S>(
    system: &S,
    current: &ComparableSet<S::Element>,
) -> Option<ComparableSet<S::Element>>
where
    S: ClosureSystem,
{
    let elements = system.elements();
    let mut x = current.clone();
    for e in elements.as_slice().iter().rev() {
        if x.contains(e) {
            x.remove(e);
            continue;
        }
        let mut seed = x.clone();
        seed.insert(e.clone());
        let y = system.closure(&seed);
        // the smallest element gained over x must not precede the pivot
        let gained_ok = y
            .iter()
            .find(|&c| !x.contains(c))
            .map_or(true, |smallest| *smallest >= *e);
        if gained_ok {
            return Some(y);
        }
    }
    None
}

/// Iterator over every closed set of a closure system, in strictly
/// increasing lectic order. See [`closures`].
pub struct Closures<'a, S: ClosureSystem> {
    system: &'a S,
    next: Option<ComparableSet<S::Element>>,
}

impl<'a, S: ClosureSystem> Iterator for Closures<'a, S> {
    type Item = ComparableSet<S::Element>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = next_closure(self.system, &current);
        Some(current)
    }
}

/// Enumerate every closed set of `system`, starting at the closure of
/// the empty set and ending at the closure of the ground set.
///
/// Each closed set is produced exactly once and the sequence is strictly
/// increasing in the lectic order; the number of closed sets can be
/// exponential in the size of the ground set.
pub fn closures<S: ClosureSystem>(system: &S) -> Closures<'_, S> {
    Closures {
        system,
        next: Some(system.closure(&ComparableSet::new())),
    }
}

/// Collect every closed set of `system` in lectic order.
pub fn all_closures<S: ClosureSystem>(system: &S) -> Vec<ComparableSet<S::Element>> {
    closures(system).collect()
}

/// Build the precedence graph of `system`.
///
/// Nodes carry the elements of the ground set; an edge `a -> b` exists
/// exactly when `a` belongs to the closure of `{b}` and `a ≠ b`, i.e.
/// when `b` cannot occur in a closed set without `a`.
pub fn precedence_graph<S>(system: &S) -> DiGraph<S::Element, ()>
where
    S: ClosureSystem,
{
    let elements = system.elements();
    let mut graph = DiGraph::with_capacity(elements.len(), 0);
    let indices: Vec<NodeIndex> = elements
        .iter()
        .map(|e| graph.add_node(e.clone()))
        .collect();
    for (j, b) in elements.iter().enumerate() {
        let implied = system.closure(&ComparableSet::singleton(b.clone()));
        for a in implied.iter() {
            if a == b {
                continue;
            }
            if let Some(i) = elements.position(a) {
                graph.add_edge(indices[i], indices[j], ());
            }
        }
    }
    graph
}

/// Detect the reducible elements of `system`.
///
/// Returns a map from each reducible element to an equivalent set of
/// surviving elements; removing the keys leaves the lattice of closed
/// sets unchanged up to isomorphism. Three families are reported:
///
/// 1. within each closure-equivalence class (a strongly connected
///    component of the precedence graph of size > 1), every element but
///    the smallest is equivalent to the singleton of that representative;
/// 2. an element implied by the empty set is equivalent to `∅`, checked
///    only when a single candidate remains after step 1;
/// 3. an element whose singleton closure equals the closure of its
///    remaining predecessors (two or more) is equivalent to that
///    predecessor set.
pub fn reducible_elements<S>(system: &S) -> IndexMap<S::Element, ComparableSet<S::Element>>
where
    S: ClosureSystem,
{
    let mut reducible = IndexMap::new();
    let mut graph = precedence_graph(system);

    // 1. collapse closure-equivalence classes onto their minimum
    for component in tarjan_scc(&graph) {
        if component.len() < 2 {
            continue;
        }
        let representative = component
            .iter()
            .copied()
            .min_by(|&x, &y| graph[x].cmp(&graph[y]))
            .expect("strongly connected component is non-empty");
        for ix in component {
            if ix == representative {
                continue;
            }
            let element = graph[ix].clone();
            reducible.insert(
                element,
                ComparableSet::singleton(graph[representative].clone()),
            );
            graph.remove_node(ix);
        }
    }

    // 2. a lone remaining node below every other element: if the empty
    //    set already implies it, it is equivalent to ∅
    let bottoms: Vec<NodeIndex> = graph.sources().collect();
    if bottoms.len() == 1 {
        let ix = bottoms[0];
        let empty_closure = system.closure(&ComparableSet::new());
        if empty_closure.contains(&graph[ix]) {
            reducible.insert(graph[ix].clone(), ComparableSet::new());
            graph.remove_node(ix);
        }
    }

    // 3. elements equivalent to the set of their surviving predecessors
    let survivors: Vec<NodeIndex> = graph.node_indices().collect();
    for x in survivors {
        let predecessors: ComparableSet<S::Element> =
            graph.predecessors(x).map(|p| graph[p].clone()).collect();
        if predecessors.len() < 2 {
            continue;
        }
        let own = system.closure(&ComparableSet::singleton(graph[x].clone()));
        if own == system.closure(&predecessors) {
            reducible.insert(graph[x].clone(), predecessors);
        }
    }

    debug!(
        reducible = reducible.len(),
        "reducible-element detection finished"
    );
    reducible
}
