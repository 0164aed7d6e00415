//! Formal contexts: a binary relation between observations and
//! attributes, with bitset-accelerated derivation operators.

use std::hash::Hash;
use std::mem;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use indexmap::IndexMap;
use tracing::debug;

use crate::closure::{reducible_elements, ClosureSystem};
use crate::concept::Concept;
use crate::lattice::{complete_lattice, diagram_lattice, ConceptLattice};
use crate::set::ComparableSet;

/// A formal context `(O, A, I ⊆ O × A)`.
///
/// Next to the intent and extent maps the context mirrors the relation
/// into positional bitsets: `arr_o`/`arr_a` enumerate the observations
/// and attributes in ascending order, `bs_intent[i]` holds the attribute
/// positions of observation `arr_o[i]` and `bs_extent[j]` the observation
/// positions of attribute `arr_a[j]`. Every mutation restores the
/// agreement between maps, arrays and bitsets before returning, so the
/// derivation operators can always run on words instead of sets.
///
/// The closure operator of the context acts on attribute sets:
/// `cl(S) = intent(extent(S))`.
#[derive(Clone, Debug, Default)]
pub struct Context<O, A> {
    observations: ComparableSet<O>,
    attributes: ComparableSet<A>,
    intents: IndexMap<O, ComparableSet<A>>,
    extents: IndexMap<A, ComparableSet<O>>,
    arr_o: Vec<O>,
    arr_a: Vec<A>,
    pos_o: HashMap<O, usize>,
    pos_a: HashMap<A, usize>,
    bs_intent: Vec<FixedBitSet>,
    bs_extent: Vec<FixedBitSet>,
}

impl<O, A> Context<O, A>
where
    O: Ord + Clone + Hash,
    A: Ord + Clone + Hash,
{
    /// Create an empty context.
    pub fn new() -> Self {
        Context {
            observations: ComparableSet::new(),
            attributes: ComparableSet::new(),
            intents: IndexMap::new(),
            extents: IndexMap::new(),
            arr_o: Vec::new(),
            arr_a: Vec::new(),
            pos_o: HashMap::new(),
            pos_a: HashMap::new(),
            bs_intent: Vec::new(),
            bs_extent: Vec::new(),
        }
    }

    /// The observation set.
    pub fn observations(&self) -> &ComparableSet<O> {
        &self.observations
    }

    /// The attribute set.
    pub fn attributes(&self) -> &ComparableSet<A> {
        &self.attributes
    }

    /// Number of observations.
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// Number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Return `true` if `o` is a declared observation.
    pub fn contains_observation(&self, o: &O) -> bool {
        self.observations.contains(o)
    }

    /// Return `true` if `a` is a declared attribute.
    pub fn contains_attribute(&self, a: &A) -> bool {
        self.attributes.contains(a)
    }

    /// Return `true` if observation `o` carries attribute `a`.
    pub fn contains_relation(&self, o: &O, a: &A) -> bool {
        self.intents.get(o).map_or(false, |intent| intent.contains(a))
    }

    /// Declare an observation; return `false` if it already exists.
    pub fn add_observation(&mut self, o: O) -> bool {
        if !self.observations.insert(o.clone()) {
            return false;
        }
        self.intents.insert(o, ComparableSet::new());
        self.rebuild_bitsets();
        true
    }

    /// Declare an attribute; return `false` if it already exists.
    pub fn add_attribute(&mut self, a: A) -> bool {
        if !self.attributes.insert(a.clone()) {
            return false;
        }
        self.extents.insert(a, ComparableSet::new());
        self.rebuild_bitsets();
        true
    }

    /// Declare every observation of the iterator; return the number of
    /// new ones.
    pub fn add_observations<I: IntoIterator<Item = O>>(&mut self, iter: I) -> usize {
        let mut added = 0;
        for o in iter {
            if self.observations.insert(o.clone()) {
                self.intents.insert(o, ComparableSet::new());
                added += 1;
            }
        }
        if added > 0 {
            self.rebuild_bitsets();
        }
        added
    }

    /// Declare every attribute of the iterator; return the number of new
    /// ones.
    pub fn add_attributes<I: IntoIterator<Item = A>>(&mut self, iter: I) -> usize {
        let mut added = 0;
        for a in iter {
            if self.attributes.insert(a.clone()) {
                self.extents.insert(a, ComparableSet::new());
                added += 1;
            }
        }
        if added > 0 {
            self.rebuild_bitsets();
        }
        added
    }

    /// Remove an observation and purge it from every extent; return
    /// `false` if it was not declared.
    pub fn remove_observation(&mut self, o: &O) -> bool {
        if !self.observations.remove(o) {
            return false;
        }
        self.intents.shift_remove(o);
        for extent in self.extents.values_mut() {
            extent.remove(o);
        }
        self.rebuild_bitsets();
        true
    }

    /// Remove an attribute and purge it from every intent; return
    /// `false` if it was not declared.
    pub fn remove_attribute(&mut self, a: &A) -> bool {
        if !self.attributes.remove(a) {
            return false;
        }
        self.extents.shift_remove(a);
        for intent in self.intents.values_mut() {
            intent.remove(a);
        }
        self.rebuild_bitsets();
        true
    }

    /// Relate observation `o` to attribute `a`; return `false` if either
    /// is undeclared or the pair is already related.
    pub fn add_relation(&mut self, o: &O, a: &A) -> bool {
        if !self.observations.contains(o) || !self.attributes.contains(a) {
            return false;
        }
        let intent = self
            .intents
            .get_mut(o)
            .expect("declared observation has an intent entry");
        if !intent.insert(a.clone()) {
            return false;
        }
        self.extents
            .get_mut(a)
            .expect("declared attribute has an extent entry")
            .insert(o.clone());
        // positions are unchanged, only two bits flip
        let (po, pa) = (self.pos_o[o], self.pos_a[a]);
        self.bs_intent[po].insert(pa);
        self.bs_extent[pa].insert(po);
        true
    }

    /// Relate every `(o, a)` pair of the iterator; return the number of
    /// new relations.
    pub fn extend_relations<I: IntoIterator<Item = (O, A)>>(&mut self, iter: I) -> usize {
        iter.into_iter()
            .filter(|(o, a)| self.add_relation(o, a))
            .count()
    }

    /// Unrelate observation `o` from attribute `a`; return `false` if
    /// the pair was not related.
    pub fn remove_relation(&mut self, o: &O, a: &A) -> bool {
        let removed = self
            .intents
            .get_mut(o)
            .map_or(false, |intent| intent.remove(a));
        if !removed {
            return false;
        }
        self.extents
            .get_mut(a)
            .expect("relation endpoints are declared")
            .remove(o);
        let (po, pa) = (self.pos_o[o], self.pos_a[a]);
        self.bs_intent[po].set(pa, false);
        self.bs_extent[pa].set(po, false);
        true
    }

    /// The intent of a single observation; empty for an undeclared one.
    pub fn intent(&self, o: &O) -> ComparableSet<A> {
        self.intents.get(o).cloned().unwrap_or_default()
    }

    /// The extent of a single attribute; empty for an undeclared one.
    pub fn extent(&self, a: &A) -> ComparableSet<O> {
        self.extents.get(a).cloned().unwrap_or_default()
    }

    /// The attributes common to every observation of `set`.
    ///
    /// An undeclared observation in `set` yields the empty intent.
    pub fn intent_of(&self, set: &ComparableSet<O>) -> ComparableSet<A> {
        let bits = self.intent_bits(set);
        bits.ones().map(|j| self.arr_a[j].clone()).collect()
    }

    /// The observations carrying every attribute of `set`.
    ///
    /// An undeclared attribute in `set` yields the empty extent.
    pub fn extent_of(&self, set: &ComparableSet<A>) -> ComparableSet<O> {
        let bits = self.extent_bits(set);
        bits.ones().map(|i| self.arr_o[i].clone()).collect()
    }

    /// Cardinality of `intent_of(set)` without materializing the set.
    pub fn intent_size(&self, set: &ComparableSet<O>) -> usize {
        self.intent_bits(set).count_ones(..)
    }

    /// Cardinality of `extent_of(set)` without materializing the set.
    pub fn extent_size(&self, set: &ComparableSet<A>) -> usize {
        self.extent_bits(set).count_ones(..)
    }

    /// Return `true` if `concept` is a full concept of this context:
    /// both sides present, each the derivation of the other.
    pub fn is_concept(&self, concept: &Concept<A, O>) -> bool {
        match (concept.intent(), concept.extent()) {
            (Some(intent), Some(extent)) => {
                *extent == self.extent_of(intent) && *intent == self.intent_of(extent)
            }
            _ => false,
        }
    }

    /// Swap observations and attributes, turning every intent into an
    /// extent and vice versa. The storage is moved, not copied.
    pub fn transpose(self) -> Context<A, O> {
        Context {
            observations: self.attributes,
            attributes: self.observations,
            intents: self.extents,
            extents: self.intents,
            arr_o: self.arr_a,
            arr_a: self.arr_o,
            pos_o: self.pos_a,
            pos_a: self.pos_o,
            bs_intent: self.bs_extent,
            bs_extent: self.bs_intent,
        }
    }

    /// An independent transposed copy of this context.
    pub fn transposed(&self) -> Context<A, O> {
        self.clone().transpose()
    }

    /// Remove every reducible attribute.
    ///
    /// Returns the map from each removed attribute to an equivalent set
    /// of surviving attributes; the concept lattice is unchanged up to
    /// isomorphism.
    pub fn reduce_attributes(&mut self) -> IndexMap<A, ComparableSet<A>> {
        let removable = reducible_elements(&*self);
        for a in removable.keys() {
            self.remove_attribute(a);
        }
        debug!(removed = removable.len(), "attribute reduction finished");
        removable
    }

    /// Remove every reducible observation (attribute reduction on the
    /// transpose). Returns the corresponding equivalence map.
    pub fn reduce_observations(&mut self) -> IndexMap<O, ComparableSet<O>> {
        let ctx = mem::replace(self, Context::new());
        let mut transposed = ctx.transpose();
        let removed = transposed.reduce_attributes();
        *self = transposed.transpose();
        removed
    }

    /// Remove every reducible observation, then every reducible
    /// attribute; return both equivalence maps.
    #[allow(clippy::type_complexity)]
    pub fn reduce(
        &mut self,
    ) -> (
        IndexMap<O, ComparableSet<O>>,
        IndexMap<A, ComparableSet<A>>,
    ) {
        let observations = self.reduce_observations();
        let attributes = self.reduce_attributes();
        (observations, attributes)
    }

    /// Build the Hasse diagram of the concept lattice, every node a full
    /// concept.
    ///
    /// Edges run from smaller to larger intent; the bottom concept
    /// `cl(∅)` is the unique source of the diagram.
    pub fn concept_lattice(&self) -> ConceptLattice<A, O> {
        let mut lattice = diagram_lattice(self);
        lattice.complete_extents(|intent| self.extent_of(intent));
        lattice
    }

    /// Build the transitively closed concept lattice, every node a full
    /// concept. Edge direction is as in [`Context::concept_lattice`].
    pub fn complete_concept_lattice(&self) -> ConceptLattice<A, O> {
        let mut lattice = complete_lattice(self);
        lattice.complete_extents(|intent| self.extent_of(intent));
        lattice
    }

    /// AND of the intent rows selected by `set` (all ones when empty).
    fn intent_bits(&self, set: &ComparableSet<O>) -> FixedBitSet {
        let mut bits = FixedBitSet::with_capacity(self.arr_a.len());
        bits.insert_range(..);
        for o in set.iter() {
            match self.pos_o.get(o) {
                Some(&i) => bits.intersect_with(&self.bs_intent[i]),
                None => {
                    bits.clear();
                    break;
                }
            }
        }
        bits
    }

    /// AND of the extent columns selected by `set` (all ones when empty).
    fn extent_bits(&self, set: &ComparableSet<A>) -> FixedBitSet {
        let mut bits = FixedBitSet::with_capacity(self.arr_o.len());
        bits.insert_range(..);
        for a in set.iter() {
            match self.pos_a.get(a) {
                Some(&j) => bits.intersect_with(&self.bs_extent[j]),
                None => {
                    bits.clear();
                    break;
                }
            }
        }
        bits
    }

    /// Recompute the positional arrays and bitsets from the maps.
    fn rebuild_bitsets(&mut self) {
        self.arr_o = self.observations.iter().cloned().collect();
        self.arr_a = self.attributes.iter().cloned().collect();
        self.pos_o = self
            .arr_o
            .iter()
            .enumerate()
            .map(|(i, o)| (o.clone(), i))
            .collect();
        self.pos_a = self
            .arr_a
            .iter()
            .enumerate()
            .map(|(j, a)| (a.clone(), j))
            .collect();
        self.bs_intent = self
            .arr_o
            .iter()
            .map(|o| {
                let mut row = FixedBitSet::with_capacity(self.arr_a.len());
                if let Some(intent) = self.intents.get(o) {
                    for a in intent.iter() {
                        if let Some(&j) = self.pos_a.get(a) {
                            row.insert(j);
                        }
                    }
                }
                row
            })
            .collect();
        self.bs_extent = self
            .arr_a
            .iter()
            .map(|a| {
                let mut column = FixedBitSet::with_capacity(self.arr_o.len());
                if let Some(extent) = self.extents.get(a) {
                    for o in extent.iter() {
                        if let Some(&i) = self.pos_o.get(o) {
                            column.insert(i);
                        }
                    }
                }
                column
            })
            .collect();
    }
}

/// The closure system of a context acts on its attributes:
/// `cl(S) = intent(extent(S))`.
impl<O, A> ClosureSystem for Context<O, A>
where
    O: Ord + Clone + Hash,
    A: Ord + Clone + Hash,
{
    type Element = A;

    fn elements(&self) -> ComparableSet<A> {
        self.attributes.clone()
    }

    fn closure(&self, s: &ComparableSet<A>) -> ComparableSet<A> {
        let extent = self.extent_bits(s);
        let mut bits = FixedBitSet::with_capacity(self.arr_a.len());
        bits.insert_range(..);
        for i in extent.ones() {
            bits.intersect_with(&self.bs_intent[i]);
        }
        bits.ones().map(|j| self.arr_a[j].clone()).collect()
    }
}

/// Contexts are equal when they relate the same observations and
/// attributes the same way; the positional mirrors are derived data.
impl<O, A> PartialEq for Context<O, A>
where
    O: Ord + Clone + Hash,
    A: Ord + Clone + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.observations == other.observations
            && self.attributes == other.attributes
            && self
                .observations
                .iter()
                .all(|o| self.intents.get(o) == other.intents.get(o))
    }
}

impl<O, A> Eq for Context<O, A>
where
    O: Ord + Clone + Hash,
    A: Ord + Clone + Hash,
{
}

#[cfg(test)]
mod tests {
    use super::Context;
    use crate::closure::ClosureSystem;
    use crate::set::ComparableSet;

    fn attrs(s: &str) -> ComparableSet<char> {
        s.chars().collect()
    }

    /// O = {1..4}, A = {a..e} with the relation of the running example.
    fn sample() -> Context<u32, char> {
        let mut ctx = Context::new();
        ctx.add_observations(1..=4);
        ctx.add_attributes("abcde".chars());
        ctx.extend_relations([
            (1, 'a'),
            (1, 'c'),
            (2, 'a'),
            (2, 'b'),
            (3, 'b'),
            (3, 'd'),
            (3, 'e'),
            (4, 'c'),
            (4, 'e'),
        ]);
        ctx
    }

    #[test]
    fn mutations_report_ordinary_failures() {
        let mut ctx = sample();
        assert!(!ctx.add_observation(1));
        assert!(!ctx.add_attribute('a'));
        assert!(!ctx.add_relation(&1, &'a'));
        assert!(!ctx.add_relation(&9, &'a'));
        assert!(!ctx.add_relation(&1, &'z'));
        assert!(!ctx.remove_relation(&1, &'b'));
        assert!(!ctx.remove_observation(&9));
        assert!(!ctx.remove_attribute(&'z'));
    }

    #[test]
    fn derivation_operators() {
        let ctx = sample();
        assert_eq!(ctx.intent(&1), attrs("ac"));
        assert_eq!(ctx.extent(&'e'), [3, 4].into());
        assert_eq!(ctx.intent_of(&[1, 2].into()), attrs("a"));
        assert_eq!(ctx.extent_of(&attrs("be")), [3].into());
        assert_eq!(ctx.intent_size(&[1, 2].into()), 1);
        assert_eq!(ctx.extent_size(&attrs("be")), 1);
        // the empty set derives to everything
        assert_eq!(ctx.extent_of(&attrs("")), [1, 2, 3, 4].into());
        // unknown elements derive to nothing
        assert_eq!(ctx.extent_of(&attrs("z")), ComparableSet::new());
        assert_eq!(ctx.intent_of(&[9].into()), ComparableSet::new());
    }

    #[test]
    fn closure_is_double_prime() {
        let ctx = sample();
        assert_eq!(ctx.closure(&attrs("")), attrs(""));
        assert_eq!(ctx.closure(&attrs("b")), attrs("b"));
        assert_eq!(ctx.closure(&attrs("d")), attrs("bde"));
        assert_eq!(ctx.closure(&attrs("ab")), attrs("ab"));
        assert_eq!(ctx.closure(&attrs("ae")), attrs("abcde"));
    }

    #[test]
    fn removal_purges_relation() {
        let mut ctx = sample();
        assert!(ctx.remove_attribute(&'a'));
        assert_eq!(ctx.intent(&1), attrs("c"));
        assert_eq!(ctx.intent(&2), attrs("b"));
        assert!(ctx.remove_observation(&3));
        assert_eq!(ctx.extent(&'e'), [4].into());
        // bitsets follow the shrunken relation
        assert_eq!(ctx.closure(&attrs("c")), attrs("c"));
    }

    #[test]
    fn transpose_swaps_derivations() {
        let ctx = sample();
        let t = ctx.transposed();
        assert_eq!(t.intent(&'a'), [1, 2].into());
        assert_eq!(t.extent(&1), attrs("ac"));
        assert_eq!(t.transpose(), ctx);
    }
}
