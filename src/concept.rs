//! Formal concepts: pairs of an attribute set and an observation set,
//! either side optionally absent.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::set::ComparableSet;

/// A concept over attribute type `A` and observation type `O`.
///
/// During lattice construction only the attribute side (the intent) is
/// known; completion fills in the observation side (the extent). The
/// variant records which sides are present.
///
/// Identity is derived from the present side: two concepts are equal when
/// both carry an intent and the intents are equal (`Full` and `Intent`
/// with the same intent are the same concept), or when neither carries an
/// intent and the extents are equal. Ordering between the two identity
/// kinds puts intent-identified concepts first; within a kind the lectic
/// order of the identity set applies.
#[derive(Clone, Debug)]
pub enum Concept<A, O = A> {
    /// Attribute side only.
    Intent(ComparableSet<A>),
    /// Observation side only.
    Extent(ComparableSet<O>),
    /// Both sides.
    Full {
        intent: ComparableSet<A>,
        extent: ComparableSet<O>,
    },
}

impl<A, O> Concept<A, O> {
    /// The attribute side, if present.
    pub fn intent(&self) -> Option<&ComparableSet<A>> {
        match self {
            Concept::Intent(intent) | Concept::Full { intent, .. } => Some(intent),
            Concept::Extent(_) => None,
        }
    }

    /// The observation side, if present.
    pub fn extent(&self) -> Option<&ComparableSet<O>> {
        match self {
            Concept::Extent(extent) | Concept::Full { extent, .. } => Some(extent),
            Concept::Intent(_) => None,
        }
    }

    /// Return `true` if the attribute side is present.
    pub fn has_intent(&self) -> bool {
        !matches!(self, Concept::Extent(_))
    }

    /// Return `true` if the observation side is present.
    pub fn has_extent(&self) -> bool {
        !matches!(self, Concept::Intent(_))
    }

    /// Attach an extent, completing an intent-only concept.
    ///
    /// An already-present extent is replaced; an extent-only concept is
    /// left unchanged aside from the new extent.
    pub fn with_extent(self, extent: ComparableSet<O>) -> Concept<A, O> {
        match self {
            Concept::Intent(intent) | Concept::Full { intent, .. } => {
                Concept::Full { intent, extent }
            }
            Concept::Extent(_) => Concept::Extent(extent),
        }
    }
}

impl<A: Ord, O: Ord> PartialEq for Concept<A, O> {
    fn eq(&self, other: &Self) -> bool {
        match (self.intent(), other.intent()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.extent() == other.extent(),
            _ => false,
        }
    }
}

impl<A: Ord, O: Ord> Eq for Concept<A, O> {}

impl<A: Ord + Hash, O: Ord + Hash> Hash for Concept<A, O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.intent() {
            Some(intent) => {
                0u8.hash(state);
                intent.hash(state);
            }
            None => {
                1u8.hash(state);
                self.extent().hash(state);
            }
        }
    }
}

impl<A: Ord, O: Ord> Ord for Concept<A, O> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.intent(), other.intent()) {
            (Some(a), Some(b)) => a.cmp(b),
            (None, None) => self.extent().cmp(&other.extent()),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
        }
    }
}

impl<A: Ord, O: Ord> PartialOrd for Concept<A, O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: fmt::Display, O: fmt::Display> fmt::Display for Concept<A, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Concept::Intent(intent) => write!(f, "{}", intent),
            Concept::Extent(extent) => write!(f, "{}", extent),
            Concept::Full { intent, extent } => write!(f, "{} : {}", intent, extent),
        }
    }
}
