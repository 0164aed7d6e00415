//! **lattices** computes formal concepts and closed-set lattices.
//!
//! A [`ClosureSystem`](closure::ClosureSystem) is a ground set with a
//! closure operator; the crate ships two concrete systems, a formal
//! [`Context`](context::Context) (a binary relation between observations
//! and attributes) and an
//! [`ImplicationalSystem`](implications::ImplicationalSystem) (production
//! rules closed by saturation), together with the algorithms shared by
//! all of them: lectic enumeration of the closed sets (Next-Closure),
//! Hasse-diagram construction of the concept lattice, and detection of
//! reducible elements through the precedence graph.
//!
//! The lattices are ordinary directed graphs: [`graph::DiGraph`] with its
//! algorithm suite (strongly connected components, condensation,
//! topological sort, transitive closure and reduction) is the substrate
//! the closure machinery builds on, and is usable on its own.
//!
//! ```
//! use lattices::context::Context;
//!
//! let mut ctx = Context::new();
//! ctx.add_observations(1..=2u32);
//! ctx.add_attributes("ab".chars());
//! ctx.add_relation(&1, &'a');
//! ctx.add_relation(&2, &'a');
//! ctx.add_relation(&2, &'b');
//!
//! let lattice = ctx.concept_lattice();
//! // every observation has `a`, so the closed intents are {a} and {a, b}
//! assert_eq!(lattice.concept_count(), 2);
//! ```
//!
//! Crate layout:
//!
//! * [`set`]: ordered element sets with the lectic order.
//! * [`graph`], [`dag`], [`algo`]: the directed-graph substrate.
//! * [`closure`]: the closure-system trait and its generic algorithms.
//! * [`context`], [`implications`]: the two concrete closure systems.
//! * [`concept`], [`lattice`]: concepts and the lattice builders.
//! * [`dot`], [`io`]: graphviz output, text formats and the serializer
//!   registry.

pub mod algo;
pub mod closure;
pub mod concept;
pub mod context;
pub mod dag;
pub mod dot;
pub mod graph;
pub mod implications;
pub mod io;
pub mod lattice;
pub mod set;

pub use crate::closure::ClosureSystem;
pub use crate::concept::Concept;
pub use crate::context::Context;
pub use crate::dag::Dag;
pub use crate::graph::{DiGraph, Direction, EdgeIndex, NodeIndex};
pub use crate::implications::{ImplicationalSystem, Rule};
pub use crate::lattice::ConceptLattice;
pub use crate::set::ComparableSet;

/// Commonly used items.
pub mod prelude {
    pub use crate::algo::{condensation, tarjan_scc, toposort, transitive_reduction};
    pub use crate::closure::{all_closures, closures, ClosureSystem};
    pub use crate::concept::Concept;
    pub use crate::context::Context;
    pub use crate::dag::Dag;
    pub use crate::graph::{DiGraph, Direction, EdgeIndex, NodeIndex};
    pub use crate::graph::Direction::{Incoming, Outgoing};
    pub use crate::implications::{ImplicationalSystem, Rule};
    pub use crate::lattice::{complete_lattice, diagram_lattice, ConceptLattice};
    pub use crate::set::ComparableSet;
}
