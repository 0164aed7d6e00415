#![cfg(feature = "quickcheck")]

extern crate quickcheck;

use itertools::Itertools;
use quickcheck::{Arbitrary, Gen};

use lattices::algo::{has_path_connecting, transitive_reduction};
use lattices::closure::{all_closures, ClosureSystem};
use lattices::context::Context;
use lattices::graph::{DiGraph, NodeIndex};
use lattices::lattice::ConceptLattice;
use lattices::set::ComparableSet;

/// A context with at most five observations and five attributes.
#[derive(Clone, Debug)]
struct SmallContext(Context<u8, u8>);

impl Arbitrary for SmallContext {
    fn arbitrary(g: &mut Gen) -> Self {
        let observations = u8::arbitrary(g) % 6;
        let attributes = u8::arbitrary(g) % 6;
        let mut ctx = Context::new();
        ctx.add_observations(0..observations);
        ctx.add_attributes(0..attributes);
        for o in 0..observations {
            for a in 0..attributes {
                if bool::arbitrary(g) {
                    ctx.add_relation(&o, &a);
                }
            }
        }
        SmallContext(ctx)
    }
}

/// Pick the subset of `elements` selected by the bits of `mask`.
fn subset_of(elements: &ComparableSet<u8>, mask: u32) -> ComparableSet<u8> {
    elements
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << (i % 32)) != 0)
        .map(|(_, e)| *e)
        .collect()
}

/// A directed graph on at most six nodes, cycles allowed.
#[derive(Clone, Debug)]
struct SmallDigraph(DiGraph<u8, ()>);

impl Arbitrary for SmallDigraph {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = usize::arbitrary(g) % 7;
        let mut graph = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i as u8)).collect();
        for &a in &nodes {
            for &b in &nodes {
                if a != b && bool::arbitrary(g) {
                    graph.add_edge(a, b, ());
                }
            }
        }
        SmallDigraph(graph)
    }
}

/// An acyclic graph: edges only run from smaller to larger index.
#[derive(Clone, Debug)]
struct SmallDag(DiGraph<u8, ()>);

impl Arbitrary for SmallDag {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = usize::arbitrary(g) % 7;
        let mut graph = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i as u8)).collect();
        for i in 0..n {
            for j in (i + 1)..n {
                if bool::arbitrary(g) {
                    graph.add_edge(nodes[i], nodes[j], ());
                }
            }
        }
        SmallDag(graph)
    }
}

#[test]
fn closure_is_extensive_monotone_idempotent() {
    fn prop(ctx: SmallContext, small_mask: u32, extra_mask: u32) -> bool {
        let ctx = ctx.0;
        let elements = ctx.elements();
        let small = subset_of(&elements, small_mask);
        let large = small.union(&subset_of(&elements, extra_mask));

        let closed = ctx.closure(&small);
        small.is_subset(&closed)
            && ctx.closure(&closed) == closed
            && ctx.closure(&small).is_subset(&ctx.closure(&large))
    }
    quickcheck::quickcheck(prop as fn(_, _, _) -> bool);
}

#[test]
fn closure_agrees_with_derivations() {
    fn prop(ctx: SmallContext, mask: u32) -> bool {
        let ctx = ctx.0;
        let s = subset_of(&ctx.elements(), mask);
        ctx.closure(&s) == ctx.intent_of(&ctx.extent_of(&s))
            && ctx.extent_of(&ctx.closure(&s)) == ctx.extent_of(&s)
    }
    quickcheck::quickcheck(prop as fn(_, _) -> bool);
}

#[test]
fn next_closure_enumerates_each_closed_set_once() {
    fn prop(ctx: SmallContext) -> bool {
        let ctx = ctx.0;
        let closed = all_closures(&ctx);

        // strictly increasing, hence duplicate-free
        let increasing = closed.windows(2).all(|w| w[0] < w[1]);

        // brute force over every subset of the attributes
        let elements = ctx.elements();
        let expected = (0u32..(1u32 << elements.len()))
            .map(|mask| ctx.closure(&subset_of(&elements, mask)))
            .sorted()
            .dedup()
            .count();

        increasing
            && closed.len() == expected
            && closed.iter().all(|s| &ctx.closure(s) == s)
    }
    quickcheck::quickcheck(prop as fn(_) -> bool);
}

#[test]
fn transitive_closure_edges_are_exactly_the_paths() {
    fn prop(g: SmallDigraph) -> bool {
        let original = g.0;
        let mut closed = original.clone();
        closed.transitive_closure();
        let nodes: Vec<NodeIndex> = original.node_indices().collect();
        for &a in &nodes {
            for &b in &nodes {
                // a non-trivial path: at least one edge out of a first
                let path = original
                    .successors(a)
                    .any(|s| s == b || has_path_connecting(&original, s, b));
                if closed.contains_edge(a, b) != path {
                    return false;
                }
            }
        }
        true
    }
    quickcheck::quickcheck(prop as fn(_) -> bool);
}

#[test]
fn transitive_reduction_preserves_reachability() {
    fn prop(g: SmallDag) -> bool {
        let original = g.0;
        let mut reduced = original.clone();
        if transitive_reduction(&mut reduced).is_err() {
            return false;
        }
        let nodes: Vec<NodeIndex> = original.node_indices().collect();
        for &a in &nodes {
            for &b in &nodes {
                if has_path_connecting(&original, a, b) != has_path_connecting(&reduced, a, b) {
                    return false;
                }
            }
        }
        true
    }
    quickcheck::quickcheck(prop as fn(_) -> bool);
}

#[test]
fn diagram_is_the_reduced_complete_lattice() {
    fn prop(ctx: SmallContext) -> bool {
        let ctx = ctx.0;
        let diagram = ctx.concept_lattice();

        let mut complete = ctx.complete_concept_lattice().into_inner();
        complete.transitive_reduction();
        let complete = ConceptLattice::from(complete);

        let edges = |lattice: &ConceptLattice<u8, u8>| {
            lattice
                .edge_indices()
                .filter_map(|e| {
                    let (a, b) = lattice.edge_endpoints(e)?;
                    Some((lattice[a].intent().cloned()?, lattice[b].intent().cloned()?))
                })
                .sorted()
                .collect::<Vec<_>>()
        };
        diagram.concept_count() == complete.concept_count() && edges(&diagram) == edges(&complete)
    }
    quickcheck::quickcheck(prop as fn(_) -> bool);
}

#[test]
fn transposing_mirrors_the_concepts() {
    fn prop(ctx: SmallContext) -> bool {
        let ctx = ctx.0;
        let lattice = ctx.concept_lattice();
        let mirrored = ctx.transposed().concept_lattice();

        let pairs: Vec<_> = lattice
            .iter()
            .filter_map(|(_, c)| Some((c.intent().cloned()?, c.extent().cloned()?)))
            .sorted()
            .collect();
        let swapped: Vec<_> = mirrored
            .iter()
            .filter_map(|(_, c)| Some((c.extent().cloned()?, c.intent().cloned()?)))
            .sorted()
            .collect();
        pairs == swapped
    }
    quickcheck::quickcheck(prop as fn(_) -> bool);
}

#[test]
fn reduction_preserves_the_number_of_concepts() {
    fn prop(ctx: SmallContext) -> bool {
        let mut ctx = ctx.0;
        let before = ctx.concept_lattice().concept_count();
        ctx.reduce();
        ctx.concept_lattice().concept_count() == before
    }
    quickcheck::quickcheck(prop as fn(_) -> bool);
}
