use itertools::Itertools;

use lattices::context::Context;
use lattices::lattice::{complete_lattice, diagram_lattice, ConceptLattice};
use lattices::set::ComparableSet;

fn attrs(s: &str) -> ComparableSet<char> {
    s.chars().collect()
}

fn running_example() -> Context<u32, char> {
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

/// The edges of a lattice as sorted (source intent, target intent) pairs.
fn edge_intents(lattice: &ConceptLattice<char, u32>) -> Vec<(ComparableSet<char>, ComparableSet<char>)> {
    lattice
        .edge_indices()
        .filter_map(|e| {
            let (a, b) = lattice.edge_endpoints(e)?;
            Some((
                lattice[a].intent().cloned()?,
                lattice[b].intent().cloned()?,
            ))
        })
        .sorted()
        .collect()
}

#[test]
fn hasse_diagram_of_the_running_example() {
    let ctx = running_example();
    let lattice = ctx.concept_lattice();
    assert_eq!(lattice.concept_count(), 10);
    assert_eq!(lattice.edge_count(), 16);
    assert_eq!(lattice.height(), 4);

    let bottom = lattice.bottom().expect("non-empty lattice has a bottom");
    let top = lattice.top().expect("non-empty lattice has a top");
    assert_eq!(lattice[bottom].intent(), Some(&attrs("")));
    assert_eq!(lattice[top].intent(), Some(&attrs("abcde")));
    // exactly one source and one sink
    assert_eq!(lattice.sources().count(), 1);
    assert_eq!(lattice.sinks().count(), 1);

    // every node was completed to a full concept
    for (_, concept) in lattice.iter() {
        assert!(concept.has_intent() && concept.has_extent());
        assert!(ctx.is_concept(concept));
    }

    // spot-check a cover and a non-cover
    let b = lattice.find(&attrs("b")).unwrap();
    let bde = lattice.find(&attrs("bde")).unwrap();
    assert!(lattice.contains_edge(b, bde));
    assert!(!lattice.contains_edge(bottom, bde));
}

#[test]
fn diagram_equals_reduced_complete_lattice() {
    let ctx = running_example();
    let diagram = ctx.concept_lattice();

    let complete = ctx.complete_concept_lattice();
    assert_eq!(complete.concept_count(), 10);
    assert_eq!(complete.edge_count(), 25);

    let mut reduced = complete.into_inner();
    reduced.transitive_reduction();
    let reduced = ConceptLattice::from(reduced);

    assert_eq!(edge_intents(&diagram), edge_intents(&reduced));
}

#[test]
fn transposed_lattice_is_the_mirror() {
    let ctx = running_example();
    let lattice = ctx.concept_lattice();
    let transposed_lattice = ctx.transposed().concept_lattice();
    assert_eq!(
        lattice.concept_count(),
        transposed_lattice.concept_count()
    );

    let pairs: Vec<(ComparableSet<char>, ComparableSet<u32>)> = lattice
        .iter()
        .filter_map(|(_, c)| Some((c.intent().cloned()?, c.extent().cloned()?)))
        .sorted()
        .collect();
    let mirrored: Vec<(ComparableSet<char>, ComparableSet<u32>)> = transposed_lattice
        .iter()
        .filter_map(|(_, c)| Some((c.extent().cloned()?, c.intent().cloned()?)))
        .sorted()
        .collect();
    assert_eq!(pairs, mirrored);
}

#[test]
fn reduction_preserves_the_lattice_shape() {
    let mut ctx = running_example();
    // duplicate attribute: f has the same extent as e
    ctx.add_attribute('f');
    ctx.add_relation(&3, &'f');
    ctx.add_relation(&4, &'f');

    let before = ctx.concept_lattice();
    let removed = ctx.reduce_attributes();
    // f duplicates e; with f gone, d is the meet of b and e
    assert_eq!(removed.len(), 2);
    assert_eq!(removed.get(&'f'), Some(&ComparableSet::singleton('e')));
    assert_eq!(removed.get(&'d'), Some(&attrs("be")));

    let after = ctx.concept_lattice();
    assert_eq!(before.concept_count(), after.concept_count());
    assert_eq!(before.edge_count(), after.edge_count());
    assert_eq!(before.height(), after.height());
}

#[test]
fn builders_agree_for_an_implicational_system() {
    use lattices::implications::{ImplicationalSystem, Rule};

    let mut sys = ImplicationalSystem::new();
    sys.add_elements("abcd".chars());
    sys.add_rule(Rule::new(attrs("a"), attrs("b")));
    sys.add_rule(Rule::new(attrs("b"), attrs("c")));
    sys.add_rule(Rule::new(attrs("c"), attrs("d")));

    let diagram: ConceptLattice<char> = diagram_lattice(&sys);
    let complete: ConceptLattice<char> = complete_lattice(&sys);
    assert_eq!(diagram.concept_count(), 5);
    assert_eq!(complete.concept_count(), 5);
    // the closed sets form a chain, so its diagram is a path
    assert_eq!(diagram.edge_count(), 4);
    assert_eq!(complete.edge_count(), 10);
    assert_eq!(diagram.height(), 5);
}
