use seqautomata::{BasePairCheck, PatternSpec, RunResult, StructureReport};

fn validate(sequence: &str, structure: &str) -> RunResult {
    crate::init_logger();
    PatternSpec::new("")
        .datasets([sequence])
        .structure(Some(structure.to_string()))
        .trace(true)
        .build()
        .unwrap()
        .run(sequence)
}

fn report(result: &RunResult) -> &StructureReport {
    result.structure.as_ref().unwrap()
}

#[test]
fn mismatched_bases_reject() {
    let result = validate("AUCG", "(..)");
    assert!(!result.accepted);
    assert!(result.matches.is_empty());
    assert!(report(&result).parentheses_valid);
    assert_eq!(
        report(&result).base_pairs,
        vec![BasePairCheck { open: 0, close: 3, open_base: b'A', close_base: b'G', valid: false }]
    );
}

#[test]
fn complementary_bases_accept() {
    let result = validate("AU", "()");
    assert!(result.accepted);
    assert_eq!(result.matches, vec![(0, 2)]);
    assert!(report(&result).base_pairs[0].valid);
    assert_eq!(result.trace.last().unwrap().detail, "pair=(0,1) bases=AU valid=true");
}

#[test]
fn lowercase_sequences_are_uppercased() {
    let result = validate("gcaugc", "((..))");
    assert!(result.accepted);
    let pairs = &report(&result).base_pairs;
    assert_eq!((pairs[0].open_base, pairs[0].close_base), (b'C', b'G'));
    assert_eq!((pairs[1].open_base, pairs[1].close_base), (b'G', b'C'));
}

#[test]
fn wobble_pairs_are_not_complementary() {
    let result = validate("GU", "()");
    assert!(!result.accepted);
    assert!(!report(&result).base_pairs[0].valid);
}

#[test]
fn dna_base_is_an_alphabet_error() {
    let result = validate("GATC", "(..)");
    assert!(!result.accepted);
    assert_eq!(report(&result).invalid_base, Some(1));
    assert!(report(&result).base_pairs.is_empty());
}

#[test]
fn unbalanced_structure_is_a_balance_error() {
    for structure in ["(()", "())", ")(."] {
        let result = validate("GGC", structure);
        assert!(!result.accepted, "{}", structure);
        assert_eq!(report(&result).invalid_base, None);
        assert!(!report(&result).parentheses_valid, "{}", structure);
    }
}

#[test]
fn every_pair_must_be_valid() {
    let result = validate("GAAUCCAUC", "((.)).(.)");
    assert!(!result.accepted);
    let valid: Vec<bool> = report(&result).base_pairs.iter().map(|p| p.valid).collect();
    assert_eq!(valid, vec![true, true, false]);
}

#[test]
fn unpaired_structure_accepts_any_rna() {
    let result = validate("ACGU", "....");
    assert!(result.accepted);
    assert_eq!(result.matches, vec![(0, 4)]);
    assert!(report(&result).base_pairs.is_empty());
}
