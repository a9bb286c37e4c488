use quickcheck::{quickcheck, Arbitrary, Gen, QuickCheck, TestResult};
use seqautomata::{
    hamming_distance, max_depth, validate_dot_bracket, Compiler, DfaRunner, EfaRunner,
    NfaRunner, PdaRunner, DFA, EFA, PDA,
};

/// A random pattern over a DNA alphabet, nested a few levels deep.
#[derive(Clone, Debug)]
struct Pattern(String);

impl Arbitrary for Pattern {
    fn arbitrary(g: &mut Gen) -> Pattern {
        Pattern(gen_pattern(g, 3))
    }
}

fn gen_pattern(g: &mut Gen, depth: usize) -> String {
    let pick = if depth == 0 { 0 } else { usize::arbitrary(g) % 6 };
    let depth = depth.saturating_sub(1);
    match pick {
        0 => g.choose(&["A", "C", "G", "T", ".", "[AC]", "[G-T]"]).unwrap().to_string(),
        1 => format!("{}{}", gen_pattern(g, depth), gen_pattern(g, depth)),
        2 => format!("({}|{})", gen_pattern(g, depth), gen_pattern(g, depth)),
        3 => format!("({})*", gen_pattern(g, depth)),
        4 => format!("({})+", gen_pattern(g, depth)),
        _ => format!("({})?", gen_pattern(g, depth)),
    }
}

/// A short random DNA string, possibly empty.
#[derive(Clone, Debug)]
struct Dna(String);

impl Arbitrary for Dna {
    fn arbitrary(g: &mut Gen) -> Dna {
        let len = usize::arbitrary(g) % 10;
        Dna((0..len).map(|_| *g.choose(&['A', 'C', 'G', 'T']).unwrap()).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Dna>> {
        Box::new(self.0.shrink().map(Dna))
    }
}

/// A short random RNA string, lowercase bases and the odd DNA `T` included.
#[derive(Clone, Debug)]
struct Rna(String);

impl Arbitrary for Rna {
    fn arbitrary(g: &mut Gen) -> Rna {
        let len = usize::arbitrary(g) % 12;
        Rna((0..len).map(|_| *g.choose(&['A', 'C', 'G', 'U', 'a', 'u', 'T']).unwrap()).collect())
    }
}

/// A random string of `(`, `)` and `.`.
#[derive(Clone, Debug)]
struct DotBracket(String);

impl Arbitrary for DotBracket {
    fn arbitrary(g: &mut Gen) -> DotBracket {
        let len = usize::arbitrary(g) % 16;
        DotBracket((0..len).map(|_| *g.choose(&['(', ')', '.']).unwrap()).collect())
    }
}

fn nfa_and_dfa_agree(pattern: Pattern, input: Dna) -> bool {
    let nfa = Compiler::new().compile_pattern(&pattern.0).unwrap();
    let dfa = DFA::from_nfa(&nfa);
    let by_nfa = NfaRunner::new(nfa, false).run(input.0.as_bytes());
    let by_dfa = DfaRunner::new(dfa, false).run(input.0.as_bytes());
    by_nfa.accepted == by_dfa.accepted && by_nfa.matches == by_dfa.matches
}

#[test]
fn prop_nfa_dfa_equivalence() {
    crate::init_logger();
    QuickCheck::new().tests(300).quickcheck(nfa_and_dfa_agree as fn(Pattern, Dna) -> bool);
}

fn zero_budget_is_exact(pattern: Pattern, input: Dna) -> bool {
    let exact = NfaRunner::new(Compiler::new().compile_pattern(&pattern.0).unwrap(), false);
    let approx = EfaRunner::new(EFA::new(&pattern.0, 0).unwrap(), false);
    let exact = exact.run(input.0.as_bytes());
    let approx = approx.run(input.0.as_bytes());
    exact.accepted == approx.accepted && exact.matches == approx.matches
}

#[test]
fn prop_zero_budget_matches_exactly() {
    QuickCheck::new().tests(300).quickcheck(zero_budget_is_exact as fn(Pattern, Dna) -> bool);
}

quickcheck! {
    fn prop_construction_is_deterministic(pattern: Pattern) -> bool {
        let first = Compiler::new().compile_pattern(&pattern.0).unwrap();
        let second = Compiler::new().compile_pattern(&pattern.0).unwrap();
        DFA::from_nfa(&first) == DFA::from_nfa(&second) && first == second
    }

    fn prop_runs_are_idempotent(pattern: Pattern, input: Dna, budget: u8) -> bool {
        let input = input.0.as_bytes();
        let nfa = Compiler::new().compile_pattern(&pattern.0).unwrap();
        let dfa = DfaRunner::new(DFA::from_nfa(&nfa), true);
        let nfa = NfaRunner::new(nfa, true);
        let efa = EfaRunner::new(EFA::new(&pattern.0, usize::from(budget % 3)).unwrap(), true);
        nfa.run(input) == nfa.run(input)
            && dfa.run(input) == dfa.run(input)
            && efa.run(input) == efa.run(input)
    }

    fn prop_structure_runs_are_idempotent(rna: Rna, s: DotBracket) -> bool {
        let sequence = rna.0.as_bytes();
        let structure: Vec<u8> = s.0.bytes().cycle().take(sequence.len()).collect();
        let depth = max_depth(&structure).max(max_depth(s.0.as_bytes()));
        let runner = PdaRunner::new(PDA::new(depth), true).with_structure(structure);
        let bracket_input = s.0.as_bytes();
        runner.run(sequence) == runner.run(sequence)
            && runner.run(bracket_input) == runner.run(bracket_input)
    }

    fn prop_pda_agrees_with_validator(s: DotBracket) -> bool {
        let bytes = s.0.as_bytes();
        let runner = PdaRunner::new(PDA::new(max_depth(bytes)), false);
        runner.run(bytes).accepted == validate_dot_bracket(bytes)
    }

    fn prop_literal_budget_is_hamming(pattern: Dna, input: Dna, budget: u8) -> TestResult {
        let k = usize::from(budget % 3);
        let efa = match EFA::new(&pattern.0, k) {
            Ok(efa) => efa,
            Err(_) => return TestResult::discard(),
        };
        let runner = EfaRunner::new(efa, false);
        let accepted = runner.run(input.0.as_bytes()).accepted;
        let expected = pattern.0.len() == input.0.len()
            && hamming_distance(pattern.0.as_bytes(), input.0.as_bytes()) <= k;
        TestResult::from_bool(accepted == expected)
    }
}
