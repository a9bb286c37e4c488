use crate::{
    dfa::DFA,
    efa::{EfaRunner, EFA},
    nfa::{StateId, NFA},
    pda::{PdaRunner, StructureReport, PDA},
    plan::AutomatonKind,
    stateset::{epsilon_closure, step},
};

/// One diagnostic event emitted by a runner when tracing is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    /// Input position the event refers to.
    pub index: usize,
    pub detail: String,
}

/// What every runner reports for one input.
///
/// `matches` holds half-open `[start, end)` intervals. They come out
/// grouped by ascending start because runners scan start offsets in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub accepted: bool,
    pub matches: Vec<(usize, usize)>,
    pub trace: Vec<TraceEvent>,
    pub states_visited: usize,
    /// Deepest stack reached. Only the PDA sets this.
    pub max_stack_depth: usize,
    /// Present only for secondary structure validation runs.
    pub structure: Option<StructureReport>,
}

/// A matcher that executes a Thompson NFA against input
#[derive(Debug, Clone)]
pub struct NfaRunner {
    nfa: NFA,
    trace: bool,
}

impl NfaRunner {
    pub fn new(nfa: NFA, trace: bool) -> NfaRunner {
        NfaRunner { nfa, trace }
    }

    pub fn nfa(&self) -> &NFA {
        &self.nfa
    }

    /// Simulates the NFA from every start offset, recording each interval
    /// that ends in an accepting state. The whole input is accepted when
    /// the scan from offset 0 is accepting at the last byte.
    pub fn run(&self, input: &[u8]) -> RunResult {
        let mut result = RunResult::default();
        let start_closure = epsilon_closure(&self.nfa, &[self.nfa.start]).into_vec();

        if input.is_empty() {
            if self.nfa.any_accepting(&start_closure) {
                result.accepted = true;
                result.matches.push((0, 0));
            }
            return result;
        }

        for start in 0..input.len() {
            let mut current: Vec<StateId> = start_closure.clone();
            for (pos, &byte) in input.iter().enumerate().skip(start) {
                let moved = step(&self.nfa, &current, byte);
                current = epsilon_closure(&self.nfa, moved.as_slice()).into_vec();
                result.states_visited += current.len();
                if self.trace {
                    result.trace.push(TraceEvent {
                        index: pos,
                        detail: format!("start={} pos={} states={}", start, pos, current.len()),
                    });
                }
                if current.is_empty() {
                    break;
                }
                if self.nfa.any_accepting(&current) {
                    result.matches.push((start, pos + 1));
                    if start == 0 && pos + 1 == input.len() {
                        result.accepted = true;
                    }
                }
            }
        }
        trace!(
            "NFA run over {} bytes: {} matches, accepted={}",
            input.len(),
            result.matches.len(),
            result.accepted
        );
        result
    }
}

/// Runs a fully tabulated DFA.
#[derive(Debug, Clone)]
pub struct DfaRunner {
    dfa: DFA,
    trace: bool,
}

impl DfaRunner {
    pub fn new(dfa: DFA, trace: bool) -> DfaRunner {
        DfaRunner { dfa, trace }
    }

    pub fn dfa(&self) -> &DFA {
        &self.dfa
    }

    /// Same contract as [`NfaRunner::run`], walking one table entry per
    /// byte until a missing transition ends the scan for that start.
    pub fn run(&self, input: &[u8]) -> RunResult {
        let mut result = RunResult::default();
        if self.dfa.is_empty() {
            return result;
        }
        if input.is_empty() {
            if self.dfa.is_accepting(self.dfa.start) {
                result.accepted = true;
                result.matches.push((0, 0));
            }
            return result;
        }

        for start in 0..input.len() {
            let mut state = self.dfa.start;
            for (pos, &byte) in input.iter().enumerate().skip(start) {
                result.states_visited += 1;
                let next = self.dfa.next_state(state, byte);
                if self.trace {
                    let next_text = next.map_or_else(|| "none".to_string(), |n| n.to_string());
                    result.trace.push(TraceEvent {
                        index: pos,
                        detail: format!(
                            "start={} pos={} state={} next={}",
                            start, pos, state, next_text
                        ),
                    });
                }
                state = match next {
                    Some(next) => next,
                    None => break,
                };
                if self.dfa.is_accepting(state) {
                    result.matches.push((start, pos + 1));
                    if start == 0 && pos + 1 == input.len() {
                        result.accepted = true;
                    }
                }
            }
        }
        trace!(
            "DFA run over {} bytes: {} matches, accepted={}",
            input.len(),
            result.matches.len(),
            result.accepted
        );
        result
    }
}

/// A borrowed view of the automaton a [`Runner`] owns, for inspection and
/// serialization.
#[derive(Debug, Clone, Copy)]
pub enum Automaton<'a> {
    Nfa(&'a NFA),
    Dfa(&'a DFA),
    Efa(&'a EFA),
    Pda(&'a PDA),
}

/// One runner per automaton family. Running never mutates the automaton,
/// so a built runner can be shared between threads.
#[derive(Debug, Clone)]
pub enum Runner {
    Nfa(NfaRunner),
    Dfa(DfaRunner),
    Efa(EfaRunner),
    Pda(PdaRunner),
}

impl Runner {
    pub fn run<I: AsRef<[u8]>>(&self, input: I) -> RunResult {
        let input = input.as_ref();
        match self {
            Runner::Nfa(runner) => runner.run(input),
            Runner::Dfa(runner) => runner.run(input),
            Runner::Efa(runner) => runner.run(input),
            Runner::Pda(runner) => runner.run(input),
        }
    }

    pub fn kind(&self) -> AutomatonKind {
        match self {
            Runner::Nfa(_) => AutomatonKind::Nfa,
            Runner::Dfa(_) => AutomatonKind::Dfa,
            Runner::Efa(_) => AutomatonKind::Efa,
            Runner::Pda(_) => AutomatonKind::Pda,
        }
    }

    pub fn automaton(&self) -> Automaton<'_> {
        match self {
            Runner::Nfa(runner) => Automaton::Nfa(runner.nfa()),
            Runner::Dfa(runner) => Automaton::Dfa(runner.dfa()),
            Runner::Efa(runner) => Automaton::Efa(runner.efa()),
            Runner::Pda(runner) => Automaton::Pda(runner.pda()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;

    fn nfa_runner(pattern: &str) -> NfaRunner {
        NfaRunner::new(Compiler::new().compile_pattern(pattern).unwrap(), false)
    }

    fn dfa_runner(pattern: &str) -> DfaRunner {
        let nfa = Compiler::new().compile_pattern(pattern).unwrap();
        DfaRunner::new(DFA::from_nfa(&nfa), false)
    }

    #[test]
    fn test_simple_match() {
        let result = nfa_runner("ACG").run(b"ACGTTACG");
        assert_eq!(result.matches, vec![(0, 3), (5, 8)]);
        assert!(!result.accepted);
    }

    #[test]
    fn test_whole_input_match() {
        let result = nfa_runner("AC*G").run(b"ACCCG");
        assert!(result.accepted);
        assert!(result.matches.contains(&(0, 5)));
    }

    #[test]
    fn test_dot_match() {
        let runner = nfa_runner(".");
        assert!(runner.run(b"a").accepted);
        assert!(runner.run(b"x").accepted);
        assert!(!runner.run(b"").accepted);
        assert!(!runner.run(b"ab").accepted);
    }

    #[test]
    fn dfa_agrees_on_intervals() {
        for pattern in ["ACG", "A(C|G)*T", "[AT]+", "G?C"] {
            for input in ["ACGTTACG", "ACCGT", "ATTA", "GCC", ""] {
                let nfa = nfa_runner(pattern).run(input.as_bytes());
                let dfa = dfa_runner(pattern).run(input.as_bytes());
                assert_eq!(nfa.accepted, dfa.accepted, "{} on {:?}", pattern, input);
                assert_eq!(nfa.matches, dfa.matches, "{} on {:?}", pattern, input);
            }
        }
    }

    #[test]
    fn dfa_trace_reports_missing_transition() {
        let nfa = Compiler::new().compile_pattern("AC").unwrap();
        let runner = DfaRunner::new(DFA::from_nfa(&nfa), true);
        let result = runner.run(b"AG");
        assert_eq!(result.trace[1].detail, "start=0 pos=1 state=1 next=none");
        assert_eq!(result.states_visited, 3);
    }

    #[test]
    fn empty_input() {
        assert_eq!(nfa_runner("A*").run(b"").matches, vec![(0, 0)]);
        assert_eq!(dfa_runner("A*").run(b"").matches, vec![(0, 0)]);
        assert!(!dfa_runner("A").run(b"").accepted);
    }
}
