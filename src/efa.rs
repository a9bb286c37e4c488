//! Bounded-substitution matching on top of a Thompson NFA.
//!
//! Nothing new is materialized: the runner walks the NFA while carrying,
//! per state, the fewest substitutions spent to reach it. A state whose
//! cost would exceed the budget is dropped. Budget `k + 1` stands for
//! "unreachable".

use std::collections::VecDeque;

use crate::{
    compiler::Compiler,
    matcher::{RunResult, TraceEvent},
    nfa::NFA,
    parser, CompileError, CompileResult,
};

/// The largest usable budget. One above it still has to stand for
/// "unreachable", and no input can spend more substitutions anyway.
pub const MAX_BUDGET: usize = usize::MAX - 1;

/// An NFA paired with a mismatch budget. The pattern text is kept for
/// diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EFA {
    pub nfa: NFA,
    pub budget: usize,
    pub pattern: String,
}

impl EFA {
    /// Compiles `pattern` and attaches `budget`, clamped to [`MAX_BUDGET`].
    /// A pattern with no tokens (empty, blank or only empty groups) is
    /// rejected since there is nothing to count substitutions against.
    pub fn new(pattern: &str, budget: usize) -> CompileResult<EFA> {
        let postfix = parser::to_postfix(pattern)?;
        if postfix.is_empty() {
            return Err(CompileError::EmptyApproximatePattern);
        }
        let budget = budget.min(MAX_BUDGET);
        let nfa = Compiler::new().compile(&postfix)?;
        debug!("built EFA over {} NFA states with budget {}", nfa.len(), budget);
        Ok(EFA { nfa, budget, pattern: pattern.to_string() })
    }
}

/// Runs an [`EFA`] against inputs.
#[derive(Debug, Clone)]
pub struct EfaRunner {
    efa: EFA,
    trace: bool,
}

impl EfaRunner {
    pub fn new(efa: EFA, trace: bool) -> EfaRunner {
        EfaRunner { efa, trace }
    }

    pub fn efa(&self) -> &EFA {
        &self.efa
    }

    /// Tries every start offset with a fresh budget and records each
    /// `[start, end)` at which an accepting state is within budget.
    pub fn run(&self, input: &[u8]) -> RunResult {
        let mut result = RunResult::default();
        let nfa = &self.efa.nfa;
        let costs = Costs::new(nfa, self.efa.budget);
        if nfa.is_empty() {
            return result;
        }

        let mut start_costs = costs.unreachable_vec();
        start_costs[nfa.start] = 0;
        costs.relax(&mut start_costs);

        if input.is_empty() {
            if costs.any_accepting(&start_costs) {
                result.accepted = true;
                result.matches.push((0, 0));
            }
            return result;
        }
        if costs.active(&start_costs) == 0 {
            return result;
        }

        for start in 0..input.len() {
            let mut current = start_costs.clone();
            for (pos, &byte) in input.iter().enumerate().skip(start) {
                current = costs.advance(&current, byte);
                let active = costs.active(&current);
                if active == 0 {
                    break;
                }
                result.states_visited += active;
                if self.trace {
                    let mut detail = format!("start={} pos={} states={}", start, pos, active);
                    if let Some(best) = costs.best(&current) {
                        detail.push_str(&format!(" bestMismatch={}", best));
                    }
                    result.trace.push(TraceEvent { index: pos, detail });
                }
                if costs.any_accepting(&current) {
                    result.matches.push((start, pos + 1));
                    if start == 0 && pos + 1 == input.len() {
                        result.accepted = true;
                    }
                }
            }
        }
        trace!(
            "EFA run over {} bytes: {} matches, accepted={}",
            input.len(),
            result.matches.len(),
            result.accepted
        );
        result
    }
}

/// Cost bookkeeping for one NFA and budget.
struct Costs<'a> {
    nfa: &'a NFA,
    budget: usize,
}

impl<'a> Costs<'a> {
    fn new(nfa: &'a NFA, budget: usize) -> Costs<'a> {
        Costs { nfa, budget: budget.min(MAX_BUDGET) }
    }

    fn unreachable(&self) -> usize {
        self.budget + 1
    }

    fn unreachable_vec(&self) -> Vec<usize> {
        vec![self.unreachable(); self.nfa.len()]
    }

    /// Lowers costs along epsilon edges until nothing changes. Costs only
    /// ever decrease, so the worklist drains.
    fn relax(&self, costs: &mut [usize]) {
        let mut queue = VecDeque::new();
        let mut queued = vec![false; costs.len()];
        for (state, &cost) in costs.iter().enumerate() {
            if cost <= self.budget {
                queue.push_back(state);
                queued[state] = true;
            }
        }
        while let Some(state) = queue.pop_front() {
            queued[state] = false;
            let cost = costs[state];
            for edge in self.nfa.edges(state) {
                if edge.kind.consumes() || cost >= costs[edge.target] {
                    continue;
                }
                costs[edge.target] = cost;
                if !queued[edge.target] {
                    queue.push_back(edge.target);
                    queued[edge.target] = true;
                }
            }
        }
    }

    /// Consumes `byte` from every in-budget state. A matching edge is free,
    /// any other consuming edge costs one substitution.
    fn advance(&self, current: &[usize], byte: u8) -> Vec<usize> {
        let mut next = self.unreachable_vec();
        for (state, &cost) in current.iter().enumerate() {
            if cost > self.budget {
                continue;
            }
            for edge in self.nfa.edges(state) {
                if !edge.kind.consumes() {
                    continue;
                }
                let new_cost = if edge.kind.matches(byte) { cost } else { cost + 1 };
                if new_cost > self.budget || new_cost >= next[edge.target] {
                    continue;
                }
                next[edge.target] = new_cost;
            }
        }
        self.relax(&mut next);
        next
    }

    fn active(&self, costs: &[usize]) -> usize {
        costs.iter().filter(|&&cost| cost <= self.budget).count()
    }

    fn any_accepting(&self, costs: &[usize]) -> bool {
        costs
            .iter()
            .enumerate()
            .any(|(state, &cost)| cost <= self.budget && self.nfa.is_accepting(state))
    }

    fn best(&self, costs: &[usize]) -> Option<usize> {
        costs.iter().copied().filter(|&cost| cost <= self.budget).min()
    }
}

/// Position-wise byte mismatches between `a` and `b`, plus the difference
/// in their lengths.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> usize {
    let mismatches = a.iter().zip(b).filter(|(x, y)| x != y).count();
    mismatches + a.len().abs_diff(b.len())
}
