//! A bounded-depth pushdown automaton for dot-bracket strings.
//!
//! Because the language is a single bracket pair, the stack never needs
//! to hold anything but its height, so the PDA is tabulated as one state
//! per depth `0..=max_depth`. State 0 (empty stack) is the only accepting
//! state. Going deeper than `max_depth` has no transition and rejects.
//!
//! The runner has a second mode for RNA secondary structure: given a
//! dot-bracket string the same length as the input sequence, it checks the
//! brackets balance and that every bracketed pair of bases is
//! complementary.

use crate::matcher::{RunResult, TraceEvent};

/// Marker for one of the two bracket symbols the machine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdaRule {
    pub expected: u8,
}

/// What a transition does to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdaOp {
    Push,
    Pop,
    Ignore,
}

/// Move to `target` on `symbol`, applying `op` to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdaTransition {
    pub symbol: u8,
    pub target: usize,
    pub op: PdaOp,
}

/// The state for one stack height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdaState {
    pub depth: usize,
    pub accepting: bool,
    pub transitions: Vec<PdaTransition>,
}

/// A bracket-matching PDA tabulated up to a fixed depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PDA {
    pub start: usize,
    pub rules: Vec<PdaRule>,
    pub states: Vec<PdaState>,
}

impl PDA {
    /// Tabulates states `0..=max_depth`. Depth `d` pushes on `(` to `d + 1`
    /// when below the maximum, pops on `)` to `d - 1` when above zero, and
    /// always ignores `.`.
    pub fn new(max_depth: usize) -> PDA {
        let states = (0..=max_depth)
            .map(|depth| {
                let mut transitions = Vec::with_capacity(3);
                if depth < max_depth {
                    transitions.push(PdaTransition {
                        symbol: b'(',
                        target: depth + 1,
                        op: PdaOp::Push,
                    });
                }
                if depth > 0 {
                    transitions.push(PdaTransition {
                        symbol: b')',
                        target: depth - 1,
                        op: PdaOp::Pop,
                    });
                }
                transitions.push(PdaTransition { symbol: b'.', target: depth, op: PdaOp::Ignore });
                PdaState { depth, accepting: depth == 0, transitions }
            })
            .collect();
        debug!("built PDA with max depth {}", max_depth);
        PDA {
            start: 0,
            rules: vec![PdaRule { expected: b'(' }, PdaRule { expected: b')' }],
            states,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    pub fn transition(&self, state: usize, symbol: u8) -> Option<&PdaTransition> {
        self.states.get(state)?.transitions.iter().find(|t| t.symbol == symbol)
    }
}

/// The deepest bracket nesting in `s`, or 0 if its brackets don't balance.
/// Bytes other than `(` and `)` are ignored.
pub fn max_depth(s: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    for &b in s {
        match b {
            b'(' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return 0,
            },
            _ => {}
        }
    }
    if depth == 0 {
        deepest
    } else {
        0
    }
}

/// Checks that `s` uses only `(`, `)` and `.` and that its brackets
/// balance, without going through a PDA.
pub fn validate_dot_bracket(s: &[u8]) -> bool {
    let mut balance = 0usize;
    for &b in s {
        match b {
            b'(' => balance += 1,
            b')' => match balance.checked_sub(1) {
                Some(next) => balance = next,
                None => return false,
            },
            b'.' => {}
            _ => return false,
        }
    }
    balance == 0
}

/// One bracketed pair and whether its bases are complementary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasePairCheck {
    pub open: usize,
    pub close: usize,
    pub open_base: u8,
    pub close_base: u8,
    pub valid: bool,
}

/// Details of a secondary structure validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureReport {
    /// First position in the sequence holding something other than
    /// `A`, `U`, `C` or `G`. Validation stops there.
    pub invalid_base: Option<usize>,
    pub parentheses_valid: bool,
    pub base_pairs: Vec<BasePairCheck>,
}

fn is_nucleotide(b: u8) -> bool {
    matches!(b.to_ascii_uppercase(), b'A' | b'U' | b'C' | b'G')
}

/// Watson-Crick pairs only.
fn is_complementary(a: u8, b: u8) -> bool {
    matches!((a, b), (b'A', b'U') | (b'U', b'A') | (b'G', b'C') | (b'C', b'G'))
}

/// Runs a [`PDA`], optionally validating sequences against a structure.
#[derive(Debug, Clone)]
pub struct PdaRunner {
    pda: PDA,
    structure: Option<Vec<u8>>,
    trace: bool,
}

impl PdaRunner {
    pub fn new(pda: PDA, trace: bool) -> PdaRunner {
        PdaRunner { pda, structure: None, trace }
    }

    /// Validates inputs against `structure` whenever their lengths agree.
    pub fn with_structure(mut self, structure: impl Into<Vec<u8>>) -> PdaRunner {
        self.structure = Some(structure.into());
        self
    }

    pub fn pda(&self) -> &PDA {
        &self.pda
    }

    /// Validates `input` against the structure when one of equal length
    /// is set, otherwise walks it as a dot-bracket string.
    pub fn run(&self, input: &[u8]) -> RunResult {
        let result = match self.structure.as_deref() {
            Some(structure) if structure.len() == input.len() => {
                self.run_structure(input, structure)
            }
            _ => self.run_brackets(input),
        };
        trace!(
            "PDA run over {} bytes: accepted={}, max depth {}",
            input.len(),
            result.accepted,
            result.max_stack_depth
        );
        result
    }

    /// One deterministic pass over a dot-bracket string.
    fn run_brackets(&self, input: &[u8]) -> RunResult {
        let mut result = RunResult::default();
        let mut state = self.pda.start;
        let mut depth = 0usize;
        for (pos, &symbol) in input.iter().enumerate() {
            let transition = match self.pda.transition(state, symbol) {
                Some(transition) => transition,
                None => {
                    self.event(&mut result, pos, || {
                        format!("pos={} reject symbol={:?} stack={}", pos, symbol as char, depth)
                    });
                    return result;
                }
            };
            depth = match transition.op {
                PdaOp::Push => depth + 1,
                PdaOp::Pop => match depth.checked_sub(1) {
                    Some(depth) => depth,
                    None => return result,
                },
                PdaOp::Ignore => depth,
            };
            state = transition.target;
            if self.pda.states[state].depth != depth {
                return result;
            }
            self.event(&mut result, pos, || format!("pos={} stack={}", pos, depth));
            result.max_stack_depth = result.max_stack_depth.max(depth);
            result.states_visited += 1;
        }
        if depth == 0 && self.pda.states[state].accepting {
            result.accepted = true;
            result.matches.push((0, input.len()));
        }
        result
    }

    fn run_structure(&self, sequence: &[u8], structure: &[u8]) -> RunResult {
        let mut result = RunResult::default();
        let mut report = StructureReport::default();

        if let Some(pos) = sequence.iter().position(|&b| !is_nucleotide(b)) {
            self.event(&mut result, pos, || {
                format!("pos={} invalid base {:?}", pos, sequence[pos] as char)
            });
            report.invalid_base = Some(pos);
            result.structure = Some(report);
            return result;
        }

        report.parentheses_valid = self.structure_balances(structure, &mut result);
        if !report.parentheses_valid {
            result.structure = Some(report);
            return result;
        }

        let mut open = Vec::new();
        for (pos, &symbol) in structure.iter().enumerate() {
            match symbol {
                b'(' => open.push(pos),
                b')' => {
                    if let Some(left) = open.pop() {
                        let open_base = sequence[left].to_ascii_uppercase();
                        let close_base = sequence[pos].to_ascii_uppercase();
                        let valid = is_complementary(open_base, close_base);
                        self.event(&mut result, pos, || {
                            format!(
                                "pair=({},{}) bases={}{} valid={}",
                                left, pos, open_base as char, close_base as char, valid
                            )
                        });
                        report.base_pairs.push(BasePairCheck {
                            open: left,
                            close: pos,
                            open_base,
                            close_base,
                            valid,
                        });
                    }
                }
                _ => {}
            }
            result.max_stack_depth = result.max_stack_depth.max(open.len());
            result.states_visited += 1;
        }

        if report.base_pairs.iter().all(|pair| pair.valid) {
            result.accepted = true;
            result.matches.push((0, sequence.len()));
        }
        result.structure = Some(report);
        result
    }

    /// Balance scan over the structure string. Any byte other than `(`,
    /// `)` or `.` fails it, as does nesting past the PDA's depth.
    fn structure_balances(&self, structure: &[u8], result: &mut RunResult) -> bool {
        let limit = self.pda.max_depth();
        let mut balance = 0usize;
        for (pos, &symbol) in structure.iter().enumerate() {
            match symbol {
                b'(' if balance < limit => balance += 1,
                b')' if balance > 0 => balance -= 1,
                b'.' => {}
                _ => {
                    self.event(result, pos, || {
                        format!("pos={} unbalanced at {:?} depth={}", pos, symbol as char, balance)
                    });
                    return false;
                }
            }
        }
        if balance != 0 {
            self.event(result, structure.len(), || format!("unclosed brackets={}", balance));
            return false;
        }
        true
    }

    fn event<F: FnOnce() -> String>(&self, result: &mut RunResult, index: usize, detail: F) {
        if self.trace {
            result.trace.push(TraceEvent { index, detail: detail() });
        }
    }
}
