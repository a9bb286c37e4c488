//! Choosing and building the automaton for one invocation.

use std::{convert::Infallible, fmt, str::FromStr};

use crate::{
    compiler::Compiler,
    dfa::DFA,
    efa::{EfaRunner, EFA},
    matcher::{DfaRunner, NfaRunner, Runner},
    pda::{max_depth, PdaRunner, PDA},
    CompileResult,
};

/// Which automaton family the caller asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModePreference {
    #[default]
    Auto,
    Nfa,
    Dfa,
    Efa,
    Pda,
}

impl FromStr for ModePreference {
    type Err = Infallible;

    /// Case-insensitive. Anything unrecognized means [`ModePreference::Auto`].
    fn from_str(s: &str) -> Result<ModePreference, Infallible> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "nfa" => ModePreference::Nfa,
            "dfa" => ModePreference::Dfa,
            "efa" => ModePreference::Efa,
            "pda" => ModePreference::Pda,
            _ => ModePreference::Auto,
        })
    }
}

/// The automaton family a plan resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutomatonKind {
    Nfa,
    Dfa,
    Efa,
    Pda,
}

impl fmt::Display for AutomatonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AutomatonKind::Nfa => "NFA",
            AutomatonKind::Dfa => "DFA",
            AutomatonKind::Efa => "EFA",
            AutomatonKind::Pda => "PDA",
        };
        f.write_str(name)
    }
}

/// Resolves a preference. An explicit choice always wins; `Auto` picks the
/// PDA for structure work, the EFA when mismatches are allowed and the NFA
/// otherwise.
pub fn select(mode: ModePreference, structure_mode: bool, mismatch_budget: usize) -> AutomatonKind {
    match mode {
        ModePreference::Nfa => AutomatonKind::Nfa,
        ModePreference::Dfa => AutomatonKind::Dfa,
        ModePreference::Efa => AutomatonKind::Efa,
        ModePreference::Pda => AutomatonKind::Pda,
        ModePreference::Auto if structure_mode => AutomatonKind::Pda,
        ModePreference::Auto if mismatch_budget > 0 => AutomatonKind::Efa,
        ModePreference::Auto => AutomatonKind::Nfa,
    }
}

/// Everything needed to build a runner.
///
/// ```
/// use seqautomata::{AutomatonKind, PatternSpec};
///
/// let spec = PatternSpec::new("AC(G|T)").mismatch_budget(1);
/// assert_eq!(spec.kind(), AutomatonKind::Efa);
/// let runner = spec.build().unwrap();
/// assert!(runner.run("AGT").accepted);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSpec {
    pub pattern: String,
    pub datasets: Vec<String>,
    pub mismatch_budget: usize,
    pub mode: ModePreference,
    /// Treat the datasets as dot-bracket strings.
    pub dot_bracket: bool,
    /// Secondary structure to validate sequences against.
    pub structure: Option<String>,
    pub trace: bool,
}

impl PatternSpec {
    pub fn new(pattern: &str) -> PatternSpec {
        PatternSpec { pattern: pattern.to_string(), ..PatternSpec::default() }
    }

    pub fn datasets<I, S>(mut self, datasets: I) -> PatternSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datasets = datasets.into_iter().map(Into::into).collect();
        self
    }

    pub fn mismatch_budget(mut self, budget: usize) -> PatternSpec {
        self.mismatch_budget = budget;
        self
    }

    pub fn mode(mut self, mode: ModePreference) -> PatternSpec {
        self.mode = mode;
        self
    }

    pub fn dot_bracket(mut self, yes: bool) -> PatternSpec {
        self.dot_bracket = yes;
        self
    }

    pub fn structure(mut self, structure: Option<String>) -> PatternSpec {
        self.structure = structure;
        self
    }

    pub fn trace(mut self, yes: bool) -> PatternSpec {
        self.trace = yes;
        self
    }

    pub fn structure_mode(&self) -> bool {
        self.dot_bracket || self.structure.is_some()
    }

    pub fn kind(&self) -> AutomatonKind {
        select(self.mode, self.structure_mode(), self.mismatch_budget)
    }

    /// The deepest nesting found in any dataset or in the structure.
    pub fn pda_depth(&self) -> usize {
        self.datasets
            .iter()
            .map(String::as_str)
            .chain(self.structure.as_deref())
            .map(|s| max_depth(s.as_bytes()))
            .max()
            .unwrap_or(0)
    }

    /// Builds the automaton [`PatternSpec::kind`] picks and wraps it in its
    /// runner.
    pub fn build(&self) -> CompileResult<Runner> {
        let kind = self.kind();
        debug!("building {} for pattern {:?}", kind, self.pattern);
        let runner = match kind {
            AutomatonKind::Nfa => {
                let nfa = Compiler::new().compile_pattern(&self.pattern)?;
                Runner::Nfa(NfaRunner::new(nfa, self.trace))
            }
            AutomatonKind::Dfa => {
                let nfa = Compiler::new().compile_pattern(&self.pattern)?;
                Runner::Dfa(DfaRunner::new(DFA::from_nfa(&nfa), self.trace))
            }
            AutomatonKind::Efa => {
                let efa = EFA::new(&self.pattern, self.mismatch_budget)?;
                Runner::Efa(EfaRunner::new(efa, self.trace))
            }
            AutomatonKind::Pda => {
                let runner = PdaRunner::new(PDA::new(self.pda_depth()), self.trace);
                match &self.structure {
                    Some(structure) => Runner::Pda(runner.with_structure(structure.as_bytes())),
                    None => Runner::Pda(runner),
                }
            }
        };
        Ok(runner)
    }
}
