/*!
Pattern automata for biological sequences.

This crate compiles a small regex dialect into a Thompson NFA and runs it
over DNA or RNA strings, either directly, after subset construction into a
DFA, or with a budget of allowed substitutions (the "EFA"). Separately, a
bounded-depth pushdown automaton recognizes dot-bracket strings and can
validate an RNA secondary structure against its sequence.

Every runner reports the same [`RunResult`]: whether the whole input was
accepted, every `[start, end)` interval that matched, and optionally a
per-position trace.

# Example

```
use seqautomata::{ModePreference, PatternSpec};

let runner = PatternSpec::new("A(C|G)T").mode(ModePreference::Dfa).build().unwrap();
let result = runner.run("TTACTAGT");
assert_eq!(result.matches, vec![(2, 5), (5, 8)]);
assert!(!result.accepted);
```

# Syntax

* `A` matches a byte. `\x` matches `x` even if it is an operator.
* `.` matches any byte.
* `[ACG]` matches one of the listed bytes, `[A-G]` a range of them.
* `xy` concatenation, `x|y` alternation, `x*`, `x+` and `x?` repetition.
* `(x)` groups.

Whitespace outside a class is ignored. Matching is byte-wise and case
sensitive.

# Crate features

* **logging** - Enables the `log` crate. Builders log automaton sizes at
  debug level and runners log a summary of each run at trace level.
* **perf-literal** - Uses `memchr` to test character class membership.
*/

#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

// Must come first so the macros are visible to the modules below.
#[macro_use]
mod macros;

pub mod compiler;
pub mod dfa;
pub mod efa;
pub mod matcher;
pub mod nfa;
pub mod parser;
pub mod pda;
pub mod plan;
pub mod stateset;

pub use compiler::Compiler;
pub use dfa::DFA;
pub use efa::{hamming_distance, EfaRunner, EFA, MAX_BUDGET};
pub use matcher::{Automaton, DfaRunner, NfaRunner, RunResult, Runner, TraceEvent};
pub use nfa::{Edge, EdgeKind, Fragment, State, StateId, NFA};
pub use parser::{to_postfix, Operator, Token};
pub use pda::{
    max_depth, validate_dot_bracket, BasePairCheck, PdaOp, PdaRunner, StructureReport, PDA,
};
pub use plan::{select, AutomatonKind, ModePreference, PatternSpec};

/// The result of building an automaton from a pattern.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur while parsing a pattern or building an automaton.
///
/// Inputs that merely fail to match are never errors; they come back as a
/// [`RunResult`] with `accepted` unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The pattern ends in a lone `\`.
    DanglingEscape,
    /// A `[` was never closed.
    UnterminatedClass,
    /// Parentheses don't pair up.
    MismatchedParens,
    /// An operator had fewer operands than it needs.
    MissingOperand(Operator),
    /// Construction finished with some number of fragments other than one.
    InvalidPattern { fragments: usize },
    /// The approximate matcher was asked to match an empty pattern.
    EmptyApproximatePattern,
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::DanglingEscape => write!(f, "pattern ends with a dangling escape"),
            CompileError::UnterminatedClass => write!(f, "unterminated character class"),
            CompileError::MismatchedParens => write!(f, "mismatched parentheses"),
            CompileError::MissingOperand(op) => write!(f, "missing operand for {}", op),
            CompileError::InvalidPattern { fragments } => {
                write!(f, "invalid pattern: {} fragments left after construction", fragments)
            }
            CompileError::EmptyApproximatePattern => {
                write!(f, "approximate matching needs a non-empty pattern")
            }
        }
    }
}

impl std::error::Error for CompileError {}

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
