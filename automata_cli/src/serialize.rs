//! JSON dumps of built automata.

use serde::Serialize;
use seqautomata::{Automaton, EdgeKind, PdaOp, DFA, EFA, NFA, PDA};

fn symbol(byte: u8) -> String {
    char::from(byte).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeSnapshot {
    pub to: usize,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(rename = "charClass", skip_serializing_if = "Option::is_none")]
    pub char_class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NfaStateSnapshot {
    pub id: usize,
    pub accept: bool,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NfaSnapshot {
    pub start: usize,
    pub accept: usize,
    pub states: Vec<NfaStateSnapshot>,
}

impl From<&NFA> for NfaSnapshot {
    fn from(nfa: &NFA) -> NfaSnapshot {
        let states = nfa
            .states
            .iter()
            .enumerate()
            .map(|(id, state)| NfaStateSnapshot {
                id,
                accept: state.accepting,
                edges: state
                    .edges
                    .iter()
                    .map(|edge| {
                        let (kind, literal, char_class) = match &edge.kind {
                            EdgeKind::Epsilon => ("epsilon", None, None),
                            EdgeKind::Literal(b) => ("literal", Some(symbol(*b)), None),
                            EdgeKind::Any => ("any", None, None),
                            EdgeKind::Class(members) => (
                                "char_class",
                                None,
                                Some(String::from_utf8_lossy(members).into_owned()),
                            ),
                        };
                        EdgeSnapshot { to: edge.target, kind, literal, char_class }
                    })
                    .collect(),
            })
            .collect();
        NfaSnapshot { start: nfa.start, accept: nfa.accept, states }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DfaTransitionSnapshot {
    pub code: u8,
    pub symbol: String,
    pub to: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DfaStateSnapshot {
    pub id: usize,
    pub accept: bool,
    pub transitions: Vec<DfaTransitionSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DfaSnapshot {
    pub start: usize,
    pub states: Vec<DfaStateSnapshot>,
}

impl From<&DFA> for DfaSnapshot {
    fn from(dfa: &DFA) -> DfaSnapshot {
        let states = dfa
            .states
            .iter()
            .enumerate()
            .map(|(id, state)| DfaStateSnapshot {
                id,
                accept: state.accepting,
                transitions: state
                    .transitions()
                    .map(|(code, to)| DfaTransitionSnapshot { code, symbol: symbol(code), to })
                    .collect(),
            })
            .collect();
        DfaSnapshot { start: dfa.start, states }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EfaSnapshot {
    pub pattern: String,
    pub mismatch_budget: usize,
    pub nfa: NfaSnapshot,
}

impl From<&EFA> for EfaSnapshot {
    fn from(efa: &EFA) -> EfaSnapshot {
        EfaSnapshot {
            pattern: efa.pattern.clone(),
            mismatch_budget: efa.budget,
            nfa: NfaSnapshot::from(&efa.nfa),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdaRuleSnapshot {
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdaTransitionSnapshot {
    pub symbol: String,
    pub to: usize,
    pub op: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdaStateSnapshot {
    pub depth: usize,
    pub accept: bool,
    pub transitions: Vec<PdaTransitionSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdaSnapshot {
    pub rules: Vec<PdaRuleSnapshot>,
    pub states: Vec<PdaStateSnapshot>,
}

impl From<&PDA> for PdaSnapshot {
    fn from(pda: &PDA) -> PdaSnapshot {
        let rules =
            pda.rules.iter().map(|rule| PdaRuleSnapshot { expected: symbol(rule.expected) }).collect();
        let states = pda
            .states
            .iter()
            .map(|state| PdaStateSnapshot {
                depth: state.depth,
                accept: state.accepting,
                transitions: state
                    .transitions
                    .iter()
                    .map(|t| PdaTransitionSnapshot {
                        symbol: symbol(t.symbol),
                        to: t.target,
                        op: match t.op {
                            PdaOp::Push => "push",
                            PdaOp::Pop => "pop",
                            PdaOp::Ignore => "ignore",
                        },
                    })
                    .collect(),
            })
            .collect();
        PdaSnapshot { rules, states }
    }
}

/// A serializable copy of any automaton, tagged with its family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Snapshot {
    #[serde(rename = "NFA")]
    Nfa(NfaSnapshot),
    #[serde(rename = "DFA")]
    Dfa(DfaSnapshot),
    #[serde(rename = "EFA")]
    Efa(EfaSnapshot),
    #[serde(rename = "PDA")]
    Pda(PdaSnapshot),
}

impl From<Automaton<'_>> for Snapshot {
    fn from(automaton: Automaton<'_>) -> Snapshot {
        match automaton {
            Automaton::Nfa(nfa) => Snapshot::Nfa(nfa.into()),
            Automaton::Dfa(dfa) => Snapshot::Dfa(dfa.into()),
            Automaton::Efa(efa) => Snapshot::Efa(efa.into()),
            Automaton::Pda(pda) => Snapshot::Pda(pda.into()),
        }
    }
}

/// Compact single-line JSON for `automaton`.
pub fn to_json(automaton: Automaton<'_>) -> serde_json::Result<String> {
    serde_json::to_string(&Snapshot::from(automaton))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqautomata::{ModePreference, PatternSpec};
    use serde_json::{json, Value};

    fn dump(spec: PatternSpec) -> Value {
        let runner = spec.build().unwrap();
        serde_json::from_str(&to_json(runner.automaton()).unwrap()).unwrap()
    }

    #[test]
    fn nfa_dump() {
        let value = dump(PatternSpec::new("A[CG]"));
        assert_eq!(value["kind"], "NFA");
        assert_eq!(value["start"], 0);
        assert_eq!(value["accept"], 3);
        assert_eq!(value["states"][0]["edges"], json!([{ "to": 1, "type": "literal", "literal": "A" }]));
        assert_eq!(value["states"][1]["edges"], json!([{ "to": 2, "type": "epsilon" }]));
        assert_eq!(value["states"][2]["edges"][0]["charClass"], "CG");
        assert_eq!(value["states"][3]["accept"], true);
    }

    #[test]
    fn dfa_dump_is_sparse() {
        let value = dump(PatternSpec::new("AC").mode(ModePreference::Dfa));
        assert_eq!(value["kind"], "DFA");
        assert_eq!(
            value["states"][0]["transitions"],
            json!([{ "code": 65, "symbol": "A", "to": 1 }])
        );
        assert_eq!(value["states"][2]["transitions"], json!([]));
    }

    #[test]
    fn efa_dump() {
        let value = dump(PatternSpec::new("ACGT").mismatch_budget(2));
        assert_eq!(value["kind"], "EFA");
        assert_eq!(value["pattern"], "ACGT");
        assert_eq!(value["mismatchBudget"], 2);
        assert_eq!(value["nfa"]["states"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn pda_dump() {
        let value = dump(PatternSpec::new("").datasets(["(())"]).dot_bracket(true));
        assert_eq!(value["kind"], "PDA");
        assert_eq!(value["rules"], json!([{ "expected": "(" }, { "expected": ")" }]));
        assert_eq!(value["states"].as_array().unwrap().len(), 3);
        assert_eq!(
            value["states"][0]["transitions"],
            json!([{ "symbol": "(", "to": 1, "op": "push" }, { "symbol": ".", "to": 0, "op": "ignore" }])
        );
    }
}
