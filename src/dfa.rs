//! Subset construction.
//!
//! Each reachable set of NFA states becomes one DFA state. Ids are handed
//! out in discovery order, breadth first from the closure of the NFA start,
//! so the start is always state 0. There is no minimization; pathological
//! patterns can blow up exponentially.

use std::collections::{HashMap, VecDeque};

use crate::{
    nfa::{StateId, NFA},
    stateset::{epsilon_closure, step},
};

/// Number of entries in every transition table: one per byte value.
pub const ALPHABET_LEN: usize = 256;

/// A DFA state with a dense transition table. `None` means there is no
/// transition on that byte.
#[derive(Clone, PartialEq, Eq)]
pub struct State {
    pub next: [Option<StateId>; ALPHABET_LEN],
    pub accepting: bool,
}

impl State {
    fn new(accepting: bool) -> State {
        State { next: [None; ALPHABET_LEN], accepting }
    }

    /// The byte and target of every defined transition, ascending by byte.
    pub fn transitions(&self) -> impl Iterator<Item = (u8, StateId)> + '_ {
        (0..=u8::MAX).filter_map(move |b| self.next[usize::from(b)].map(|to| (b, to)))
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("accepting", &self.accepting)
            .field("next", &self.transitions().collect::<Vec<_>>())
            .finish()
    }
}

/// A fully tabulated DFA. State 0 is the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DFA {
    pub states: Vec<State>,
    pub start: StateId,
}

impl DFA {
    /// Determinizes `nfa`.
    pub fn from_nfa(nfa: &NFA) -> DFA {
        let mut states = Vec::new();
        let mut ids: HashMap<Vec<StateId>, StateId> = HashMap::new();
        let mut pending = VecDeque::new();

        let start = epsilon_closure(nfa, &[nfa.start]).canonical();
        states.push(State::new(nfa.any_accepting(&start)));
        ids.insert(start.clone(), 0);
        pending.push_back((start, 0));

        while let Some((subset, id)) = pending.pop_front() {
            for byte in 0..=u8::MAX {
                let moved = step(nfa, &subset, byte);
                if moved.is_empty() {
                    continue;
                }
                let closure = epsilon_closure(nfa, moved.as_slice()).canonical();
                let target = match ids.get(&closure) {
                    Some(&target) => target,
                    None => {
                        let target = states.len();
                        states.push(State::new(nfa.any_accepting(&closure)));
                        ids.insert(closure.clone(), target);
                        pending.push_back((closure, target));
                        target
                    }
                };
                states[id].next[usize::from(byte)] = Some(target);
            }
        }
        debug!("determinized {} NFA states into {} DFA states", nfa.len(), states.len());
        DFA { states, start: 0 }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The target of `state` on `byte`, if there is one.
    pub fn next_state(&self, state: StateId, byte: u8) -> Option<StateId> {
        self.states[state].next[usize::from(byte)]
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.states[state].accepting
    }
}
