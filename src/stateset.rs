//! Sets of NFA states plus the two primitive operations every simulation
//! and the subset construction are built on: epsilon closure and move.

use std::collections::VecDeque;

use crate::nfa::{StateId, NFA};

/// An insertion-ordered set of NFA states with O(1) membership tests.
///
/// The capacity is fixed to the size of the NFA it was made for; ids at or
/// beyond it are ignored.
#[derive(Debug, Clone)]
pub struct StateSet {
    dense: Vec<StateId>,
    seen: Vec<bool>,
}

impl StateSet {
    pub fn new(capacity: usize) -> StateSet {
        StateSet { dense: Vec::new(), seen: vec![false; capacity] }
    }

    /// Adds `state`, returning true if it was not already present.
    pub fn insert(&mut self, state: StateId) -> bool {
        match self.seen.get_mut(state) {
            Some(seen) if !*seen => {
                *seen = true;
                self.dense.push(state);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.seen.get(state).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// The members in the order they were added.
    pub fn as_slice(&self) -> &[StateId] {
        &self.dense
    }

    pub fn into_vec(self) -> Vec<StateId> {
        self.dense
    }

    /// The members sorted ascending, which is the canonical form used to
    /// key subsets during determinization.
    pub fn canonical(&self) -> Vec<StateId> {
        let mut states = self.dense.clone();
        states.sort_unstable();
        states
    }
}

/// Every state reachable from `states` through epsilon edges alone,
/// including `states` themselves. Visits breadth first.
pub fn epsilon_closure(nfa: &NFA, states: &[StateId]) -> StateSet {
    let mut closure = StateSet::new(nfa.len());
    let mut queue = VecDeque::with_capacity(states.len());
    for &state in states {
        if closure.insert(state) {
            queue.push_back(state);
        }
    }
    while let Some(state) = queue.pop_front() {
        for edge in nfa.edges(state) {
            if !edge.kind.consumes() && closure.insert(edge.target) {
                queue.push_back(edge.target);
            }
        }
    }
    closure
}

/// The states reached from `states` by one consuming edge that accepts
/// `byte`. No epsilon edges are followed.
pub fn step(nfa: &NFA, states: &[StateId], byte: u8) -> StateSet {
    let mut next = StateSet::new(nfa.len());
    for &state in states {
        for edge in nfa.edges(state) {
            if edge.kind.matches(byte) {
                next.insert(edge.target);
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;

    #[test]
    fn set_dedups_and_keeps_order() {
        let mut set = StateSet::new(4);
        assert!(set.insert(3));
        assert!(set.insert(1));
        assert!(!set.insert(3));
        assert!(!set.insert(9));
        assert_eq!(set.as_slice(), &[3, 1]);
        assert_eq!(set.canonical(), vec![1, 3]);
        assert!(set.contains(1));
        assert!(!set.contains(2));
    }

    #[test]
    fn closure_follows_epsilons_only() {
        // A*: 2 -> {0, 3}, 1 -> {0, 3}, 0 -A-> 1
        let nfa = Compiler::new().compile_pattern("A*").unwrap();
        let closure = epsilon_closure(&nfa, &[nfa.start]);
        assert_eq!(closure.canonical(), vec![0, 2, 3]);

        let moved = step(&nfa, closure.as_slice(), b'A');
        assert_eq!(moved.as_slice(), &[1]);
        assert!(step(&nfa, closure.as_slice(), b'C').is_empty());
        assert_eq!(epsilon_closure(&nfa, moved.as_slice()).canonical(), vec![0, 1, 3]);
    }
}
