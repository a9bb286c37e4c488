/// A state ID in the NFA. States live in one arena and are addressed by
/// their position in it.
pub type StateId = usize;

/// What an edge consumes, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeKind {
    /// Follows without consuming input.
    Epsilon,
    /// Consumes exactly this byte.
    Literal(u8),
    /// Consumes any byte.
    Any,
    /// Consumes any byte listed in the expanded class.
    Class(Vec<u8>),
}

impl EdgeKind {
    /// Returns true if this edge consumes a byte when taken.
    pub fn consumes(&self) -> bool {
        !matches!(self, EdgeKind::Epsilon)
    }

    /// Returns true if this edge can be taken on `byte`. Epsilon edges never
    /// match a byte.
    pub fn matches(&self, byte: u8) -> bool {
        match self {
            EdgeKind::Epsilon => false,
            EdgeKind::Literal(lit) => *lit == byte,
            EdgeKind::Any => true,
            EdgeKind::Class(members) => class_contains(members, byte),
        }
    }
}

#[cfg(feature = "perf-literal")]
fn class_contains(members: &[u8], byte: u8) -> bool {
    memchr::memchr(byte, members).is_some()
}

#[cfg(not(feature = "perf-literal"))]
fn class_contains(members: &[u8], byte: u8) -> bool {
    members.contains(&byte)
}

/// A directed edge to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub target: StateId,
    pub kind: EdgeKind,
}

/// A Thompson NFA state: its outgoing edges in insertion order and whether
/// reaching it means the pattern matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub edges: Vec<Edge>,
    pub accepting: bool,
}

/// Fragment of an NFA with start and end states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

/// A Thompson NFA over bytes.
///
/// `accept` is the end state of the final fragment. It is kept for
/// inspection only; acceptance is always read from [`State::accepting`].
/// Once the compiler hands the NFA out it is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NFA {
    /// All states in the NFA
    pub states: Vec<State>,
    /// Starting state
    pub start: StateId,
    /// End state of the outermost fragment
    pub accept: StateId,
}

impl NFA {
    /// Create a new empty NFA
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new state and return its ID
    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    /// Add an edge from `from` to `to`.
    pub fn add_edge(&mut self, from: StateId, to: StateId, kind: EdgeKind) {
        debug_assert!(to < self.states.len(), "edge target {} out of range", to);
        self.states[from].edges.push(Edge { target: to, kind });
    }

    /// Connect two states with an epsilon transition
    pub fn connect(&mut self, from: StateId, to: StateId) {
        self.add_edge(from, to, EdgeKind::Epsilon);
    }

    /// Allocate a two state fragment joined by a single edge.
    pub fn fragment(&mut self, kind: EdgeKind) -> Fragment {
        let start = self.add_state();
        let end = self.add_state();
        self.add_edge(start, end, kind);
        Fragment { start, end }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.states[state].accepting
    }

    /// Check if any state in the set is accepting
    pub fn any_accepting(&self, states: &[StateId]) -> bool {
        states.iter().any(|&state| self.states[state].accepting)
    }

    /// Iterates over the edges leaving `state`.
    pub fn edges(&self, state: StateId) -> std::slice::Iter<'_, Edge> {
        self.states[state].edges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_matching() {
        assert!(EdgeKind::Literal(b'A').matches(b'A'));
        assert!(!EdgeKind::Literal(b'A').matches(b'a'));
        assert!(EdgeKind::Any.matches(0));
        assert!(EdgeKind::Any.matches(255));
        assert!(EdgeKind::Class(b"ACG".to_vec()).matches(b'G'));
        assert!(!EdgeKind::Class(b"ACG".to_vec()).matches(b'T'));
        assert!(!EdgeKind::Epsilon.matches(b'A'));
        assert!(!EdgeKind::Epsilon.consumes());
    }

    #[test]
    fn fragment_allocates_two_states() {
        let mut nfa = NFA::new();
        let frag = nfa.fragment(EdgeKind::Literal(b'A'));
        assert_eq!(nfa.len(), 2);
        assert_eq!(frag, Fragment { start: 0, end: 1 });
        assert_eq!(
            nfa.edges(0).collect::<Vec<_>>(),
            vec![&Edge { target: 1, kind: EdgeKind::Literal(b'A') }]
        );
        assert!(!nfa.any_accepting(&[0, 1]));
    }
}
