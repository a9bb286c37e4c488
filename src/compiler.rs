use crate::{
    nfa::{EdgeKind, Fragment, NFA},
    parser::{self, Operator, Token},
    CompileError, CompileResult,
};

/// Compiler that converts a postfix token sequence to a Thompson NFA
#[derive(Debug, Default)]
pub struct Compiler {
    nfa: NFA,
    stack: Vec<Fragment>,
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `pattern` and compile it.
    pub fn compile_pattern(self, pattern: &str) -> CompileResult<NFA> {
        let postfix = parser::to_postfix(pattern)?;
        self.compile(&postfix)
    }

    /// Compile postfix tokens to a Thompson NFA.
    ///
    /// Exactly one fragment must be left once every token is consumed; its
    /// end state becomes the accepting state.
    pub fn compile(mut self, postfix: &[Token]) -> CompileResult<NFA> {
        if postfix.is_empty() {
            return Ok(self.compile_empty());
        }

        for token in postfix {
            let fragment = match token {
                Token::Literal(b) => self.nfa.fragment(EdgeKind::Literal(*b)),
                Token::Class(members) => self.nfa.fragment(EdgeKind::Class(members.clone())),
                Token::Any => self.nfa.fragment(EdgeKind::Any),
                Token::Concat => self.compile_concat()?,
                Token::Union => self.compile_union()?,
                Token::Star => self.compile_star()?,
                Token::Plus => self.compile_plus()?,
                Token::Question => self.compile_question()?,
            };
            self.stack.push(fragment);
        }

        if self.stack.len() != 1 {
            return Err(CompileError::InvalidPattern { fragments: self.stack.len() });
        }
        let fragment = self.stack[0];
        self.nfa.states[fragment.end].accepting = true;
        self.nfa.start = fragment.start;
        self.nfa.accept = fragment.end;
        debug!(
            "compiled NFA with {} states from {} postfix tokens",
            self.nfa.len(),
            postfix.len()
        );
        Ok(self.nfa)
    }

    /// The empty pattern: two states joined by one epsilon edge.
    fn compile_empty(mut self) -> NFA {
        let fragment = self.nfa.fragment(EdgeKind::Epsilon);
        self.nfa.states[fragment.end].accepting = true;
        self.nfa.start = fragment.start;
        self.nfa.accept = fragment.end;
        self.nfa
    }

    fn pop(&mut self, op: Operator) -> CompileResult<Fragment> {
        self.stack.pop().ok_or(CompileError::MissingOperand(op))
    }

    fn pop_pair(&mut self, op: Operator) -> CompileResult<(Fragment, Fragment)> {
        if self.stack.len() < 2 {
            return Err(CompileError::MissingOperand(op));
        }
        let right = self.pop(op)?;
        let left = self.pop(op)?;
        Ok((left, right))
    }

    fn compile_concat(&mut self) -> CompileResult<Fragment> {
        let (left, right) = self.pop_pair(Operator::Concat)?;
        self.nfa.connect(left.end, right.start);
        Ok(Fragment { start: left.start, end: right.end })
    }

    fn compile_union(&mut self) -> CompileResult<Fragment> {
        let (left, right) = self.pop_pair(Operator::Union)?;
        let start = self.nfa.add_state();
        let end = self.nfa.add_state();
        self.nfa.connect(start, left.start);
        self.nfa.connect(start, right.start);
        self.nfa.connect(left.end, end);
        self.nfa.connect(right.end, end);
        Ok(Fragment { start, end })
    }

    /// Compile * quantifier: enter, skip, repeat and exit edges.
    fn compile_star(&mut self) -> CompileResult<Fragment> {
        let expr = self.pop(Operator::Star)?;
        let start = self.nfa.add_state();
        let end = self.nfa.add_state();
        self.nfa.connect(start, expr.start);
        self.nfa.connect(start, end);
        self.nfa.connect(expr.end, expr.start);
        self.nfa.connect(expr.end, end);
        Ok(Fragment { start, end })
    }

    /// Compile + quantifier: like * without the skip edge.
    fn compile_plus(&mut self) -> CompileResult<Fragment> {
        let expr = self.pop(Operator::Plus)?;
        let start = self.nfa.add_state();
        let end = self.nfa.add_state();
        self.nfa.connect(start, expr.start);
        self.nfa.connect(expr.end, expr.start);
        self.nfa.connect(expr.end, end);
        Ok(Fragment { start, end })
    }

    /// Compile ? quantifier: like * without the repeat edge.
    fn compile_question(&mut self) -> CompileResult<Fragment> {
        let expr = self.pop(Operator::Question)?;
        let start = self.nfa.add_state();
        let end = self.nfa.add_state();
        self.nfa.connect(start, expr.start);
        self.nfa.connect(start, end);
        self.nfa.connect(expr.end, end);
        Ok(Fragment { start, end })
    }
}
