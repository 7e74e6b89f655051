//! Recursive-descent parser for Boolean expressions.
//!
//! Precedence, loosest first: `<->`, `->` (right-associative), `|`, `^`,
//! `&`, then prefix `~`.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ast::{BoolExpr, Expr, VarId};
use crate::error::{LogicError, LogicResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Deepest nesting of `~` and parentheses accepted.
pub const MAX_DEPTH: usize = 256;

/// Parse an expression string.
pub fn parse(source: &str) -> LogicResult<BoolExpr> {
    let mut parser = Parser::new(source)?;
    if parser.is_eof() {
        return Err(LogicError::EmptyExpression);
    }
    let root = parser.parse_iff()?;
    if let Some(token) = parser.tokens.get(parser.pos) {
        return Err(LogicError::UnexpectedToken {
            position: token.span.start,
            expected: "operator or end of input".into(),
            found: token.token.to_string(),
        });
    }
    debug!(
        variables = parser.variables.len(),
        tokens = parser.tokens.len(),
        "parsed expression"
    );
    Ok(BoolExpr::new(root, parser.variables))
}

/// Parser state.
struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    variables: Vec<String>,
    index: FxHashMap<String, VarId>,
    depth: usize,
}

impl Parser {
    fn new(source: &str) -> LogicResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, message)) => {
                    return Err(LogicError::Lexer {
                        position: span.start,
                        message,
                    });
                }
            }
        }
        Ok(Self {
            tokens,
            pos: 0,
            variables: Vec::new(),
            index: FxHashMap::default(),
            depth: 0,
        })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn enter(&mut self) -> LogicResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(LogicError::TooDeep { max: MAX_DEPTH });
        }
        Ok(())
    }

    fn parse_iff(&mut self) -> LogicResult<Expr> {
        let mut lhs = self.parse_implies()?;
        while self.consume(&Token::Iff) {
            let rhs = self.parse_implies()?;
            lhs = Expr::Iff(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_implies(&mut self) -> LogicResult<Expr> {
        let lhs = self.parse_or()?;
        if self.consume(&Token::Implies) {
            let rhs = self.parse_implies()?;
            return Ok(Expr::Implies(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> LogicResult<Expr> {
        self.parse_chain(&Token::Or, Expr::Or, Self::parse_xor)
    }

    fn parse_xor(&mut self) -> LogicResult<Expr> {
        self.parse_chain(&Token::Xor, Expr::Xor, Self::parse_and)
    }

    fn parse_and(&mut self) -> LogicResult<Expr> {
        self.parse_chain(&Token::And, Expr::And, Self::parse_unary)
    }

    /// Collect `operand (op operand)*` into one n-ary node.
    fn parse_chain(
        &mut self,
        op: &Token,
        build: fn(Vec<Expr>) -> Expr,
        operand: fn(&mut Self) -> LogicResult<Expr>,
    ) -> LogicResult<Expr> {
        let first = operand(self)?;
        if self.peek() != Some(op) {
            return Ok(first);
        }
        let mut operands = vec![first];
        while self.consume(op) {
            operands.push(operand(self)?);
        }
        Ok(build(operands))
    }

    fn parse_unary(&mut self) -> LogicResult<Expr> {
        if self.consume(&Token::Not) {
            self.enter()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> LogicResult<Expr> {
        let Some(SpannedToken { token, span }) = self.advance() else {
            return Err(LogicError::UnexpectedEof("operand".into()));
        };
        match token {
            Token::True => Ok(Expr::Const(true)),
            Token::False => Ok(Expr::Const(false)),
            Token::Identifier(name) => Ok(Expr::Var(self.intern(name))),
            Token::LParen => {
                self.enter()?;
                let inner = self.parse_iff()?;
                self.depth -= 1;
                match self.advance() {
                    Some(SpannedToken {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(LogicError::UnexpectedToken {
                        position: other.span.start,
                        expected: "')'".into(),
                        found: other.token.to_string(),
                    }),
                    None => Err(LogicError::UnexpectedEof("')'".into())),
                }
            }
            other => Err(LogicError::UnexpectedToken {
                position: span.start,
                expected: "operand".into(),
                found: other.to_string(),
            }),
        }
    }

    fn intern(&mut self, name: String) -> VarId {
        if let Some(id) = self.index.get(&name) {
            return *id;
        }
        let id = VarId(self.variables.len());
        self.variables.push(name.clone());
        self.index.insert(name, id);
        id
    }
}
