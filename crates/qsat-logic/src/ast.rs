//! Expression tree and the variable table that names its leaves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bits::{parse_bitstring, to_bitstring};
use crate::error::{LogicError, LogicResult};
use crate::truth_table::TruthTable;

/// Most variables an expression may have when it is enumerated or turned
/// into a circuit. A truth table of this width has 16M rows.
pub const MAX_VARIABLES: usize = 24;

/// Index of a variable in its expression's variable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

/// A Boolean expression tree.
///
/// Associative operators are n-ary so that long conjunctions, such as the
/// clause list of a CNF formula, stay shallow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// Constant value.
    Const(bool),
    /// Variable reference.
    Var(VarId),
    /// Negation.
    Not(Box<Expr>),
    /// Conjunction of all operands.
    And(Vec<Expr>),
    /// Disjunction of all operands.
    Or(Vec<Expr>),
    /// Parity of all operands.
    Xor(Vec<Expr>),
    /// Material implication.
    Implies(Box<Expr>, Box<Expr>),
    /// Equivalence.
    Iff(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate with bit `i` of `assignment` as the value of variable `i`.
    pub fn eval(&self, assignment: u64) -> bool {
        match self {
            Expr::Const(value) => *value,
            Expr::Var(VarId(i)) => (assignment >> i) & 1 == 1,
            Expr::Not(inner) => !inner.eval(assignment),
            Expr::And(ops) => ops.iter().all(|e| e.eval(assignment)),
            Expr::Or(ops) => ops.iter().any(|e| e.eval(assignment)),
            Expr::Xor(ops) => ops.iter().fold(false, |acc, e| acc ^ e.eval(assignment)),
            Expr::Implies(lhs, rhs) => !lhs.eval(assignment) || rhs.eval(assignment),
            Expr::Iff(lhs, rhs) => lhs.eval(assignment) == rhs.eval(assignment),
        }
    }

    /// Negation, folding constants and double negation.
    pub fn negate(self) -> Expr {
        match self {
            Expr::Const(value) => Expr::Const(!value),
            Expr::Not(inner) => *inner,
            other => Expr::Not(Box::new(other)),
        }
    }
}

/// A parsed expression together with the names of its variables.
///
/// Variables are numbered in order of first appearance. Variable `i` is
/// bit `i` of an assignment, character `i` of a bitstring, and qubit `i` of
/// the oracle built from the expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolExpr {
    root: Expr,
    variables: Vec<String>,
}

impl BoolExpr {
    /// Pair an expression tree with its variable table.
    ///
    /// Every `VarId` in `root` must index into `variables`.
    pub fn new(root: Expr, variables: Vec<String>) -> Self {
        Self { root, variables }
    }

    /// The expression tree.
    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// Variable names, indexed by `VarId`.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Position of the named variable.
    pub fn variable_index(&self, name: &str) -> Option<VarId> {
        self.variables.iter().position(|v| v == name).map(VarId)
    }

    /// Evaluate with bit `i` of `assignment` as the value of variable `i`.
    pub fn evaluate(&self, assignment: u64) -> bool {
        self.root.eval(assignment)
    }

    /// Evaluate a bitstring whose character `i` is the value of variable `i`.
    pub fn evaluate_bitstring(&self, bits: &str) -> LogicResult<bool> {
        let assignment = parse_bitstring(bits, self.num_variables())?;
        Ok(self.evaluate(assignment))
    }

    /// Render an assignment as a bitstring over this expression's variables.
    pub fn bitstring(&self, assignment: u64) -> String {
        to_bitstring(assignment, self.num_variables())
    }

    /// Name each variable's value under `assignment`.
    pub fn assignment_map(&self, assignment: u64) -> Vec<(String, bool)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), (assignment >> i) & 1 == 1))
            .collect()
    }

    /// Enumerate every assignment.
    pub fn truth_table(&self) -> LogicResult<TruthTable> {
        let count = self.num_variables();
        if count > MAX_VARIABLES {
            return Err(LogicError::TooManyVariables {
                count,
                max: MAX_VARIABLES,
            });
        }
        Ok(TruthTable::from_fn(count, |x| self.evaluate(x)))
    }

    fn write_expr(&self, expr: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match expr {
            Expr::Const(value) => write!(f, "{value}"),
            Expr::Var(VarId(i)) => match self.variables.get(*i) {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "<v{i}>"),
            },
            Expr::Not(inner) => {
                write!(f, "~")?;
                self.write_expr(inner, f)
            }
            Expr::And(ops) => self.write_nary(ops, " & ", f),
            Expr::Or(ops) => self.write_nary(ops, " | ", f),
            Expr::Xor(ops) => self.write_nary(ops, " ^ ", f),
            Expr::Implies(lhs, rhs) => self.write_binary(lhs, " -> ", rhs, f),
            Expr::Iff(lhs, rhs) => self.write_binary(lhs, " <-> ", rhs, f),
        }
    }

    fn write_nary(&self, ops: &[Expr], sep: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = ops {
            return self.write_expr(only, f);
        }
        write!(f, "(")?;
        for (i, op) in ops.iter().enumerate() {
            if i > 0 {
                write!(f, "{sep}")?;
            }
            self.write_expr(op, f)?;
        }
        write!(f, ")")
    }

    fn write_binary(
        &self,
        lhs: &Expr,
        sep: &str,
        rhs: &Expr,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "(")?;
        self.write_expr(lhs, f)?;
        write!(f, "{sep}")?;
        self.write_expr(rhs, f)?;
        write!(f, ")")
    }
}

impl fmt::Display for BoolExpr {
    /// Fully parenthesised form that parses back to an equivalent expression.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_expr(&self.root, f)
    }
}
