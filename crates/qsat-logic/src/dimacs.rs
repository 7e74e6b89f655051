//! Reader for DIMACS CNF files.
//!
//! ```text
//! c comment
//! p cnf 3 2
//! 1 -2 0
//! 2 3 -1 0
//! ```
//!
//! Clauses may span lines and are terminated by `0`. A line holding only
//! `%` ends the input. Variable `k` is named `xk`; variables declared in the
//! header but never used still count.

use tracing::{debug, warn};

use crate::ast::{BoolExpr, Expr, VarId};
use crate::error::{LogicError, LogicResult};

/// Parse DIMACS CNF text into a conjunction of clauses.
pub fn parse(source: &str) -> LogicResult<BoolExpr> {
    let mut header: Option<(usize, usize)> = None;
    let mut clauses: Vec<Expr> = Vec::new();
    let mut current: Vec<Expr> = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        if line.starts_with('%') {
            break;
        }
        if line.starts_with('p') {
            if header.is_some() {
                return Err(dimacs_error(line_no, "duplicate problem line"));
            }
            header = Some(parse_header(line, line_no)?);
            continue;
        }
        let Some((num_vars, _)) = header else {
            return Err(dimacs_error(line_no, "clause before 'p cnf' problem line"));
        };

        for word in line.split_whitespace() {
            let literal: i64 = word
                .parse()
                .map_err(|_| dimacs_error(line_no, format!("invalid literal '{word}'")))?;
            if literal == 0 {
                clauses.push(clause(std::mem::take(&mut current)));
                continue;
            }
            let var = usize::try_from(literal.unsigned_abs())
                .map_err(|_| dimacs_error(line_no, format!("literal {literal} out of range")))?;
            if var > num_vars {
                return Err(dimacs_error(
                    line_no,
                    format!("literal {literal} exceeds declared variable count {num_vars}"),
                ));
            }
            let atom = Expr::Var(VarId(var - 1));
            current.push(if literal < 0 { atom.negate() } else { atom });
        }
    }

    let Some((num_vars, num_clauses)) = header else {
        return Err(dimacs_error(0, "missing 'p cnf' problem line"));
    };
    if !current.is_empty() {
        clauses.push(clause(current));
    }
    if clauses.len() != num_clauses {
        warn!(
            declared = num_clauses,
            found = clauses.len(),
            "DIMACS clause count differs from problem line"
        );
    }
    debug!(variables = num_vars, clauses = clauses.len(), "parsed DIMACS CNF");

    let root = match clauses.len() {
        0 => Expr::Const(true),
        1 => clauses.remove(0),
        _ => Expr::And(clauses),
    };
    let variables = (1..=num_vars).map(|k| format!("x{k}")).collect();
    Ok(BoolExpr::new(root, variables))
}

fn parse_header(line: &str, line_no: usize) -> LogicResult<(usize, usize)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        ["p", "cnf", vars, clauses] => {
            let vars = vars
                .parse()
                .map_err(|_| dimacs_error(line_no, format!("invalid variable count '{vars}'")))?;
            let clauses = clauses
                .parse()
                .map_err(|_| dimacs_error(line_no, format!("invalid clause count '{clauses}'")))?;
            Ok((vars, clauses))
        }
        _ => Err(dimacs_error(
            line_no,
            format!("expected 'p cnf <variables> <clauses>', found '{line}'"),
        )),
    }
}

fn clause(literals: Vec<Expr>) -> Expr {
    match literals.len() {
        0 => Expr::Const(false),
        1 => literals.into_iter().next().unwrap_or(Expr::Const(false)),
        _ => Expr::Or(literals),
    }
}

fn dimacs_error(line: usize, message: impl Into<String>) -> LogicError {
    LogicError::Dimacs {
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_SAT: &str = "\
c example DIMACS-CNF 3-SAT
p cnf 3 5
-1 -2 -3 0
1 -2 3 0
1 2 -3 0
1 -2 -3 0
-1 2 3 0
";

    #[test]
    fn test_three_sat_solutions() {
        let expr = parse(THREE_SAT).unwrap();
        assert_eq!(expr.variables(), ["x1", "x2", "x3"]);
        let table = expr.truth_table().unwrap();
        assert_eq!(table.satisfying_bitstrings(), vec!["000", "110", "101"]);
    }

    #[test]
    fn test_clause_spanning_lines_and_terminator() {
        let expr = parse("p cnf 2 1\n1\n-2 0\n%\n0\n").unwrap();
        assert_eq!(
            expr.root(),
            &Expr::Or(vec![
                Expr::Var(VarId(0)),
                Expr::Not(Box::new(Expr::Var(VarId(1))))
            ])
        );
    }

    #[test]
    fn test_unused_variables_are_kept() {
        let expr = parse("p cnf 4 1\n2 0\n").unwrap();
        assert_eq!(expr.num_variables(), 4);
        assert_eq!(expr.root(), &Expr::Var(VarId(1)));
    }

    #[test]
    fn test_trailing_clause_without_zero() {
        let expr = parse("p cnf 2 2\n1 0\n2").unwrap();
        assert_eq!(
            expr.root(),
            &Expr::And(vec![Expr::Var(VarId(0)), Expr::Var(VarId(1))])
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse("1 2 0\n"),
            Err(LogicError::Dimacs { line: 1, .. })
        ));
        assert!(matches!(
            parse("p cnf 2 1\n1 3 0\n"),
            Err(LogicError::Dimacs { line: 2, .. })
        ));
        assert!(matches!(
            parse("p cnf 2 1\n1 x 0\n"),
            Err(LogicError::Dimacs { line: 2, .. })
        ));
        assert!(matches!(
            parse("p dnf 2 1\n"),
            Err(LogicError::Dimacs { line: 1, .. })
        ));
        assert!(matches!(parse("c nothing\n"), Err(LogicError::Dimacs { .. })));
    }

    #[test]
    fn test_empty_clause_is_false() {
        let expr = parse("p cnf 1 2\n1 0\n0\n").unwrap();
        assert_eq!(expr.truth_table().unwrap().count_satisfying(), 0);
    }
}
