//! Boolean expressions for qsat.
//!
//! This crate reads the problems qsat solves: infix Boolean expressions,
//! DIMACS CNF files, and templates that produce expressions by substituting
//! names. It also enumerates them classically, which gives the search layer
//! its phase-oracle synthesis input and its reference answers.
//!
//! # Grammar
//!
//! | Operator | Spelling | Binding |
//! |----------|----------|---------|
//! | equivalence | `<->` | loosest |
//! | implication | `->` | right-associative |
//! | or | `\|`, `\|\|` | |
//! | xor | `^` | |
//! | and | `&`, `&&` | |
//! | not | `~`, `!` | tightest |
//!
//! Constants are `true`/`false` or `1`/`0`; `#` starts a comment.
//!
//! # Example
//!
//! ```rust
//! let expr = qsat_logic::parse("((Olivia & Abe) | (Jin & Amira)) & ~(Abe & Amira)").unwrap();
//! assert_eq!(expr.variables(), ["Olivia", "Abe", "Jin", "Amira"]);
//!
//! let table = expr.truth_table().unwrap();
//! assert_eq!(table.count_satisfying(), 4);
//! assert!(expr.evaluate_bitstring("1100").unwrap());
//! ```

pub mod ast;
pub mod bits;
pub mod dimacs;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod template;
pub mod truth_table;

pub use ast::{BoolExpr, Expr, MAX_VARIABLES, VarId};
pub use bits::{parse_bitstring, to_bitstring};
pub use error::{LogicError, LogicResult};
pub use parser::{MAX_DEPTH, parse};
pub use template::Template;
pub use truth_table::TruthTable;
