//! qsat Walkthrough
//!
//! Runs the flow end to end on a few built-in problems:
//! an expression (typed, read from DIMACS, or rendered from a template)
//! becomes a phase oracle, Grover search runs on the statevector
//! simulator, and the final counts are charted with solutions marked.
//!
//! ```no_run
//! use qsat_demos::runner::{DemoRunner, print_outcome};
//! use qsat_demos::scenarios;
//!
//! # async fn demo() -> qsat_search::SearchResult<()> {
//! let runner = DemoRunner::new().with_seed(7);
//! for scenario in scenarios::catalog() {
//!     let outcome = runner.run(scenario).await?;
//!     print_outcome(&outcome);
//! }
//! # Ok(())
//! # }
//! ```

pub mod runner;
pub mod scenarios;

use console::style;

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}
