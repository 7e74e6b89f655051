//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rustc_hash::FxHashMap;

use qsat_hal::Histogram;
use qsat_logic::{BoolExpr, Template, dimacs};
use qsat_search::Synthesis;

/// Where the Boolean problem comes from. Exactly one source is required.
#[derive(Args, Debug, Clone)]
pub struct ProblemArgs {
    /// Boolean expression, e.g. "(a | b) & ~c"
    #[arg(
        required_unless_present_any = ["dimacs", "template"],
        conflicts_with_all = ["dimacs", "template"]
    )]
    pub expression: Option<String>,

    /// DIMACS CNF file
    #[arg(long, value_name = "FILE", conflicts_with = "template")]
    pub dimacs: Option<PathBuf>,

    /// Expression template with {name} placeholders
    #[arg(short, long)]
    pub template: Option<String>,

    /// Template binding, repeatable
    #[arg(short, long = "bind", value_name = "NAME=VALUE", requires = "template")]
    pub bind: Vec<String>,
}

/// Read the problem described by `args`.
pub fn load_problem(args: &ProblemArgs) -> Result<BoolExpr> {
    if let Some(path) = &args.dimacs {
        return load_dimacs(path);
    }
    if let Some(template) = &args.template {
        let template = Template::new(template.as_str())
            .with_context(|| format!("Invalid template: {template}"))?;
        let bindings = parse_bindings(&args.bind)?;
        return template
            .instantiate(&bindings)
            .context("Failed to instantiate template");
    }
    match &args.expression {
        Some(source) => {
            qsat_logic::parse(source).with_context(|| format!("Invalid expression: {source}"))
        }
        None => anyhow::bail!("No problem given: pass an expression, --dimacs or --template"),
    }
}

/// Load and parse a DIMACS CNF file.
pub fn load_dimacs(path: &Path) -> Result<BoolExpr> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    dimacs::parse(&source).with_context(|| format!("Invalid DIMACS file: {}", path.display()))
}

/// Split `NAME=VALUE` pairs.
pub fn parse_bindings(pairs: &[String]) -> Result<FxHashMap<String, String>> {
    let mut bindings = FxHashMap::default();
    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            anyhow::bail!("Invalid binding '{pair}': expected NAME=VALUE");
        };
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("Invalid binding '{pair}': empty name");
        }
        bindings.insert(name.to_string(), value.trim().to_string());
    }
    Ok(bindings)
}

/// Parse a synthesis name, falling back to `default`.
pub fn resolve_synthesis(name: Option<&str>, default: Synthesis) -> Result<Synthesis> {
    match name {
        Some(name) => Ok(name.parse()?),
        None => Ok(default),
    }
}

/// A spinner for work of unknown length.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print a section heading.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
}

/// Print a labelled value.
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a histogram with marked rows highlighted.
pub fn print_histogram(histogram: &Histogram) {
    let count_width = histogram
        .rows()
        .iter()
        .map(|r| r.count.to_string().len())
        .max()
        .unwrap_or(1);

    for row in histogram.rows() {
        let bar = "█".repeat(row.bar_len);
        let mark = if row.marked {
            format!(" {}", style("✓").green().bold())
        } else {
            String::new()
        };
        let bits = if row.marked {
            style(row.bitstring.as_str()).green().bold()
        } else {
            style(row.bitstring.as_str()).cyan()
        };
        println!(
            "  {}: {:>count_width$} ({:>5.1}%) {}{}",
            bits,
            row.count,
            row.probability * 100.0,
            style(bar).blue(),
            mark
        );
    }

    if histogram.hidden() > 0 {
        println!("  ... and {} more outcomes", histogram.hidden());
    }
}

/// Names of the variables set in `assignment`, or "(none)".
pub fn true_variables(expr: &BoolExpr, assignment: u64) -> String {
    let names: Vec<String> = expr
        .assignment_map(assignment)
        .into_iter()
        .filter(|(_, value)| *value)
        .map(|(name, _)| name)
        .collect();
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bindings() {
        let bindings =
            parse_bindings(&["a=Olivia".to_string(), " b = Abe ".to_string()]).unwrap();
        assert_eq!(bindings["a"], "Olivia");
        assert_eq!(bindings["b"], "Abe");

        assert!(parse_bindings(&["novalue".to_string()]).is_err());
        assert!(parse_bindings(&["=x".to_string()]).is_err());
    }

    #[test]
    fn test_load_template_problem() {
        let args = ProblemArgs {
            expression: None,
            dimacs: None,
            template: Some("{p} & ~{q}".into()),
            bind: vec!["p=rain".into(), "q=sun".into()],
        };
        let expr = load_problem(&args).unwrap();
        assert_eq!(expr.variables(), ["rain", "sun"]);
    }

    #[test]
    fn test_load_dimacs_problem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.cnf");
        fs::write(&path, "p cnf 2 1\n1 2 0\n").unwrap();
        let expr = load_dimacs(&path).unwrap();
        assert_eq!(expr.truth_table().unwrap().count_satisfying(), 3);

        let missing = load_dimacs(&dir.path().join("missing.cnf"));
        assert!(missing.unwrap_err().to_string().contains("File not found"));
    }

    #[test]
    fn test_resolve_synthesis() {
        assert_eq!(
            resolve_synthesis(Some("minterm"), Synthesis::Anf).unwrap(),
            Synthesis::Minterm
        );
        assert_eq!(resolve_synthesis(None, Synthesis::Anf).unwrap(), Synthesis::Anf);
        assert!(resolve_synthesis(Some("bogus"), Synthesis::Anf).is_err());
    }

    #[test]
    fn test_true_variables() {
        let expr = qsat_logic::parse("a & b & c").unwrap();
        assert_eq!(true_variables(&expr, 0b101), "a, c");
        assert_eq!(true_variables(&expr, 0), "(none)");
    }
}
