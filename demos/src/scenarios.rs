//! Built-in problems for the walkthrough.

use qsat_logic::{BoolExpr, LogicResult, Template, dimacs};

/// Who to invite when Olivia and Abe come only as a pair, so do Jin and
/// Amira, and Abe and Amira refuse to meet.
pub const PARTY: &str = "((Olivia & Abe) | (Jin & Amira)) & ~(Abe & Amira)";

/// Exactly one assignment of four variables.
pub const SINGLE_SOLUTION: &str = "(w ^ x) & ~(y ^ z) & (x & y & z)";

/// Five clauses over three variables, satisfied by 000, 110 and 101.
pub const THREE_SAT: &str = "\
c example DIMACS-CNF 3-SAT
p cnf 3 5
-1 -2 -3 0
1 -2 3 0
1 2 -3 0
1 -2 -3 0
-1 2 3 0
";

/// Where a scenario's expression comes from.
#[derive(Debug, Clone, Copy)]
pub enum ProblemSource {
    /// Infix expression.
    Expression(&'static str),
    /// DIMACS CNF text.
    Dimacs(&'static str),
    /// Template and its `(placeholder, name)` bindings.
    Template {
        source: &'static str,
        bindings: &'static [(&'static str, &'static str)],
    },
}

/// A named walkthrough problem.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    /// Short name used on the command line.
    pub name: &'static str,
    /// Heading shown before the run.
    pub title: &'static str,
    /// One-line story behind the problem.
    pub description: &'static str,
    /// Where the expression is read from.
    pub source: ProblemSource,
}

impl Scenario {
    /// Build the expression.
    pub fn expression(&self) -> LogicResult<BoolExpr> {
        match self.source {
            ProblemSource::Expression(source) => qsat_logic::parse(source),
            ProblemSource::Dimacs(source) => dimacs::parse(source),
            ProblemSource::Template { source, bindings } => {
                let rendered = Template::new(source)?.render_pairs(bindings)?;
                qsat_logic::parse(&rendered)
            }
        }
    }

    /// Human-readable form of the source.
    pub fn source_text(&self) -> String {
        match self.source {
            ProblemSource::Expression(source) => source.to_string(),
            ProblemSource::Dimacs(source) => source
                .lines()
                .find(|line| line.starts_with('p'))
                .unwrap_or("DIMACS")
                .to_string(),
            ProblemSource::Template { source, bindings } => {
                let pairs: Vec<String> = bindings.iter().map(|(k, v)| format!("{k}={v}")).collect();
                format!("{source} with {}", pairs.join(", "))
            }
        }
    }
}

/// All built-in scenarios, in presentation order.
pub fn catalog() -> &'static [Scenario] {
    &[
        Scenario {
            name: "party",
            title: "Dinner Party Invitations",
            description: "Four guests with pairing constraints; four valid guest lists",
            source: ProblemSource::Expression(PARTY),
        },
        Scenario {
            name: "single",
            title: "Single Solution",
            description: "One satisfying assignment among sixteen",
            source: ProblemSource::Expression(SINGLE_SOLUTION),
        },
        Scenario {
            name: "3sat",
            title: "DIMACS 3-SAT",
            description: "A CNF problem read from DIMACS text",
            source: ProblemSource::Dimacs(THREE_SAT),
        },
        Scenario {
            name: "template",
            title: "Expression Template",
            description: "Placeholders bound to weather conditions",
            source: ProblemSource::Template {
                source: "{a} & {b} & ~{c}",
                bindings: &[("a", "rain"), ("b", "wind"), ("c", "sun")],
            },
        },
    ]
}

/// Look up a scenario by name, ignoring case.
pub fn find(name: &str) -> Option<&'static Scenario> {
    catalog()
        .iter()
        .find(|scenario| scenario.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_expressions_parse() {
        for scenario in catalog() {
            let expr = scenario.expression().unwrap();
            assert!(expr.num_variables() > 0, "{}", scenario.name);
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("PARTY").unwrap().name, "party");
        assert!(find("missing").is_none());
    }

    #[test]
    fn test_template_variables() {
        let expr = find("template").unwrap().expression().unwrap();
        assert_eq!(expr.variables(), ["rain", "wind", "sun"]);
    }

    #[test]
    fn test_source_text() {
        assert_eq!(find("3sat").unwrap().source_text(), "p cnf 3 5");
        assert_eq!(
            find("template").unwrap().source_text(),
            "{a} & {b} & ~{c} with a=rain, b=wind, c=sun"
        );
    }
}
