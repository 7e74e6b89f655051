//! Expression templates with named placeholders.
//!
//! `{name}` is replaced by the value bound to `name`; `{{` and `}}` stand for
//! literal braces. Binding guest names into
//! `({a} & {b}) | ({c} & {d})` turns one formula shape into many puzzles.

use rustc_hash::FxHashMap;

use crate::ast::BoolExpr;
use crate::error::{LogicError, LogicResult};
use crate::parser;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A validated template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template text, rejecting stray braces and empty or malformed
    /// placeholder names.
    pub fn new(source: impl Into<String>) -> LogicResult<Self> {
        let source = source.into();
        let segments = split(&source)?;
        Ok(Self { source, segments })
    }

    /// The original template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder.
    pub fn render(&self, bindings: &FxHashMap<String, String>) -> LogicResult<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = bindings
                        .get(name)
                        .ok_or_else(|| LogicError::MissingBinding(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    /// Substitute from `(name, value)` pairs.
    pub fn render_pairs(&self, pairs: &[(&str, &str)]) -> LogicResult<String> {
        let bindings: FxHashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.render(&bindings)
    }

    /// Substitute and parse the result as an expression.
    pub fn instantiate(&self, bindings: &FxHashMap<String, String>) -> LogicResult<BoolExpr> {
        parser::parse(&self.render(bindings)?)
    }
}

fn split(source: &str) -> LogicResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if chars.peek().is_some_and(|&(_, n)| n == '{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek().is_some_and(|&(_, n)| n == '}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(LogicError::UnbalancedBrace { position: pos }),
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    name.push(n);
                }
                if !closed {
                    return Err(LogicError::UnbalancedBrace { position: pos });
                }
                if !is_identifier(&name) {
                    return Err(LogicError::InvalidPlaceholder {
                        position: pos,
                        name,
                    });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(name));
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
