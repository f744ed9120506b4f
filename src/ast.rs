//! Expressions held by template properties.
//!
//! Strings are classified once, when the expression is built: anything that
//! matches the reference grammar becomes a `Reference`, everything else is a
//! `Literal` and is never looked up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shade level used when a reference has no `-G` modifier.
pub const DEFAULT_LEVEL: u8 = 5;
/// Opacity used when a reference has no `-A` modifier.
pub const DEFAULT_OPACITY: u8 = 100;

/// A parsed `@name(-G<n>)?(-A<n>)?` reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// The symbol name, e.g. `@brand-primary`.
    pub name: String,
    /// `-G<digit>`, if written.
    pub level: Option<u8>,
    /// `-A<1-3 digits>`, if written. Not clamped here.
    pub opacity: Option<u16>,
    /// The exact text the reference was parsed from.
    pub source: String,
}

impl Reference {
    pub fn level(&self) -> u8 {
        self.level.unwrap_or(DEFAULT_LEVEL)
    }

    /// Opacity percentage, clamped to 0..=100.
    pub fn opacity(&self) -> u8 {
        match self.opacity {
            Some(n) => n.min(DEFAULT_OPACITY as u16) as u8,
            None => DEFAULT_OPACITY,
        }
    }

    /// Whether either modifier was written explicitly.
    pub fn has_modifiers(&self) -> bool {
        self.level.is_some() || self.opacity.is_some()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A property expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawExpr", into = "RawExpr")]
pub enum Expr {
    Number(f64),
    /// A string that is not a reference.
    Literal(String),
    Reference(Reference),
    List(Vec<Expr>),
}

impl Expr {
    /// Build an expression from a string, classifying it as a reference or literal.
    pub fn from_text(text: &str) -> Expr {
        match crate::parser::parse_reference(text) {
            Some(reference) => Expr::Reference(reference),
            None => Expr::Literal(text.to_string()),
        }
    }

    /// The string form of a literal or reference.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Expr::Literal(s) => Some(s),
            Expr::Reference(r) => Some(&r.source),
            _ => None,
        }
    }

    /// Visit every reference in this expression, depth first.
    pub fn references(&self) -> Vec<&Reference> {
        let mut out = Vec::new();
        collect_references(self, &mut out);
        out
    }
}

fn collect_references<'a>(expr: &'a Expr, out: &mut Vec<&'a Reference>) {
    match expr {
        Expr::Reference(r) => out.push(r),
        Expr::List(items) => {
            for item in items {
                collect_references(item, out);
            }
        }
        Expr::Number(_) | Expr::Literal(_) => {}
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::Number(n)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::from_text(s)
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Expr::List(items)
    }
}

/// Wire shape of an expression: plain JSON number, string or array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawExpr {
    Number(f64),
    Text(String),
    List(Vec<RawExpr>),
}

impl From<RawExpr> for Expr {
    fn from(raw: RawExpr) -> Self {
        match raw {
            RawExpr::Number(n) => Expr::Number(n),
            RawExpr::Text(s) => Expr::from_text(&s),
            RawExpr::List(items) => Expr::List(items.into_iter().map(Expr::from).collect()),
        }
    }
}

impl From<Expr> for RawExpr {
    fn from(expr: Expr) -> Self {
        match expr {
            Expr::Number(n) => RawExpr::Number(n),
            Expr::Literal(s) => RawExpr::Text(s),
            Expr::Reference(r) => RawExpr::Text(r.source),
            Expr::List(items) => RawExpr::List(items.into_iter().map(RawExpr::from).collect()),
        }
    }
}
