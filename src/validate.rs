use crate::ast::{Expr, Reference};
use crate::color::is_color;
use crate::symbols::SymbolTable;
use crate::tree::{TemplateNode, TemplateTree};
use crate::value::Value;

// ── Error types ─────────────────────────────────────────────────────

/// A problem found while linting template references.
///
/// Lint findings never affect resolution; a flagged reference still
/// resolves to its literal fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub message: String,
    /// Path in the tree where the problem was found (e.g. ["button", "bg", "[1]"]).
    pub path: Vec<String>,
    /// Machine-readable error code.
    pub code: &'static str,
}

// ── Reference validation ────────────────────────────────────────────

/// Check every reference in `template` against `symbols`.
///
/// Returns an empty vec when every reference names a symbol and every
/// modifier is applied to a color.
pub fn validate_references<T>(
    symbols: &SymbolTable<T>,
    template: &TemplateTree,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut path: Vec<String> = Vec::new();
    walk_tree(template, symbols, &mut path, &mut errors);
    errors
}

fn walk_tree<T>(
    tree: &TemplateTree,
    symbols: &SymbolTable<T>,
    path: &mut Vec<String>,
    errors: &mut Vec<ValidationError>,
) {
    for (segment, node) in tree {
        path.push(segment.clone());
        match node {
            TemplateNode::Property(property) => walk_expr(&property.value, symbols, path, errors),
            TemplateNode::Branch(branch) => walk_tree(&branch.children, symbols, path, errors),
        }
        path.pop();
    }
}

fn walk_expr<T>(
    expr: &Expr,
    symbols: &SymbolTable<T>,
    path: &mut Vec<String>,
    errors: &mut Vec<ValidationError>,
) {
    match expr {
        Expr::Reference(reference) => check_reference(reference, symbols, path, errors),
        Expr::List(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(format!("[{}]", i));
                walk_expr(item, symbols, path, errors);
                path.pop();
            }
        }
        Expr::Number(_) | Expr::Literal(_) => {}
    }
}

fn check_reference<T>(
    reference: &Reference,
    symbols: &SymbolTable<T>,
    path: &[String],
    errors: &mut Vec<ValidationError>,
) {
    let Some(symbol) = symbols.get(&reference.name) else {
        errors.push(ValidationError {
            message: format!("Reference \"{}\" does not name a symbol", reference),
            path: path.to_vec(),
            code: "unresolved-reference",
        });
        return;
    };

    if !reference.has_modifiers() {
        return;
    }
    if let Value::Text(text) = &symbol.value {
        if !is_color(text) {
            errors.push(ValidationError {
                message: format!(
                    "Reference \"{}\" applies modifiers to \"{}\", which is not a color",
                    reference, text
                ),
                path: path.to_vec(),
                code: "modifier-on-non-color",
            });
        }
    }
    if reference.opacity.is_some_and(|a| a > 100) {
        errors.push(ValidationError {
            message: format!("Opacity in \"{}\" is above 100 and will be clamped", reference),
            path: path.to_vec(),
            code: "opacity-out-of-range",
        });
    }
}
