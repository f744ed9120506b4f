pub mod ast;
pub mod color;
pub mod edit;
pub mod error;
pub mod from_json;
pub mod json;
pub mod parser;
pub mod project;
pub mod resolve;
pub mod store;
pub mod symbols;
pub mod tree;
pub mod validate;
pub mod value;

pub use ast::{Expr, Reference};
pub use edit::{EditRecord, EditRecorder, EditStatus};
pub use error::ThemeError;
pub use from_json::ThemeDocument;
pub use json::JsonStyle;
pub use project::{project_symbols, project_template};
pub use resolve::{resolve, ResolvedNode, ResolvedTree};
pub use store::{Mutation, Outcome, ThemeState, ThemeStore};
pub use symbols::{Symbol, SymbolEdits, SymbolTable};
pub use tree::{Branch, Property, TemplateEdits, TemplateNode, TemplateTree};
pub use validate::{validate_references, ValidationError};
pub use value::{NoExtension, Value};

// ── Core API ───────────────────────────────────────────────────────

/// The result of rendering a theme document.
pub struct ThemeResult<T = NoExtension> {
    pub theme: ResolvedTree<T>,
    /// Reference problems found in the edited theme. Never fatal.
    pub warnings: Vec<ValidationError>,
}

/// Load a theme document, apply its pending edits and resolve it.
///
/// Fails only if the document cannot be loaded; reference problems are
/// returned as warnings alongside the resolved theme.
pub fn render_theme(input: &str) -> Result<ThemeResult, ThemeError> {
    let document = ThemeDocument::<NoExtension>::from_json(input)?;
    let state = ThemeState::from_document(document);
    Ok(ThemeResult {
        theme: state.resolved(),
        warnings: state.lint(),
    })
}
