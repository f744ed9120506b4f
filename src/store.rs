//! An observable editing session.
//!
//! `ThemeStore` owns the current `ThemeState` snapshot. Mutations are
//! dispatched as values; each one produces a new snapshot and leaves every
//! previously returned snapshot untouched.

use crate::ast::Expr;
use crate::error::ThemeError;
use crate::from_json::ThemeDocument;
use crate::parser::check_symbol_name;
use crate::project::{project_symbols, project_template};
use crate::resolve::{resolve, ResolvedTree};
use crate::symbols::{Symbol, SymbolEdits, SymbolTable};
use crate::tree::{Property, TemplateEdits, TemplateTree};
use crate::validate::{validate_references, ValidationError};
use crate::value::{NoExtension, Value};
use serde::Deserialize;
use std::sync::Arc;

/// Whether a dispatched mutation changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The mutation was accepted but had no effect (an edit to a key that
    /// does not exist, an edit through a property, an undo of nothing).
    Unchanged,
}

/// One edit to a session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation<T = NoExtension> {
    AddSymbol { name: String, symbol: Symbol<T> },
    DeleteSymbol { name: String },
    ChangeSymbolValue { name: String, value: Value<T> },
    ChangeSymbolDesc { name: String, desc: String },
    UndoSymbol {
        #[serde(default)]
        name: Option<String>,
    },
    AddBranch { path: String, desc: String },
    AddProperty { path: String, property: Property },
    DeleteNode { path: String },
    ChangePropertyValue { path: String, value: Expr },
    ChangeNodeDesc { path: String, desc: String },
    UndoTemplate {
        #[serde(default)]
        path: Option<String>,
    },
}

impl<T> Mutation<T> {
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::AddSymbol { .. } => "addSymbol",
            Mutation::DeleteSymbol { .. } => "deleteSymbol",
            Mutation::ChangeSymbolValue { .. } => "changeSymbolValue",
            Mutation::ChangeSymbolDesc { .. } => "changeSymbolDesc",
            Mutation::UndoSymbol { .. } => "undoSymbol",
            Mutation::AddBranch { .. } => "addBranch",
            Mutation::AddProperty { .. } => "addProperty",
            Mutation::DeleteNode { .. } => "deleteNode",
            Mutation::ChangePropertyValue { .. } => "changePropertyValue",
            Mutation::ChangeNodeDesc { .. } => "changeNodeDesc",
            Mutation::UndoTemplate { .. } => "undoTemplate",
        }
    }
}

// ── State ───────────────────────────────────────────────────────────

/// An immutable snapshot of a session: base structures plus pending edits.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeState<T = NoExtension> {
    pub symbols: SymbolTable<T>,
    pub template: TemplateTree,
    pub symbol_edits: SymbolEdits<T>,
    pub template_edits: TemplateEdits,
}

impl<T: Clone> ThemeState<T> {
    pub fn from_document(document: ThemeDocument<T>) -> Self {
        ThemeState {
            symbols: document.symbols,
            template: document.template,
            symbol_edits: document.symbol_edits,
            template_edits: document.template_edits,
        }
    }

    /// The symbol table with pending edits applied.
    pub fn edited_symbols(&self) -> SymbolTable<T> {
        project_symbols(&self.symbols, &self.symbol_edits)
    }

    /// The template tree with pending edits applied.
    pub fn edited_template(&self) -> TemplateTree {
        project_template(&self.template, &self.template_edits)
    }

    /// The edited template resolved against the edited symbols.
    pub fn resolved(&self) -> ResolvedTree<T> {
        resolve(&self.edited_symbols(), &self.edited_template())
    }

    /// Reference problems in the edited theme.
    pub fn lint(&self) -> Vec<ValidationError> {
        validate_references(&self.edited_symbols(), &self.edited_template())
    }

    /// Check that `name` could be added as a new symbol.
    pub fn check_new_symbol(&self, name: &str) -> Result<(), ThemeError> {
        check_symbol_name(name)?;
        if self.edited_symbols().contains(name) {
            return Err(ThemeError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Check that nothing exists at `path` in the edited tree.
    pub fn check_new_path(&self, path: &str) -> Result<(), ThemeError> {
        if self.edited_template().contains_path(path) {
            return Err(ThemeError::DuplicatePath {
                path: path.to_string(),
            });
        }
        Ok(())
    }

    /// The snapshot after `mutation`. Fails only on an invalid symbol add.
    pub fn apply(&self, mutation: Mutation<T>) -> Result<Self, ThemeError> {
        let mut next = self.clone();
        match mutation {
            Mutation::AddSymbol { name, symbol } => {
                next.symbol_edits = self.symbol_edits.add_symbol(&name, symbol)?;
            }
            Mutation::DeleteSymbol { name } => {
                next.symbol_edits = self.symbol_edits.delete_symbol(&self.symbols, &name);
            }
            Mutation::ChangeSymbolValue { name, value } => {
                next.symbol_edits = self
                    .symbol_edits
                    .change_symbol_value(&self.symbols, &name, value)?;
            }
            Mutation::ChangeSymbolDesc { name, desc } => {
                next.symbol_edits = self
                    .symbol_edits
                    .change_symbol_desc(&self.symbols, &name, &desc);
            }
            Mutation::UndoSymbol { name } => {
                next.symbol_edits = self.symbol_edits.undo_symbol(name.as_deref());
            }
            Mutation::AddBranch { path, desc } => {
                next.template_edits = self.template_edits.add_branch(&path, &desc);
            }
            Mutation::AddProperty { path, property } => {
                next.template_edits = self.template_edits.add_property(&path, property);
            }
            Mutation::DeleteNode { path } => {
                next.template_edits = self.template_edits.delete_node(&self.template, &path);
            }
            Mutation::ChangePropertyValue { path, value } => {
                next.template_edits =
                    self.template_edits
                        .change_property_value(&self.template, &path, value);
            }
            Mutation::ChangeNodeDesc { path, desc } => {
                next.template_edits = self
                    .template_edits
                    .change_node_desc(&self.template, &path, &desc);
            }
            Mutation::UndoTemplate { path } => {
                next.template_edits = self.template_edits.undo_template(path.as_deref());
            }
        }
        Ok(next)
    }
}

// ── Store ───────────────────────────────────────────────────────────

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn Fn(&Arc<ThemeState<T>>)>;

/// Holds the current session snapshot and notifies listeners on change.
///
/// Single writer: `dispatch` takes `&mut self`, so edits are serialized by
/// the borrow checker. Readers keep whatever `Arc` they were handed.
pub struct ThemeStore<T = NoExtension> {
    state: Option<Arc<ThemeState<T>>>,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T> Default for ThemeStore<T> {
    fn default() -> Self {
        ThemeStore {
            state: None,
            listeners: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone + PartialEq> ThemeStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from `document`, replacing any current one.
    pub fn set_theme(&mut self, document: ThemeDocument<T>) -> Result<(), ThemeError> {
        document.check()?;
        tracing::debug!(
            symbols = document.symbols.len(),
            nodes = document.template.len(),
            "theme loaded"
        );
        self.replace(ThemeState::from_document(document));
        Ok(())
    }

    /// The current snapshot, if a theme has been loaded.
    pub fn get_state(&self) -> Option<Arc<ThemeState<T>>> {
        self.state.clone()
    }

    /// The current snapshot, or `NoTheme`.
    pub fn state(&self) -> Result<&Arc<ThemeState<T>>, ThemeError> {
        self.state.as_ref().ok_or(ThemeError::NoTheme)
    }

    pub fn subscribe(&mut self, listener: impl Fn(&Arc<ThemeState<T>>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Apply one mutation.
    ///
    /// Listeners are notified only when the snapshot actually changed. On
    /// error the current snapshot is kept and nobody is notified.
    pub fn dispatch(&mut self, mutation: Mutation<T>) -> Result<Outcome, ThemeError> {
        let kind = mutation.kind();
        let current = self.state()?;
        let next = current.apply(mutation).inspect_err(|err| {
            tracing::debug!(kind, code = err.code(), "mutation rejected");
        })?;
        if next == **current {
            tracing::debug!(kind, "mutation had no effect");
            return Ok(Outcome::Unchanged);
        }
        tracing::debug!(kind, "mutation applied");
        self.replace(next);
        Ok(Outcome::Applied)
    }

    fn replace(&mut self, state: ThemeState<T>) {
        let state = Arc::new(state);
        self.state = Some(Arc::clone(&state));
        for (_, listener) in &self.listeners {
            listener(&state);
        }
    }
}
