use crate::edit::{EditBase, EditRecorder, Editable};
use crate::error::ThemeError;
use crate::parser::check_symbol_name;
use crate::value::{NoExtension, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named primitive: a value plus a human description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol<T = NoExtension> {
    pub desc: String,
    pub value: Value<T>,
}

impl<T> Symbol<T> {
    pub fn new(desc: impl Into<String>, value: impl Into<Value<T>>) -> Self {
        Symbol {
            desc: desc.into(),
            value: value.into(),
        }
    }
}

impl<T: Clone> Editable<Value<T>> for Symbol<T> {
    fn desc(&self) -> &str {
        &self.desc
    }

    fn with_desc(&self, desc: &str) -> Self {
        Symbol {
            desc: desc.to_string(),
            value: self.value.clone(),
        }
    }

    fn with_value(&self, value: Value<T>) -> Option<Self> {
        Some(Symbol {
            desc: self.desc.clone(),
            value,
        })
    }

    fn has_value(&self) -> bool {
        true
    }
}

/// Pending edits to a symbol table, keyed by symbol name.
pub type SymbolEdits<T = NoExtension> = EditRecorder<Value<T>, Symbol<T>>;

/// Flat, insertion-ordered table of symbols.
///
/// Every name in a table satisfies the symbol-name grammar; the only way to
/// build one from outside the crate is through `from_entries`, which checks.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable<T = NoExtension> {
    pub(crate) entries: IndexMap<String, Symbol<T>>,
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        SymbolTable {
            entries: IndexMap::new(),
        }
    }
}

impl<T> SymbolTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, rejecting invalid names and empty arrays.
    /// A repeated name replaces the earlier entry in place.
    pub fn from_entries<I>(entries: I) -> Result<Self, ThemeError>
    where
        I: IntoIterator<Item = (String, Symbol<T>)>,
    {
        let mut table = SymbolTable::new();
        for (name, symbol) in entries {
            check_symbol_name(&name)?;
            if symbol.value.contains_empty_list() {
                return Err(ThemeError::EmptyList { name });
            }
            table.entries.insert(name, symbol);
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&Symbol<T>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Symbol<T>> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<T> EditBase<Symbol<T>> for SymbolTable<T> {
    fn lookup(&self, key: &str) -> Option<&Symbol<T>> {
        self.entries.get(key)
    }
}

impl<'a, T> IntoIterator for &'a SymbolTable<T> {
    type Item = (&'a String, &'a Symbol<T>);
    type IntoIter = indexmap::map::Iter<'a, String, Symbol<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ── Mutation surface ────────────────────────────────────────────────

impl<T: Clone> EditRecorder<Value<T>, Symbol<T>> {
    /// Record creation or replacement of a symbol.
    ///
    /// Fails, leaving the recorder untouched, when the name is not a valid
    /// symbol name. Duplicate names are not rejected here; see
    /// `ThemeState::check_new_symbol`.
    pub fn add_symbol(&self, name: &str, symbol: Symbol<T>) -> Result<Self, ThemeError> {
        check_symbol_name(name)?;
        if symbol.value.contains_empty_list() {
            return Err(ThemeError::EmptyList {
                name: name.to_string(),
            });
        }
        Ok(self.add(name, symbol))
    }

    pub fn delete_symbol(&self, base: &SymbolTable<T>, name: &str) -> Self {
        self.delete(base, name)
    }

    /// Record a new value for a symbol. Arrays must not contain empty lists.
    pub fn change_symbol_value(
        &self,
        base: &SymbolTable<T>,
        name: &str,
        value: Value<T>,
    ) -> Result<Self, ThemeError> {
        if value.contains_empty_list() {
            return Err(ThemeError::EmptyList {
                name: name.to_string(),
            });
        }
        Ok(self.change_value(base, name, value))
    }

    pub fn change_symbol_desc(&self, base: &SymbolTable<T>, name: &str, desc: &str) -> Self {
        self.change_desc(base, name, desc)
    }

    /// Undo the edit to one symbol, or all symbol edits when `name` is `None`.
    pub fn undo_symbol(&self, name: Option<&str>) -> Self {
        self.undo(name)
    }
}
