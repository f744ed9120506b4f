use crate::edit::{EditRecord, EditRecorder};
use crate::error::ThemeError;
use crate::parser::check_symbol_name;
use crate::symbols::{Symbol, SymbolEdits, SymbolTable};
use crate::tree::{TemplateEdits, TemplateNode, TemplateTree};
use crate::value::NoExtension;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize any boundary structure from a JSON string.
/// This is the inverse of `json::to_json`.
pub fn from_json<T: DeserializeOwned>(input: &str) -> Result<T, ThemeError> {
    Ok(serde_json::from_str(input)?)
}

// ── Pair-array impls ────────────────────────────────────────────────

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SymbolTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(String, Symbol<T>)>::deserialize(deserializer)?;
        SymbolTable::from_entries(pairs).map_err(D::Error::custom)
    }
}

impl<'de> Deserialize<'de> for TemplateTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(String, TemplateNode)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl<'de, V, E> Deserialize<'de> for EditRecorder<V, E>
where
    EditRecord<V, E>: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(String, EditRecord<V, E>)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

// ── Documents ───────────────────────────────────────────────────────

/// A theme session as loaded from JSON: the two base structures plus any
/// edits already pending against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDocument<T = NoExtension> {
    pub symbols: SymbolTable<T>,
    pub template: TemplateTree,
    #[serde(default = "EditRecorder::new")]
    pub symbol_edits: SymbolEdits<T>,
    #[serde(default = "EditRecorder::new")]
    pub template_edits: TemplateEdits,
}

impl<T> ThemeDocument<T> {
    pub fn new(symbols: SymbolTable<T>, template: TemplateTree) -> Self {
        ThemeDocument {
            symbols,
            template,
            symbol_edits: EditRecorder::new(),
            template_edits: EditRecorder::new(),
        }
    }

    /// Check the invariants JSON cannot express for pending symbol edits:
    /// every added symbol has a valid name, and no added or changed value
    /// holds an empty array.
    pub fn check(&self) -> Result<(), ThemeError> {
        for (name, record) in &self.symbol_edits {
            let value = match record {
                EditRecord::Add { value } => {
                    check_symbol_name(name)?;
                    &value.value
                }
                EditRecord::Change { value, .. } => value,
                _ => continue,
            };
            if value.contains_empty_list() {
                return Err(ThemeError::EmptyList { name: name.clone() });
            }
        }
        Ok(())
    }
}

impl<T: DeserializeOwned + Clone> ThemeDocument<T> {
    /// Parse and check a document.
    ///
    /// Unlike a plain `from_json::<ThemeDocument>`, a bad symbol name is
    /// reported as `InvalidName` rather than as a JSON error.
    pub fn from_json(input: &str) -> Result<Self, ThemeError> {
        let raw: RawDocument<T> = from_json(input)?;
        let document = ThemeDocument {
            symbols: SymbolTable::from_entries(raw.symbols)?,
            template: raw.template,
            symbol_edits: raw.symbol_edits,
            template_edits: raw.template_edits,
        };
        document.check()?;
        Ok(document)
    }
}

/// A document whose symbol table has not been checked yet.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument<T> {
    symbols: Vec<(String, Symbol<T>)>,
    template: TemplateTree,
    #[serde(default = "EditRecorder::new")]
    symbol_edits: SymbolEdits<T>,
    #[serde(default = "EditRecorder::new")]
    template_edits: TemplateEdits,
}
