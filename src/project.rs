use crate::ast::Expr;
use crate::edit::{EditRecord, EditRecorder, Editable};
use crate::parser::split_path;
use crate::symbols::{Symbol, SymbolTable};
use crate::tree::{TemplateNode, TemplateTree};
use crate::value::Value;
use indexmap::IndexMap;

/// Apply the symbol edits to a copy of `base`.
///
/// The base table is left untouched. Each key has at most one record, so the
/// result does not depend on the order records are applied in.
pub fn project_symbols<T: Clone>(
    base: &SymbolTable<T>,
    edits: &EditRecorder<Value<T>, Symbol<T>>,
) -> SymbolTable<T> {
    let mut edited = base.clone();
    for (name, record) in edits {
        apply_record(&mut edited.entries, name, record);
    }
    edited
}

/// Apply the template edits to a copy of `base`.
///
/// Records are applied in recorder order. A record whose parent path does not
/// name a chain of existing branches is skipped; parents are never created
/// implicitly.
pub fn project_template(
    base: &TemplateTree,
    edits: &EditRecorder<Expr, TemplateNode>,
) -> TemplateTree {
    let mut edited = base.clone();
    for (path, record) in edits {
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };
        match edited.parent_mut(parents) {
            Some(parent) => apply_record(parent.entries_mut(), last, record),
            None => {
                tracing::trace!(path = path.as_str(), "parent is not a branch, edit skipped");
            }
        }
    }
    edited
}

/// Apply one record to the entry `key` of `entries`.
fn apply_record<V, E>(entries: &mut IndexMap<String, E>, key: &str, record: &EditRecord<V, E>)
where
    V: Clone,
    E: Editable<V>,
{
    match record {
        EditRecord::Delete => {
            entries.shift_remove(key);
        }
        EditRecord::Add { value } => {
            entries.insert(key.to_string(), value.clone());
        }
        EditRecord::Change { value, desc } => {
            let Some(current) = entries.get_mut(key) else {
                tracing::trace!(key, "change to absent key skipped");
                return;
            };
            let Some(changed) = current.with_value(value.clone()) else {
                tracing::trace!(key, "change to entity without a value skipped");
                return;
            };
            *current = match desc {
                Some(desc) => changed.with_desc(desc),
                None => changed,
            };
        }
        EditRecord::DescChange { desc } => match entries.get_mut(key) {
            Some(current) => *current = current.with_desc(desc),
            None => tracing::trace!(key, "description change to absent key skipped"),
        },
    }
}
