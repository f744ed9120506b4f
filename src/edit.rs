//! Edit recorders: a sparse overlay of pending edits against a base structure.
//!
//! A recorder holds at most one record per key. Each edit intent is merged
//! into the key's existing record, so a recorder always describes the *net*
//! effect of the session's edits rather than their history. Recorders are
//! never mutated in place; every operation returns a new recorder.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An entity that can be replaced wholesale or have its value or description
/// replaced independently.
pub trait Editable<V>: Clone {
    fn desc(&self) -> &str;

    fn with_desc(&self, desc: &str) -> Self;

    /// A copy with its value replaced, or `None` if the entity has no value
    /// slot (a template branch).
    fn with_value(&self, value: V) -> Option<Self>;

    fn has_value(&self) -> bool;
}

/// The un-edited structure a recorder is written against.
pub trait EditBase<E> {
    fn lookup(&self, key: &str) -> Option<&E>;

    fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }
}

/// The net pending edit for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditRecord<V, E> {
    /// Create the entity, or replace it entirely.
    Add { value: E },
    /// Remove the entity from the edited view.
    Delete,
    /// Replace the value. `desc` is set when the description was also edited
    /// on a pre-existing entity.
    Change {
        value: V,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        desc: Option<String>,
    },
    /// Replace only the description.
    DescChange { desc: String },
}

/// An edit requested by a caller, before it is merged.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent<V, E> {
    Add(E),
    Delete,
    ChangeValue(V),
    ChangeDesc(String),
}

/// What a merge does to the recorder entry for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<V, E> {
    Set(EditRecord<V, E>),
    Remove,
    Keep,
}

/// How a key looks in the edited view relative to the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStatus {
    Unchanged,
    /// Present because of an add (new, or a wholesale replacement).
    Added,
    Deleted,
    /// Pre-existing, with its value and/or description changed.
    Modified,
}

/// Merge one intent into the current record for a key.
///
/// `base` is the un-edited entity at the key, if any. Precedence:
///
/// - `Add` always wins, whatever was recorded before.
/// - `Delete` records a deletion for base keys and drops the record for keys
///   that only ever existed in the recorder.
/// - Value and description changes fold into the existing record, keeping
///   whichever half they do not touch. With no record they apply only to
///   base keys; anything else is left as is.
pub fn merge<V, E>(
    current: Option<&EditRecord<V, E>>,
    base: Option<&E>,
    intent: Intent<V, E>,
) -> Transition<V, E>
where
    V: Clone,
    E: Editable<V>,
{
    let base_has_value = base.is_some_and(|b| b.has_value());
    match intent {
        Intent::Add(value) => Transition::Set(EditRecord::Add { value }),
        Intent::Delete => {
            if base.is_some() {
                Transition::Set(EditRecord::Delete)
            } else {
                Transition::Remove
            }
        }
        Intent::ChangeValue(value) => match current {
            None | Some(EditRecord::Delete) if base_has_value => {
                Transition::Set(EditRecord::Change { value, desc: None })
            }
            None | Some(EditRecord::Delete) => Transition::Keep,
            Some(EditRecord::Change { desc, .. }) => Transition::Set(EditRecord::Change {
                value,
                desc: desc.clone(),
            }),
            Some(EditRecord::DescChange { desc }) if base_has_value => {
                Transition::Set(EditRecord::Change {
                    value,
                    desc: Some(desc.clone()),
                })
            }
            Some(EditRecord::DescChange { .. }) => Transition::Keep,
            Some(EditRecord::Add { value: entity }) => match entity.with_value(value) {
                Some(value) => Transition::Set(EditRecord::Add { value }),
                None => Transition::Keep,
            },
        },
        Intent::ChangeDesc(desc) => match current {
            None if base.is_some() => Transition::Set(EditRecord::DescChange { desc }),
            None => Transition::Keep,
            Some(EditRecord::Delete) | Some(EditRecord::DescChange { .. }) => {
                Transition::Set(EditRecord::DescChange { desc })
            }
            Some(EditRecord::Change { value, .. }) => Transition::Set(EditRecord::Change {
                value: value.clone(),
                desc: Some(desc),
            }),
            Some(EditRecord::Add { value: entity }) => Transition::Set(EditRecord::Add {
                value: entity.with_desc(&desc),
            }),
        },
    }
}

/// A sparse log of pending edits, one record per key, in first-edit order.
#[derive(Debug, Clone, PartialEq)]
pub struct EditRecorder<V, E> {
    records: IndexMap<String, EditRecord<V, E>>,
}

impl<V, E> Default for EditRecorder<V, E> {
    fn default() -> Self {
        EditRecorder {
            records: IndexMap::new(),
        }
    }
}

impl<V, E> EditRecorder<V, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&EditRecord<V, E>> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, EditRecord<V, E>> {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    // ── Status ──────────────────────────────────────────────────────

    pub fn status(&self, key: &str) -> EditStatus {
        match self.records.get(key) {
            None => EditStatus::Unchanged,
            Some(EditRecord::Add { .. }) => EditStatus::Added,
            Some(EditRecord::Delete) => EditStatus::Deleted,
            Some(EditRecord::Change { .. }) | Some(EditRecord::DescChange { .. }) => {
                EditStatus::Modified
            }
        }
    }

    pub fn is_added(&self, key: &str) -> bool {
        self.status(key) == EditStatus::Added
    }

    pub fn is_deleted(&self, key: &str) -> bool {
        self.status(key) == EditStatus::Deleted
    }

    pub fn is_modified(&self, key: &str) -> bool {
        self.status(key) == EditStatus::Modified
    }

    pub fn is_unchanged(&self, key: &str) -> bool {
        self.status(key) == EditStatus::Unchanged
    }

    /// Whether the key comes from the base and has not been replaced by an add.
    pub fn is_origin<B: EditBase<E>>(&self, base: &B, key: &str) -> bool {
        base.contains(key) && !self.is_added(key)
    }
}

impl<V, E> EditRecorder<V, E>
where
    V: Clone,
    E: Editable<V>,
{
    /// Merge an intent for `key` and return the resulting recorder.
    pub fn apply<B: EditBase<E>>(&self, base: &B, key: &str, intent: Intent<V, E>) -> Self {
        self.apply_against(base.lookup(key), key, intent)
    }

    fn apply_against(&self, base: Option<&E>, key: &str, intent: Intent<V, E>) -> Self {
        match merge(self.records.get(key), base, intent) {
            Transition::Set(record) => {
                let mut next = self.clone();
                next.records.insert(key.to_string(), record);
                next
            }
            Transition::Remove => {
                let mut next = self.clone();
                next.records.shift_remove(key);
                next
            }
            Transition::Keep => {
                tracing::trace!(key, "edit has no effect");
                self.clone()
            }
        }
    }

    /// Create or replace the entity at `key`. Adds never consult the base.
    pub fn add(&self, key: &str, entity: E) -> Self {
        self.apply_against(None, key, Intent::Add(entity))
    }

    pub fn delete<B: EditBase<E>>(&self, base: &B, key: &str) -> Self {
        self.apply(base, key, Intent::Delete)
    }

    pub fn change_value<B: EditBase<E>>(&self, base: &B, key: &str, value: V) -> Self {
        self.apply(base, key, Intent::ChangeValue(value))
    }

    pub fn change_desc<B: EditBase<E>>(&self, base: &B, key: &str, desc: &str) -> Self {
        self.apply(base, key, Intent::ChangeDesc(desc.to_string()))
    }

    /// Drop the record for `key`, or every record when `key` is `None`.
    pub fn undo(&self, key: Option<&str>) -> Self {
        match key {
            None => Self::new(),
            Some(key) => {
                let mut next = self.clone();
                next.records.shift_remove(key);
                next
            }
        }
    }
}

impl<V, E> FromIterator<(String, EditRecord<V, E>)> for EditRecorder<V, E> {
    fn from_iter<I: IntoIterator<Item = (String, EditRecord<V, E>)>>(iter: I) -> Self {
        EditRecorder {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a, V, E> IntoIterator for &'a EditRecorder<V, E> {
    type Item = (&'a String, &'a EditRecord<V, E>);
    type IntoIter = indexmap::map::Iter<'a, String, EditRecord<V, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
