use crate::ast::Expr;
use crate::edit::{EditBase, EditRecorder, Editable};
use crate::parser::split_path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A leaf slot: a description and the expression it evaluates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub desc: String,
    pub value: Expr,
}

impl Property {
    pub fn new(desc: impl Into<String>, value: impl Into<Expr>) -> Self {
        Property {
            desc: desc.into(),
            value: value.into(),
        }
    }
}

/// A slot with named children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub desc: String,
    pub children: TemplateTree,
}

impl Branch {
    /// A branch with no children.
    pub fn empty(desc: impl Into<String>) -> Self {
        Branch {
            desc: desc.into(),
            children: TemplateTree::new(),
        }
    }
}

/// A node in the template tree.
///
/// Properties are immutable once built and are shared between trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateNode {
    Property(Arc<Property>),
    Branch(Branch),
}

impl TemplateNode {
    pub fn property(desc: impl Into<String>, value: impl Into<Expr>) -> Self {
        TemplateNode::Property(Arc::new(Property::new(desc, value)))
    }

    pub fn branch(desc: impl Into<String>, children: TemplateTree) -> Self {
        TemplateNode::Branch(Branch {
            desc: desc.into(),
            children,
        })
    }

    pub fn is_property(&self) -> bool {
        matches!(self, TemplateNode::Property(_))
    }

    pub fn as_property(&self) -> Option<&Property> {
        match self {
            TemplateNode::Property(p) => Some(p),
            TemplateNode::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            TemplateNode::Branch(b) => Some(b),
            TemplateNode::Property(_) => None,
        }
    }
}

impl Editable<Expr> for TemplateNode {
    fn desc(&self) -> &str {
        match self {
            TemplateNode::Property(p) => &p.desc,
            TemplateNode::Branch(b) => &b.desc,
        }
    }

    fn with_desc(&self, desc: &str) -> Self {
        match self {
            TemplateNode::Property(p) => TemplateNode::property(desc, p.value.clone()),
            TemplateNode::Branch(b) => TemplateNode::branch(desc, b.children.clone()),
        }
    }

    fn with_value(&self, value: Expr) -> Option<Self> {
        match self {
            TemplateNode::Property(p) => Some(TemplateNode::property(p.desc.clone(), value)),
            TemplateNode::Branch(_) => None,
        }
    }

    fn has_value(&self) -> bool {
        self.is_property()
    }
}

/// Pending edits to a template tree, keyed by dotted path.
pub type TemplateEdits = EditRecorder<Expr, TemplateNode>;

/// An insertion-ordered map of path segments to nodes.
///
/// Cloning is O(1): levels are reference counted and copied only when a
/// clone is written to, so an edited tree shares every untouched subtree
/// with the tree it was derived from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateTree {
    entries: Arc<IndexMap<String, TemplateNode>>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, segment: &str) -> Option<&TemplateNode> {
        self.entries.get(segment)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, TemplateNode> {
        self.entries.iter()
    }

    /// Insert at this level, replacing any node with the same segment in place.
    pub fn insert(&mut self, segment: impl Into<String>, node: TemplateNode) {
        self.entries_mut().insert(segment.into(), node);
    }

    pub fn remove(&mut self, segment: &str) -> Option<TemplateNode> {
        self.entries_mut().shift_remove(segment)
    }

    /// Builder-style insert.
    pub fn with(mut self, segment: impl Into<String>, node: TemplateNode) -> Self {
        self.insert(segment, node);
        self
    }

    /// Whether this tree and `other` are backed by the same storage.
    pub fn shares_storage_with(&self, other: &TemplateTree) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    pub(crate) fn entries_mut(&mut self) -> &mut IndexMap<String, TemplateNode> {
        Arc::make_mut(&mut self.entries)
    }

    /// Look up the node at a dotted path.
    ///
    /// Descends through branches only; a property in the middle of the path
    /// ends the search.
    pub fn get_path(&self, path: &str) -> Option<&TemplateNode> {
        let segments = split_path(path);
        let (last, parents) = segments.split_last()?;
        let mut current = self;
        for segment in parents {
            match current.get(segment)? {
                TemplateNode::Branch(branch) => current = &branch.children,
                TemplateNode::Property(_) => return None,
            }
        }
        current.get(last)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.get_path(path).is_some()
    }

    /// The children map a node at `path` would be inserted into, if every
    /// parent segment names an existing branch.
    pub(crate) fn parent_mut(&mut self, parents: &[&str]) -> Option<&mut TemplateTree> {
        if !self.has_branches(parents) {
            return None;
        }
        let mut current = self;
        for segment in parents {
            match current.entries_mut().get_mut(*segment) {
                Some(TemplateNode::Branch(branch)) => current = &mut branch.children,
                _ => return None,
            }
        }
        Some(current)
    }

    fn has_branches(&self, parents: &[&str]) -> bool {
        let mut current = self;
        for segment in parents {
            match current.get(segment) {
                Some(TemplateNode::Branch(branch)) => current = &branch.children,
                _ => return false,
            }
        }
        true
    }
}

impl EditBase<TemplateNode> for TemplateTree {
    fn lookup(&self, key: &str) -> Option<&TemplateNode> {
        self.get_path(key)
    }
}

impl FromIterator<(String, TemplateNode)> for TemplateTree {
    fn from_iter<I: IntoIterator<Item = (String, TemplateNode)>>(iter: I) -> Self {
        TemplateTree {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<'a> IntoIterator for &'a TemplateTree {
    type Item = (&'a String, &'a TemplateNode);
    type IntoIter = indexmap::map::Iter<'a, String, TemplateNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ── Mutation surface ────────────────────────────────────────────────

impl EditRecorder<Expr, TemplateNode> {
    /// Record creation or replacement of an empty branch at `path`.
    pub fn add_branch(&self, path: &str, desc: &str) -> Self {
        self.add(path, TemplateNode::Branch(Branch::empty(desc)))
    }

    /// Record creation or replacement of a property at `path`.
    pub fn add_property(&self, path: &str, property: Property) -> Self {
        self.add(path, TemplateNode::Property(Arc::new(property)))
    }

    pub fn delete_node(&self, base: &TemplateTree, path: &str) -> Self {
        self.delete(base, path)
    }

    /// Replace a property's expression. No effect on branches.
    pub fn change_property_value(&self, base: &TemplateTree, path: &str, value: Expr) -> Self {
        self.change_value(base, path, value)
    }

    pub fn change_node_desc(&self, base: &TemplateTree, path: &str, desc: &str) -> Self {
        self.change_desc(base, path, desc)
    }

    /// Undo the edit at one path, or all template edits when `path` is `None`.
    pub fn undo_template(&self, path: Option<&str>) -> Self {
        self.undo(path)
    }
}
