use crate::ast::{Expr, Reference};
use crate::color::{derive, Color};
use crate::symbols::SymbolTable;
use crate::tree::{TemplateNode, TemplateTree};
use crate::value::{NoExtension, Value};
use indexmap::IndexMap;

/// A node of the resolved theme.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedNode<T = NoExtension> {
    Property { desc: String, value: Value<T> },
    Branch { desc: String, children: ResolvedTree<T> },
}

impl<T> ResolvedNode<T> {
    pub fn desc(&self) -> &str {
        match self {
            ResolvedNode::Property { desc, .. } | ResolvedNode::Branch { desc, .. } => desc,
        }
    }

    pub fn value(&self) -> Option<&Value<T>> {
        match self {
            ResolvedNode::Property { value, .. } => Some(value),
            ResolvedNode::Branch { .. } => None,
        }
    }

    pub fn children(&self) -> Option<&ResolvedTree<T>> {
        match self {
            ResolvedNode::Branch { children, .. } => Some(children),
            ResolvedNode::Property { .. } => None,
        }
    }
}

/// The output of resolution: the template's shape with concrete values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTree<T = NoExtension> {
    pub(crate) entries: IndexMap<String, ResolvedNode<T>>,
}

impl<T> Default for ResolvedTree<T> {
    fn default() -> Self {
        ResolvedTree {
            entries: IndexMap::new(),
        }
    }
}

impl<T> ResolvedTree<T> {
    pub fn get(&self, segment: &str) -> Option<&ResolvedNode<T>> {
        self.entries.get(segment)
    }

    /// Look up a node by dotted path.
    pub fn get_path(&self, path: &str) -> Option<&ResolvedNode<T>> {
        let segments = crate::parser::split_path(path);
        let (last, parents) = segments.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.get(segment)?.children()?;
        }
        current.get(last)
    }

    /// The resolved value of the property at `path`.
    pub fn value_at(&self, path: &str) -> Option<&Value<T>> {
        self.get_path(path)?.value()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ResolvedNode<T>> {
        self.entries.iter()
    }
}

impl<T> FromIterator<(String, ResolvedNode<T>)> for ResolvedTree<T> {
    fn from_iter<I: IntoIterator<Item = (String, ResolvedNode<T>)>>(iter: I) -> Self {
        ResolvedTree {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Resolve every property of `template` against `symbols`.
///
/// Total over any input: unresolvable references fall back to their own
/// text rather than failing.
pub fn resolve<T: Clone>(symbols: &SymbolTable<T>, template: &TemplateTree) -> ResolvedTree<T> {
    template
        .iter()
        .map(|(key, node)| {
            let resolved = match node {
                TemplateNode::Property(p) => ResolvedNode::Property {
                    desc: p.desc.clone(),
                    value: resolve_expr(symbols, &p.value),
                },
                TemplateNode::Branch(b) => ResolvedNode::Branch {
                    desc: b.desc.clone(),
                    children: resolve(symbols, &b.children),
                },
            };
            (key.clone(), resolved)
        })
        .collect()
}

/// Resolve a single expression.
pub fn resolve_expr<T: Clone>(symbols: &SymbolTable<T>, expr: &Expr) -> Value<T> {
    match expr {
        Expr::Number(n) => Value::Number(*n),
        Expr::Literal(s) => Value::Text(s.clone()),
        Expr::List(items) => Value::List(items.iter().map(|e| resolve_expr(symbols, e)).collect()),
        Expr::Reference(reference) => resolve_reference(symbols, reference),
    }
}

/// Color symbols always come back re-emitted as lowercase `#rrggbb` (or
/// `#rrggbbaa` when translucent), so `#FF0000` resolves to `#ff0000` even
/// without modifiers.
fn resolve_reference<T: Clone>(symbols: &SymbolTable<T>, reference: &Reference) -> Value<T> {
    let Some(symbol) = symbols.get(&reference.name) else {
        tracing::trace!(reference = %reference, "dangling reference kept as literal");
        return Value::Text(reference.source.clone());
    };
    let Value::Text(text) = &symbol.value else {
        return symbol.value.clone();
    };
    match Color::parse(text) {
        Some(color) => {
            Value::Text(derive(color, reference.level(), reference.opacity()).to_hex())
        }
        None if reference.has_modifiers() => {
            tracing::trace!(reference = %reference, "modifiers on a non-color kept as literal");
            Value::Text(reference.source.clone())
        }
        None => symbol.value.clone(),
    }
}
