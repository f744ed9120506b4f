use crate::ast::Reference;
use crate::error::ThemeError;
use regex::Regex;
use std::sync::LazyLock;

/// `@word(-word)*` with lowercase ASCII words.
static SYMBOL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@(?:[a-z]+-)*[a-z]+$").expect("symbol name regex"));

/// A symbol name followed by optional `-G<digit>` and `-A<1-3 digits>`.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(@(?:[a-z]+-)*[a-z]+)(?:-G([0-9]))?(?:-A([0-9]{1,3}))?$")
        .expect("reference regex")
});

/// Separator between segments of a template path.
pub const PATH_SEPARATOR: char = '.';

// ── Symbol names ────────────────────────────────────────────────────

pub fn is_symbol_name(name: &str) -> bool {
    SYMBOL_NAME.is_match(name)
}

/// Check a symbol name against the grammar, failing with the offending name.
pub fn check_symbol_name(name: &str) -> Result<(), ThemeError> {
    if is_symbol_name(name) {
        Ok(())
    } else {
        Err(ThemeError::InvalidName {
            name: name.to_string(),
        })
    }
}

// ── References ──────────────────────────────────────────────────────

/// Parse a string against the extended reference grammar.
///
/// Returns `None` for anything that is not a reference; such strings are
/// literals.
pub fn parse_reference(text: &str) -> Option<Reference> {
    let caps = REFERENCE.captures(text)?;
    let name = caps.get(1)?.as_str().to_string();
    let level = match caps.get(2) {
        Some(m) => Some(m.as_str().parse::<u8>().ok()?),
        None => None,
    };
    let opacity = match caps.get(3) {
        Some(m) => Some(m.as_str().parse::<u16>().ok()?),
        None => None,
    };
    Some(Reference {
        name,
        level,
        opacity,
        source: text.to_string(),
    })
}

// ── Template paths ──────────────────────────────────────────────────

/// Split a dotted path into its segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR).collect()
}

/// Build the path of a child segment under `parent` (`None` for the root).
pub fn join_path(parent: Option<&str>, segment: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{}{}{}", parent, PATH_SEPARATOR, segment),
        _ => segment.to_string(),
    }
}
