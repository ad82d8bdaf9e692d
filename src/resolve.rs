//! Base type resolution for affix-decorated item names.
//!
//! Magic items show a single line such as `Sanguine Leather Belt of the
//! Whelpling`; the base type has to be looked up from a list of known base
//! types. The lookup is an external concern behind `TypeResolver`.

use crate::error::ParseError;

/// Name prefixes the game adds that are never part of a base type.
const MARKER_PREFIXES: &[&str] = &["Superior ", "Synthesised "];

/// Resolves the base type hidden in a decorated item name.
pub trait TypeResolver: Send + Sync {
    /// Base type contained in `cleaned_name`, if known.
    fn resolve_type(&self, cleaned_name: &str) -> Option<String>;
}

/// A resolver that knows no base types.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTypeResolution;

impl TypeResolver for NoTypeResolution {
    fn resolve_type(&self, _cleaned_name: &str) -> Option<String> {
        None
    }
}

/// Resolves against a list of known base type names, picking the longest
/// one that appears in the name as whole words.
///
/// # Examples
///
/// ```rust
/// use itemtext::resolve::{BaseTypeIndex, TypeResolver};
///
/// let index = BaseTypeIndex::new(["Belt", "Leather Belt", "Divine Life Flask"]);
/// assert_eq!(
///     index.resolve_type("Sanguine Leather Belt of the Whelpling").as_deref(),
///     Some("Leather Belt")
/// );
/// assert_eq!(index.resolve_type("Beltway"), None);
/// ```
#[derive(Debug, Default, Clone)]
pub struct BaseTypeIndex {
    /// Longest first.
    base_types: Vec<String>,
}

impl BaseTypeIndex {
    pub fn new<I, S>(base_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut base_types: Vec<String> = base_types.into_iter().map(Into::into).collect();
        base_types.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        base_types.dedup();
        Self { base_types }
    }

    /// Load from a JSON array of base type names.
    pub fn from_json_str(json: &str) -> Result<Self, ParseError> {
        let names: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::new(names))
    }

    pub fn len(&self) -> usize {
        self.base_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base_types.is_empty()
    }
}

impl TypeResolver for BaseTypeIndex {
    fn resolve_type(&self, cleaned_name: &str) -> Option<String> {
        self.base_types
            .iter()
            .find(|base| contains_words(cleaned_name, base))
            .cloned()
    }
}

/// Whether `needle` occurs in `haystack` bounded by spaces or the ends.
fn contains_words(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = start == 0 || haystack[..start].ends_with(' ');
        let after_ok = end == haystack.len() || haystack[end..].starts_with(' ');
        before_ok && after_ok
    })
}

/// Remove the game's quality/synthesis marker prefixes from a name line.
///
/// # Examples
///
/// ```rust
/// use itemtext::resolve::strip_markers;
///
/// assert_eq!(strip_markers("Superior Hubris Circlet"), "Hubris Circlet");
/// assert_eq!(strip_markers("Synthesised Ruby Ring"), "Ruby Ring");
/// ```
pub fn strip_markers(name: &str) -> &str {
    let mut name = name.trim();
    while let Some(rest) = MARKER_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(*prefix))
    {
        name = rest;
    }
    name
}
