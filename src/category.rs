//! Stat categories and the trailing annotations that select them.
//!
//! Clipboard stat lines mark their origin with a trailing parenthesised
//! annotation such as `(implicit)`. The annotation's presence, not its
//! wording elsewhere in the line, decides the category.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The origin of a stat on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatCategory {
    Explicit,
    Implicit,
    Crafted,
    Enchant,
    Fractured,
    Monster,
    Pseudo,
    Unknown,
}

/// Suffix annotation to category lookup, checked in order.
const ANNOTATIONS: &[(&str, StatCategory)] = &[
    ("(implicit)", StatCategory::Implicit),
    ("(crafted)", StatCategory::Crafted),
    ("(enchant)", StatCategory::Enchant),
    ("(fractured)", StatCategory::Fractured),
];

impl StatCategory {
    /// Map a catalog group label (`"Explicit"`, `"pseudo"`, ...) to a category.
    ///
    /// Labels the parser has no use for (veiled, delve, ...) become `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "explicit" => StatCategory::Explicit,
            "implicit" => StatCategory::Implicit,
            "crafted" => StatCategory::Crafted,
            "enchant" => StatCategory::Enchant,
            "fractured" => StatCategory::Fractured,
            "monster" => StatCategory::Monster,
            "pseudo" => StatCategory::Pseudo,
            _ => StatCategory::Unknown,
        }
    }

    /// Lowercase label, matching the catalog id prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            StatCategory::Explicit => "explicit",
            StatCategory::Implicit => "implicit",
            StatCategory::Crafted => "crafted",
            StatCategory::Enchant => "enchant",
            StatCategory::Fractured => "fractured",
            StatCategory::Monster => "monster",
            StatCategory::Pseudo => "pseudo",
            StatCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a trailing category annotation off a stat line.
///
/// Returns the trimmed line without the annotation, and the category the
/// annotation selects. Lines without an annotation return `None` and keep
/// their declared category.
///
/// # Examples
///
/// ```rust
/// use itemtext::category::{strip_annotation, StatCategory};
///
/// let (text, category) = strip_annotation("+20 to maximum Life (crafted)");
/// assert_eq!(text, "+20 to maximum Life");
/// assert_eq!(category, Some(StatCategory::Crafted));
///
/// let (text, category) = strip_annotation("+20 to maximum Life");
/// assert_eq!(text, "+20 to maximum Life");
/// assert_eq!(category, None);
/// ```
pub fn strip_annotation(line: &str) -> (&str, Option<StatCategory>) {
    let trimmed = line.trim();
    for (suffix, category) in ANNOTATIONS {
        if let Some(rest) = trimmed.strip_suffix(suffix) {
            return (rest.trim_end(), Some(*category));
        }
    }
    (trimmed, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_annotation_is_recognized() {
        for (suffix, category) in ANNOTATIONS {
            let line = format!("Some Stat {}", suffix);
            assert_eq!(strip_annotation(&line), ("Some Stat", Some(*category)));
        }
    }

    #[test]
    fn test_annotation_only_counts_at_end() {
        let (text, category) = strip_annotation("(implicit) in the middle of a line");
        assert_eq!(text, "(implicit) in the middle of a line");
        assert_eq!(category, None);
    }

    #[test]
    fn test_from_label() {
        assert_eq!(StatCategory::from_label("Explicit"), StatCategory::Explicit);
        assert_eq!(StatCategory::from_label(" pseudo "), StatCategory::Pseudo);
        assert_eq!(StatCategory::from_label("Veiled"), StatCategory::Unknown);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&StatCategory::Fractured).unwrap();
        assert_eq!(json, "\"fractured\"");
    }
}
