//! Catalog stat identifier module.
//!
//! Provides `StatId`, the stable catalog key of a stat template
//! (e.g. `explicit.stat_3299347043` or `pseudo.pseudo_total_fire_resistance`).
//! Backed by `Arc<str>` so the ids stored in the catalog can be handed out
//! to every parsed stat without reallocating.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Interned catalog key for a stat template.
///
/// The part before the first `.` names the catalog group the id belongs to.
///
/// # Examples
///
/// ```rust
/// use itemtext::StatId;
///
/// let id = StatId::new("explicit.stat_3372524247");
/// assert_eq!(id.group(), Some("explicit"));
///
/// let same: StatId = "explicit.stat_3372524247".into();
/// assert_eq!(id, same);
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StatId(Arc<str>);

impl Serialize for StatId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StatId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(StatId::from(s))
    }
}

impl StatId {
    /// Create a new `StatId` from a string slice.
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s.trim()))
    }

    /// The id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The catalog group prefix (`explicit`, `implicit`, `pseudo`, ...), if any.
    pub fn group(&self) -> Option<&str> {
        self.0.split_once('.').map(|(group, _)| group)
    }

    /// Whether this id names a pseudo (derived) stat.
    pub fn is_pseudo(&self) -> bool {
        self.group() == Some("pseudo")
    }
}

impl From<&str> for StatId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StatId {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl std::fmt::Display for StatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_prefix() {
        assert_eq!(StatId::new("crafted.stat_1").group(), Some("crafted"));
        assert_eq!(StatId::new("nogroup").group(), None);
    }

    #[test]
    fn test_pseudo_detection() {
        assert!(StatId::new("pseudo.pseudo_total_life").is_pseudo());
        assert!(!StatId::new("explicit.stat_1").is_pseudo());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let id: StatId = String::from(" explicit.stat_1 ").into();
        assert_eq!(id.as_str(), "explicit.stat_1");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = StatId::new("explicit.stat_1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"explicit.stat_1\"");
        let back: StatId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
