//! Parser configuration.
//!
//! Holds the knobs that depend on the live catalog's contents rather than
//! on the clipboard format: which categories are retried when a declared
//! category has no hit, and which pseudo ids take part in the resistance
//! weighting.

use crate::category::StatCategory;
use crate::error::ParseError;
use crate::stat_id::StatId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pseudo ids used by the double-resistance weighting rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResistanceGroups {
    /// Per-element totals (fire, cold, lightning).
    pub elemental: Vec<StatId>,
    /// Chaos resistance total.
    pub chaos: Vec<StatId>,
    /// Sum of the elemental totals.
    pub elemental_total: StatId,
    /// Sum of every resistance total, chaos included.
    pub grand_total: StatId,
}

impl Default for ResistanceGroups {
    fn default() -> Self {
        Self {
            elemental: vec![
                StatId::new("pseudo.pseudo_total_fire_resistance"),
                StatId::new("pseudo.pseudo_total_cold_resistance"),
                StatId::new("pseudo.pseudo_total_lightning_resistance"),
            ],
            chaos: vec![StatId::new("pseudo.pseudo_total_chaos_resistance")],
            elemental_total: StatId::new("pseudo.pseudo_total_elemental_resistance"),
            grand_total: StatId::new("pseudo.pseudo_total_resistance"),
        }
    }
}

impl ResistanceGroups {
    /// Whether `id` is one of the specific resistance totals counted for
    /// `total` (elemental ones for the elemental total, chaos as well for the
    /// grand total).
    pub fn counts_toward(&self, total: &StatId, id: &StatId) -> bool {
        if total == &self.elemental_total {
            self.elemental.contains(id)
        } else if total == &self.grand_total {
            self.elemental.contains(id) || self.chaos.contains(id)
        } else {
            false
        }
    }

    /// Whether `id` is the elemental or grand resistance total.
    pub fn is_total(&self, id: &StatId) -> bool {
        id == &self.elemental_total || id == &self.grand_total
    }
}

/// Configuration for an `ItemParser`.
///
/// # Examples
///
/// ```rust
/// use itemtext::{ParserConfig, StatCategory};
///
/// let config = ParserConfig::from_json_str(
///     r#"{"category_fallbacks": {"monster": ["explicit", "implicit"]}}"#,
/// ).unwrap();
/// assert_eq!(
///     config.fallbacks_for(StatCategory::Monster),
///     &[StatCategory::Explicit, StatCategory::Implicit]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Categories retried, in order, when the declared one has no hit.
    pub category_fallbacks: BTreeMap<StatCategory, Vec<StatCategory>>,
    /// Categories a map stat line may match.
    pub map_categories: Vec<StatCategory>,
    pub resistances: ResistanceGroups,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let mut category_fallbacks = BTreeMap::new();
        category_fallbacks.insert(StatCategory::Monster, vec![StatCategory::Explicit]);
        Self {
            category_fallbacks,
            map_categories: vec![StatCategory::Explicit, StatCategory::Implicit],
            resistances: ResistanceGroups::default(),
        }
    }
}

impl ParserConfig {
    /// Read a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ParseError> {
        let config: ParserConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for contradictions.
    pub fn validate(&self) -> Result<(), ParseError> {
        let groups = &self.resistances;
        if groups.elemental_total == groups.grand_total {
            return Err(ParseError::InvalidConfig(
                "elemental and grand resistance totals must differ".to_string(),
            ));
        }
        if let Some(id) = groups
            .elemental
            .iter()
            .chain(&groups.chaos)
            .find(|id| groups.is_total(id))
        {
            return Err(ParseError::InvalidConfig(format!(
                "{} is listed both as a specific resistance and as a total",
                id
            )));
        }
        for (category, fallbacks) in &self.category_fallbacks {
            if fallbacks.contains(category) {
                return Err(ParseError::InvalidConfig(format!(
                    "category {} falls back to itself",
                    category
                )));
            }
        }
        if self.map_categories.is_empty() {
            return Err(ParseError::InvalidConfig(
                "map stats need at least one category".to_string(),
            ));
        }
        Ok(())
    }

    /// Fallback categories for `category`.
    pub fn fallbacks_for(&self, category: StatCategory) -> &[StatCategory] {
        self.category_fallbacks
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ParserConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fallbacks_for(StatCategory::Monster), &[StatCategory::Explicit]);
        assert!(config.fallbacks_for(StatCategory::Explicit).is_empty());
    }

    #[test]
    fn test_self_fallback_is_rejected() {
        let json = r#"{"category_fallbacks": {"explicit": ["explicit"]}}"#;
        assert!(matches!(
            ParserConfig::from_json_str(json),
            Err(ParseError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_total_listed_as_specific_is_rejected() {
        let mut config = ParserConfig::default();
        config.resistances.elemental.push(config.resistances.grand_total.clone());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_counts_toward() {
        let groups = ResistanceGroups::default();
        let fire = StatId::new("pseudo.pseudo_total_fire_resistance");
        let chaos = StatId::new("pseudo.pseudo_total_chaos_resistance");
        assert!(groups.counts_toward(&groups.elemental_total, &fire));
        assert!(!groups.counts_toward(&groups.elemental_total, &chaos));
        assert!(groups.counts_toward(&groups.grand_total, &chaos));
        assert!(!groups.counts_toward(&fire, &fire));
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        assert_eq!(ParserConfig::from_json_str("{}").unwrap(), ParserConfig::default());
    }
}
