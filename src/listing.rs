//! Gems from trade listings.
//!
//! Listings describe a gem with typed properties instead of clipboard text.
//! The experience bar comes with a `progress` fraction that is more precise
//! than the displayed `used/total` pair, so it wins when present.

use crate::error::ParseError;
use crate::item::{Gem, ItemHeader, Rarity};
use crate::recognizer::{display_value, experience_percent, gem_quality_type};
use serde::Deserialize;

/// A listing property: `name` plus `(text, style)` value pairs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingProperty {
    pub name: String,
    #[serde(default)]
    pub values: Vec<(String, i32)>,
    #[serde(default)]
    pub display_mode: i32,
    /// Fraction of the bar filled, for progress-style properties.
    #[serde(default)]
    pub progress: Option<f64>,
}

impl ListingProperty {
    fn first_value(&self) -> Option<&str> {
        self.values.first().map(|(text, _)| text.as_str())
    }
}

/// The gem part of a trade listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedGem {
    pub type_line: String,
    #[serde(default)]
    pub corrupted: bool,
    #[serde(default)]
    pub properties: Vec<ListingProperty>,
    #[serde(default)]
    pub additional_properties: Vec<ListingProperty>,
}

impl ListedGem {
    /// Read a listing from its JSON item object.
    pub fn from_json_str(json: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(json)?)
    }

    fn property(&self, name: &str) -> Option<&ListingProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    fn additional(&self, name: &str) -> Option<&ListingProperty> {
        self.additional_properties.iter().find(|p| p.name == name)
    }
}

/// Build a `Gem` from a listing.
///
/// # Examples
///
/// ```rust
/// use itemtext::listing::{gem_from_listing, ListedGem};
///
/// let listed = ListedGem::from_json_str(r#"{
///     "typeLine": "Fireball",
///     "properties": [
///         {"name": "Level", "values": [["15", 0]], "displayMode": 0},
///         {"name": "Quality", "values": [["+13%", 1]], "displayMode": 1}
///     ],
///     "additionalProperties": [
///         {"name": "Experience", "values": [["1/15249", 0]], "displayMode": 2, "progress": 0.25}
///     ]
/// }"#).unwrap();
///
/// let gem = gem_from_listing(&listed);
/// assert_eq!(gem.level, "15");
/// assert_eq!(gem.quality, "+13%");
/// assert_eq!(gem.experience_percent, 25);
/// ```
pub fn gem_from_listing(listed: &ListedGem) -> Gem {
    let (quality_type, type_name) = gem_quality_type(&listed.type_line);
    let experience = listed.additional("Experience").map_or(0, |bar| match bar.progress {
        Some(progress) => (progress.clamp(0.0, 1.0) * 100.0) as u32,
        None => bar.first_value().map_or(0, experience_percent),
    });

    Gem {
        header: ItemHeader {
            name: listed.type_line.clone(),
            type_name: type_name.to_string(),
            rarity: Rarity::Gem,
            item_text: String::new(),
        },
        level: listed
            .property("Level")
            .and_then(ListingProperty::first_value)
            .map(str::to_string)
            .unwrap_or_default(),
        quality: listed
            .property("Quality")
            .and_then(ListingProperty::first_value)
            .map(display_value)
            .unwrap_or_default(),
        experience_percent: experience,
        is_corrupted: listed.corrupted,
        is_vaal_version: type_name.starts_with("Vaal ")
            || listed.property("Vaal").is_some()
            || listed
                .properties
                .first()
                .is_some_and(|tags| tags.values.is_empty() && tags.name.split(", ").any(|t| t == "Vaal")),
        quality_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::GemQualityType;

    fn property(name: &str, value: &str, progress: Option<f64>) -> ListingProperty {
        ListingProperty {
            name: name.to_string(),
            values: vec![(value.to_string(), 0)],
            display_mode: 0,
            progress,
        }
    }

    fn listed(experience: ListingProperty) -> ListedGem {
        ListedGem {
            type_line: "Phantasmal Vaal Fireball".to_string(),
            corrupted: true,
            properties: vec![
                ListingProperty {
                    name: "Vaal, Projectile, Fire".to_string(),
                    values: Vec::new(),
                    display_mode: 0,
                    progress: None,
                },
                property("Level", "20 (Max)", None),
            ],
            additional_properties: vec![experience],
        }
    }

    #[test]
    fn test_experience_from_text_without_progress() {
        let gem = gem_from_listing(&listed(property("Experience", "150/1.000", None)));
        assert_eq!(gem.experience_percent, 15);
        let gem = gem_from_listing(&listed(property("Experience", "123/1.000", None)));
        assert_eq!(gem.experience_percent, 12);
    }

    #[test]
    fn test_progress_wins_over_text() {
        let gem = gem_from_listing(&listed(property("Experience", "1/15249", Some(0.5))));
        assert_eq!(gem.experience_percent, 50);
    }

    #[test]
    fn test_flags_and_quality_type() {
        let gem = gem_from_listing(&listed(property("Experience", "0/1", None)));
        assert!(gem.is_corrupted);
        assert!(gem.is_vaal_version);
        assert_eq!(gem.quality_type, GemQualityType::Phantasmal);
        assert_eq!(gem.header.type_name, "Vaal Fireball");
        assert_eq!(gem.level_value(), Some(20));
        assert_eq!(gem.quality, "");
    }
}
