//! Parsed item stats.
//!
//! An `ItemStat` is one stat line matched (or not) against the catalog.
//! `ItemStats` partitions an item's stats by category and is assembled
//! exactly once per parse, pseudo stats included.

use crate::category::StatCategory;
use crate::stat_id::StatId;
use serde::{Deserialize, Serialize};

/// The numeric payload of a stat, chosen by the catalog template's
/// placeholder count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum StatValue {
    /// No placeholder in the template, or no catalog match.
    Valueless,
    /// One placeholder.
    Single { value: f64 },
    /// Two placeholders, filled in order.
    MinMax { min: f64, max: f64 },
}

impl StatValue {
    /// The single value, if this is a single-value stat.
    pub fn single(self) -> Option<f64> {
        match self {
            StatValue::Single { value } => Some(value),
            _ => None,
        }
    }

    /// The `(min, max)` pair, if this is a min-max stat.
    pub fn min_max(self) -> Option<(f64, f64)> {
        match self {
            StatValue::MinMax { min, max } => Some((min, max)),
            _ => None,
        }
    }

    pub fn is_valueless(self) -> bool {
        matches!(self, StatValue::Valueless)
    }
}

/// One stat of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStat {
    pub category: StatCategory,
    /// Catalog key; `None` when the line matched no template.
    pub id: Option<StatId>,
    /// The line as displayed, with any category annotation removed.
    pub text: String,
    /// Catalog template text, or the line itself when unmatched.
    pub text_with_placeholders: String,
    pub value: StatValue,
}

impl ItemStat {
    /// A stat for a line that matched no catalog template.
    ///
    /// The line is kept so it stays visible, even though it cannot be
    /// filtered on.
    pub fn unmatched(category: StatCategory, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            category,
            id: None,
            text_with_placeholders: text.clone(),
            text,
            value: StatValue::Valueless,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.id.is_some()
    }
}

/// An item's stats, partitioned by category in insertion order.
///
/// # Examples
///
/// ```rust
/// use itemtext::stat::{ItemStat, ItemStats};
/// use itemtext::StatCategory;
///
/// let stats = ItemStats::from_stats(
///     vec![
///         ItemStat::unmatched(StatCategory::Implicit, "Implicit line"),
///         ItemStat::unmatched(StatCategory::Explicit, "Explicit line"),
///     ],
///     Vec::new(),
/// );
/// let texts: Vec<&str> = stats.all().map(|s| s.text.as_str()).collect();
/// assert_eq!(texts, vec!["Explicit line", "Implicit line"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    explicit: Vec<ItemStat>,
    implicit: Vec<ItemStat>,
    crafted: Vec<ItemStat>,
    enchant: Vec<ItemStat>,
    fractured: Vec<ItemStat>,
    monster: Vec<ItemStat>,
    pseudo: Vec<ItemStat>,
}

impl ItemStats {
    /// Partition `stats` by category and append `pseudo` last.
    ///
    /// Stats in the `Pseudo` or `Unknown` category among `stats` go to the
    /// pseudo and explicit partitions respectively.
    pub fn from_stats(stats: Vec<ItemStat>, pseudo: Vec<ItemStat>) -> Self {
        let mut out = ItemStats::default();
        for stat in stats {
            match stat.category {
                StatCategory::Explicit | StatCategory::Unknown => out.explicit.push(stat),
                StatCategory::Implicit => out.implicit.push(stat),
                StatCategory::Crafted => out.crafted.push(stat),
                StatCategory::Enchant => out.enchant.push(stat),
                StatCategory::Fractured => out.fractured.push(stat),
                StatCategory::Monster => out.monster.push(stat),
                StatCategory::Pseudo => out.pseudo.push(stat),
            }
        }
        out.pseudo.extend(pseudo);
        out
    }

    pub fn explicit(&self) -> &[ItemStat] {
        &self.explicit
    }

    pub fn implicit(&self) -> &[ItemStat] {
        &self.implicit
    }

    pub fn crafted(&self) -> &[ItemStat] {
        &self.crafted
    }

    pub fn enchant(&self) -> &[ItemStat] {
        &self.enchant
    }

    pub fn fractured(&self) -> &[ItemStat] {
        &self.fractured
    }

    pub fn monster(&self) -> &[ItemStat] {
        &self.monster
    }

    pub fn pseudo(&self) -> &[ItemStat] {
        &self.pseudo
    }

    /// All stats: explicit, implicit, crafted, enchant, fractured, monster,
    /// then pseudo.
    pub fn all(&self) -> impl Iterator<Item = &ItemStat> {
        self.explicit
            .iter()
            .chain(&self.implicit)
            .chain(&self.crafted)
            .chain(&self.enchant)
            .chain(&self.fractured)
            .chain(&self.monster)
            .chain(&self.pseudo)
    }

    /// All non-pseudo stats, in `all()` order.
    pub fn base(&self) -> impl Iterator<Item = &ItemStat> {
        self.all().filter(|stat| stat.category != StatCategory::Pseudo)
    }

    pub fn len(&self) -> usize {
        self.all().count()
    }

    pub fn is_empty(&self) -> bool {
        self.all().next().is_none()
    }

    /// First stat with the given catalog id.
    pub fn find(&self, id: &str) -> Option<&ItemStat> {
        self.all()
            .find(|stat| stat.id.as_ref().is_some_and(|stat_id| stat_id.as_str() == id))
    }
}
