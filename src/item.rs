//! Parsed items.
//!
//! `Item` is a closed sum type with one variant per item kind. Every kind
//! carries an `ItemHeader` (name, type, rarity, verbatim text) plus only the
//! fields that apply to it.

use crate::sockets::ItemSockets;
use crate::stat::ItemStats;
use serde::{Deserialize, Serialize};

/// Rarity as shown on the header's `Rarity:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Normal,
    Magic,
    Rare,
    Unique,
    Gem,
    Currency,
    DivinationCard,
}

impl Rarity {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Normal" => Some(Rarity::Normal),
            "Magic" => Some(Rarity::Magic),
            "Rare" => Some(Rarity::Rare),
            "Unique" => Some(Rarity::Unique),
            "Gem" => Some(Rarity::Gem),
            "Currency" => Some(Rarity::Currency),
            "Divination Card" => Some(Rarity::DivinationCard),
            _ => None,
        }
    }

    /// Normal, magic, rare or unique: the rarities that roll affixes.
    pub fn is_equipment(self) -> bool {
        matches!(self, Rarity::Normal | Rarity::Magic | Rarity::Rare | Rarity::Unique)
    }
}

/// Influence marker of an equippable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Influence {
    #[default]
    None,
    Shaper,
    Elder,
    Crusader,
    Hunter,
    Redeemer,
    Warlord,
}

impl Influence {
    /// Marker lines and the influence they stand for.
    pub(crate) const MARKERS: &'static [(&'static str, Influence)] = &[
        ("Shaper Item", Influence::Shaper),
        ("Elder Item", Influence::Elder),
        ("Crusader Item", Influence::Crusader),
        ("Hunter Item", Influence::Hunter),
        ("Redeemer Item", Influence::Redeemer),
        ("Warlord Item", Influence::Warlord),
    ];
}

/// Alternate gem quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GemQualityType {
    #[default]
    Default,
    Anomalous,
    Divergent,
    Phantasmal,
}

impl GemQualityType {
    pub(crate) const PREFIXES: &'static [(&'static str, GemQualityType)] = &[
        ("Anomalous ", GemQualityType::Anomalous),
        ("Divergent ", GemQualityType::Divergent),
        ("Phantasmal ", GemQualityType::Phantasmal),
    ];
}

/// `Stack Size: current/max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSize {
    pub current: u32,
    pub max: u32,
}

/// Fields every item kind has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemHeader {
    pub name: String,
    pub type_name: String,
    pub rarity: Rarity,
    /// The clipboard text the item was parsed from.
    pub item_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equippable {
    pub header: ItemHeader,
    pub item_level: u32,
    pub quality: u32,
    pub is_identified: bool,
    pub is_corrupted: bool,
    pub influence: Influence,
    /// `None` when the item has no sockets.
    pub sockets: Option<ItemSockets>,
    pub stats: ItemStats,
}

/// Values read from a flask's property lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlaskProperties {
    /// Life or mana recovered per use.
    pub recovery: Option<f64>,
    pub duration_seconds: Option<f64>,
    pub charges_per_use: Option<u32>,
    pub max_charges: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flask {
    pub header: ItemHeader,
    pub item_level: u32,
    pub quality: u32,
    pub is_identified: bool,
    pub properties: FlaskProperties,
    pub stats: ItemStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gem {
    pub header: ItemHeader,
    /// Displayed level, e.g. `"15"` or `"20 (Max)"`.
    pub level: String,
    /// Displayed quality, e.g. `"+13%"`; empty without quality.
    pub quality: String,
    /// Progress toward the next level, truncated to a whole percent.
    pub experience_percent: u32,
    pub is_corrupted: bool,
    pub is_vaal_version: bool,
    pub quality_type: GemQualityType,
}

impl Gem {
    /// Numeric gem level, if the displayed level starts with one.
    pub fn level_value(&self) -> Option<u32> {
        leading_number(&self.level)
    }

    /// Numeric quality percentage, if any.
    pub fn quality_value(&self) -> Option<u32> {
        leading_number(self.quality.trim_start_matches('+'))
    }
}

fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub header: ItemHeader,
    pub tier: u32,
    pub item_quantity: i32,
    pub item_rarity: i32,
    pub monster_pack_size: i32,
    pub quality: u32,
    pub is_blighted: bool,
    pub is_blight_ravaged: bool,
    pub is_identified: bool,
    pub is_corrupted: bool,
    pub stats: ItemStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organ {
    pub header: ItemHeader,
    /// Monster modifiers only.
    pub stats: ItemStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jewel {
    pub header: ItemHeader,
    pub item_level: u32,
    pub is_identified: bool,
    pub is_corrupted: bool,
    pub stats: ItemStats,
}

/// Currency, divination cards and fragments: name, type and stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stackable {
    pub header: ItemHeader,
    pub stack_size: Option<StackSize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prophecy {
    pub header: ItemHeader,
}

/// A parsed item. Exactly one kind is active per instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Item {
    Equippable(Equippable),
    Flask(Flask),
    Gem(Gem),
    Map(Map),
    Organ(Organ),
    Jewel(Jewel),
    Currency(Stackable),
    DivinationCard(Stackable),
    Fragment(Stackable),
    Prophecy(Prophecy),
}

impl Item {
    pub fn header(&self) -> &ItemHeader {
        match self {
            Item::Equippable(item) => &item.header,
            Item::Flask(item) => &item.header,
            Item::Gem(item) => &item.header,
            Item::Map(item) => &item.header,
            Item::Organ(item) => &item.header,
            Item::Jewel(item) => &item.header,
            Item::Currency(item) | Item::DivinationCard(item) | Item::Fragment(item) => &item.header,
            Item::Prophecy(item) => &item.header,
        }
    }

    pub fn name(&self) -> &str {
        &self.header().name
    }

    pub fn type_name(&self) -> &str {
        &self.header().type_name
    }

    pub fn rarity(&self) -> Rarity {
        self.header().rarity
    }

    pub fn item_text(&self) -> &str {
        &self.header().item_text
    }

    /// The item's stats, for kinds that have them.
    pub fn stats(&self) -> Option<&ItemStats> {
        match self {
            Item::Equippable(item) => Some(&item.stats),
            Item::Flask(item) => Some(&item.stats),
            Item::Map(item) => Some(&item.stats),
            Item::Organ(item) => Some(&item.stats),
            Item::Jewel(item) => Some(&item.stats),
            Item::Gem(_)
            | Item::Currency(_)
            | Item::DivinationCard(_)
            | Item::Fragment(_)
            | Item::Prophecy(_) => None,
        }
    }

    /// Short lowercase name of the active kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Item::Equippable(_) => "equippable",
            Item::Flask(_) => "flask",
            Item::Gem(_) => "gem",
            Item::Map(_) => "map",
            Item::Organ(_) => "organ",
            Item::Jewel(_) => "jewel",
            Item::Currency(_) => "currency",
            Item::DivinationCard(_) => "divination_card",
            Item::Fragment(_) => "fragment",
            Item::Prophecy(_) => "prophecy",
        }
    }
}
