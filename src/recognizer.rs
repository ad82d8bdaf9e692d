//! Item kind recognizers.
//!
//! Each item kind has a pair of plain functions: `can_parse` inspects
//! structural markers (rarity, descriptor lines, keywords) and `parse`
//! extracts the kind's fields. The pairs are tried in `RECOGNIZERS` order
//! and the first accepting one wins; the conditions are written so at most
//! one accepts any well-formed item.

use crate::catalog::StatCatalog;
use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::item::{
    Equippable, Flask, FlaskProperties, Gem, GemQualityType, Influence, Item, ItemHeader, Jewel,
    Map, Organ, Prophecy, Rarity, StackSize, Stackable,
};
use crate::numeric::{find_tokens, first_number, parse_progress_pair};
use crate::resolve::{strip_markers, TypeResolver};
use crate::sockets::ItemSockets;
use crate::stat::ItemStats;
use crate::stats_parser::ItemStatsParser;
use crate::text::ItemText;

const ORGAN_DESCRIPTOR: &str = "Combine this with four other different samples";
const PROPHECY_DESCRIPTOR: &str = "Right-click to add this prophecy to your character.";
const FLASK_KEYWORD: &str = "Flask";
const JEWEL_KEYWORD: &str = "Jewel";
const BLIGHTED_PREFIX: &str = "Blighted ";
const BLIGHT_RAVAGED_PREFIX: &str = "Blight-ravaged ";
const VAAL_PREFIX: &str = "Vaal ";

/// Everything a recognizer's `parse` needs besides the text.
pub struct ParseContext<'a> {
    pub catalog: &'a dyn StatCatalog,
    pub resolver: &'a dyn TypeResolver,
    pub config: &'a ParserConfig,
}

impl<'a> ParseContext<'a> {
    fn stats(&self) -> ItemStatsParser<'a> {
        ItemStatsParser::new(self.catalog, self.config)
    }
}

/// One entry of the recognizer chain.
pub struct Recognizer {
    pub kind: &'static str,
    pub can_parse: fn(&ItemText) -> bool,
    pub parse: fn(&ItemText, &ParseContext<'_>) -> Result<Item, ParseError>,
}

/// The recognizer chain, most specific discriminator first.
pub const RECOGNIZERS: &[Recognizer] = &[
    Recognizer { kind: "currency", can_parse: is_currency, parse: parse_currency },
    Recognizer { kind: "divination_card", can_parse: is_divination_card, parse: parse_divination_card },
    Recognizer { kind: "gem", can_parse: is_gem, parse: parse_gem },
    Recognizer { kind: "map", can_parse: is_map, parse: parse_map },
    Recognizer { kind: "organ", can_parse: is_organ, parse: parse_organ },
    Recognizer { kind: "prophecy", can_parse: is_prophecy, parse: parse_prophecy },
    Recognizer { kind: "flask", can_parse: is_flask, parse: parse_flask },
    Recognizer { kind: "jewel", can_parse: is_jewel, parse: parse_jewel },
    Recognizer { kind: "fragment", can_parse: is_fragment, parse: parse_fragment },
    Recognizer { kind: "equippable", can_parse: is_equippable, parse: parse_equippable },
];

/// First recognizer accepting `text`.
pub fn classify(text: &ItemText) -> Option<&'static Recognizer> {
    RECOGNIZERS.iter().find(|recognizer| (recognizer.can_parse)(text))
}

// ----------------------------------------------------------------------------
// Shared field readers
// ----------------------------------------------------------------------------

fn rarity(text: &ItemText) -> Option<Rarity> {
    text.rarity_label().and_then(Rarity::from_label)
}

fn has_rarity(text: &ItemText, expected: Rarity) -> bool {
    rarity(text) == Some(expected)
}

fn is_equipment_rarity(text: &ItemText) -> bool {
    rarity(text).is_some_and(Rarity::is_equipment)
}

fn has_item_level(text: &ItemText) -> bool {
    text.value_of("Item Level").is_some()
}

fn number_of(text: &ItemText, label: &str) -> Option<f64> {
    text.value_of(label).and_then(first_number)
}

fn item_level(text: &ItemText) -> u32 {
    number_of(text, "Item Level").map_or(0, |v| v.max(0.0) as u32)
}

fn quality(text: &ItemText) -> u32 {
    number_of(text, "Quality").map_or(0, |v| v.max(0.0) as u32)
}

fn percent(text: &ItemText, label: &str) -> i32 {
    number_of(text, label).map_or(0, |v| v as i32)
}

fn is_identified(text: &ItemText) -> bool {
    !text.has_line("Unidentified")
}

fn is_corrupted(text: &ItemText) -> bool {
    text.has_line("Corrupted")
}

fn influence(text: &ItemText) -> Influence {
    Influence::MARKERS
        .iter()
        .find(|(marker, _)| text.has_line(marker))
        .map_or(Influence::None, |(_, influence)| *influence)
}

fn stack_size(text: &ItemText) -> Option<StackSize> {
    let (current, max) = parse_progress_pair(text.value_of("Stack Size")?)?;
    Some(StackSize {
        current: u32::try_from(current).ok()?,
        max: u32::try_from(max).ok()?,
    })
}

fn last_name_line(text: &ItemText) -> &str {
    text.names().last().map_or("", String::as_str)
}

fn header(text: &ItemText, name: String, type_name: String) -> Result<ItemHeader, ParseError> {
    Ok(ItemHeader {
        name,
        type_name,
        rarity: rarity(text).ok_or(ParseError::MissingRarity)?,
        item_text: text.raw().to_string(),
    })
}

/// Header for kinds whose single name line is also their type.
fn plain_header(text: &ItemText) -> Result<ItemHeader, ParseError> {
    let name = text.names().first().cloned().unwrap_or_default();
    header(text, name.clone(), name)
}

/// Resolve name and base type from the header lines.
///
/// Two lines are `name` then `type`. A single line is the type for normal
/// and unidentified items; for identified magic items it is an
/// affix-decorated type that goes through the resolver, falling back to
/// the cleaned line.
fn name_and_type(text: &ItemText, ctx: &ParseContext<'_>) -> (String, String) {
    match text.names() {
        [name, type_line, ..] => (name.clone(), strip_markers(type_line).to_string()),
        [single] => {
            let cleaned = strip_markers(single);
            let type_name = if has_rarity(text, Rarity::Magic) && is_identified(text) {
                ctx.resolver
                    .resolve_type(cleaned)
                    .unwrap_or_else(|| cleaned.to_string())
            } else {
                cleaned.to_string()
            };
            (single.clone(), type_name)
        }
        [] => (String::new(), String::new()),
    }
}

// ----------------------------------------------------------------------------
// Discriminators
// ----------------------------------------------------------------------------

fn is_currency(text: &ItemText) -> bool {
    has_rarity(text, Rarity::Currency)
}

fn is_divination_card(text: &ItemText) -> bool {
    has_rarity(text, Rarity::DivinationCard)
}

fn is_gem(text: &ItemText) -> bool {
    has_rarity(text, Rarity::Gem)
}

fn is_map(text: &ItemText) -> bool {
    is_equipment_rarity(text) && text.value_of("Map Tier").is_some()
}

fn is_organ(text: &ItemText) -> bool {
    is_equipment_rarity(text) && !is_map(text) && text.has_line_starting_with(ORGAN_DESCRIPTOR)
}

fn is_prophecy(text: &ItemText) -> bool {
    has_rarity(text, Rarity::Normal) && !has_item_level(text) && text.has_line(PROPHECY_DESCRIPTOR)
}

fn is_flask(text: &ItemText) -> bool {
    is_equipment_rarity(text)
        && has_item_level(text)
        && !is_map(text)
        && !is_organ(text)
        && text.names().iter().any(|line| line.contains(FLASK_KEYWORD))
}

fn is_jewel(text: &ItemText) -> bool {
    is_equipment_rarity(text)
        && has_item_level(text)
        && !is_map(text)
        && !is_organ(text)
        && !is_flask(text)
        && last_name_line(text).contains(JEWEL_KEYWORD)
}

fn is_fragment(text: &ItemText) -> bool {
    has_rarity(text, Rarity::Normal)
        && !has_item_level(text)
        && !is_map(text)
        && !text.has_line(PROPHECY_DESCRIPTOR)
}

fn is_equippable(text: &ItemText) -> bool {
    is_equipment_rarity(text)
        && has_item_level(text)
        && !is_map(text)
        && !is_organ(text)
        && !is_flask(text)
        && !is_jewel(text)
}

// ----------------------------------------------------------------------------
// Field parsers
// ----------------------------------------------------------------------------

fn parse_stackable(text: &ItemText) -> Result<Stackable, ParseError> {
    Ok(Stackable {
        header: plain_header(text)?,
        stack_size: stack_size(text),
    })
}

fn parse_currency(text: &ItemText, _ctx: &ParseContext<'_>) -> Result<Item, ParseError> {
    parse_stackable(text).map(Item::Currency)
}

fn parse_divination_card(text: &ItemText, _ctx: &ParseContext<'_>) -> Result<Item, ParseError> {
    parse_stackable(text).map(Item::DivinationCard)
}

fn parse_fragment(text: &ItemText, _ctx: &ParseContext<'_>) -> Result<Item, ParseError> {
    parse_stackable(text).map(Item::Fragment)
}

fn parse_prophecy(text: &ItemText, _ctx: &ParseContext<'_>) -> Result<Item, ParseError> {
    Ok(Item::Prophecy(Prophecy {
        header: plain_header(text)?,
    }))
}

/// Experience progress as a whole percentage, truncated.
pub(crate) fn experience_percent(value: &str) -> u32 {
    match parse_progress_pair(value) {
        Some((used, total)) if total > 0 => (used.saturating_mul(100) / total).min(100) as u32,
        _ => 0,
    }
}

/// First whitespace-separated word of a property value (`"+13% (augmented)"` -> `"+13%"`).
pub(crate) fn display_value(value: &str) -> String {
    value.split_whitespace().next().unwrap_or_default().to_string()
}

/// Split an alternate-quality prefix off a gem name.
pub(crate) fn gem_quality_type(name: &str) -> (GemQualityType, &str) {
    GemQualityType::PREFIXES
        .iter()
        .find_map(|(prefix, quality_type)| {
            name.strip_prefix(*prefix).map(|rest| (*quality_type, rest))
        })
        .unwrap_or((GemQualityType::Default, name))
}

fn parse_gem(text: &ItemText, _ctx: &ParseContext<'_>) -> Result<Item, ParseError> {
    let name = text.names().first().cloned().unwrap_or_default();
    let (quality_type, type_name) = gem_quality_type(&name);
    let tagged_vaal = text
        .sections()
        .get(1)
        .and_then(|section| section.first())
        .is_some_and(|tags| tags.split(',').any(|tag| tag.trim() == "Vaal"));
    let is_vaal_version = type_name.starts_with(VAAL_PREFIX) || tagged_vaal;
    let type_name = type_name.to_string();

    Ok(Item::Gem(Gem {
        header: header(text, name, type_name)?,
        level: text.value_of("Level").map(str::to_string).unwrap_or_default(),
        quality: text.value_of("Quality").map(display_value).unwrap_or_default(),
        experience_percent: text.value_of("Experience").map_or(0, experience_percent),
        is_corrupted: is_corrupted(text),
        is_vaal_version,
        quality_type,
    }))
}

fn parse_map(text: &ItemText, ctx: &ParseContext<'_>) -> Result<Item, ParseError> {
    let (name, type_name) = name_and_type(text, ctx);
    let is_blight_ravaged = text.names().iter().any(|l| l.contains(BLIGHT_RAVAGED_PREFIX));
    let is_blighted = !is_blight_ravaged && text.names().iter().any(|l| l.contains(BLIGHTED_PREFIX));
    let type_name = type_name
        .strip_prefix(BLIGHT_RAVAGED_PREFIX)
        .or_else(|| type_name.strip_prefix(BLIGHTED_PREFIX))
        .unwrap_or(&type_name)
        .to_string();
    let identified = is_identified(text);

    Ok(Item::Map(Map {
        header: header(text, name, type_name)?,
        tier: number_of(text, "Map Tier").map_or(0, |v| v.max(0.0) as u32),
        item_quantity: percent(text, "Item Quantity"),
        item_rarity: percent(text, "Item Rarity"),
        monster_pack_size: percent(text, "Monster Pack Size"),
        quality: quality(text),
        is_blighted,
        is_blight_ravaged,
        is_identified: identified,
        is_corrupted: is_corrupted(text),
        stats: if identified {
            ctx.stats().parse_map(text)
        } else {
            ItemStats::default()
        },
    }))
}

fn parse_organ(text: &ItemText, ctx: &ParseContext<'_>) -> Result<Item, ParseError> {
    let (name, type_name) = name_and_type(text, ctx);
    Ok(Item::Organ(Organ {
        header: header(text, name, type_name)?,
        stats: ctx.stats().parse_organ(text),
    }))
}

/// Read recovery, duration and charges from the flask property section.
fn flask_properties(text: &ItemText) -> FlaskProperties {
    let mut properties = FlaskProperties::default();
    let Some(section) = text.sections().get(1) else {
        return properties;
    };
    for line in section {
        let values: Vec<f64> = find_tokens(line).iter().map(|t| t.value).collect();
        if line.starts_with("Recovers ") {
            properties.recovery = values.first().copied();
            if line.contains(" over ") {
                properties.duration_seconds = values.get(1).copied();
            }
        } else if line.starts_with("Lasts ") {
            properties.duration_seconds = values.first().copied();
        } else if line.starts_with("Consumes ") {
            properties.charges_per_use = values.first().map(|v| *v as u32);
            properties.max_charges = values.get(1).map(|v| *v as u32);
        }
    }
    properties
}

fn parse_flask(text: &ItemText, ctx: &ParseContext<'_>) -> Result<Item, ParseError> {
    let (name, type_name) = name_and_type(text, ctx);
    let header = header(text, name, type_name)?;
    let identified = is_identified(text);
    let stats = if identified {
        ctx.stats().parse(text, header.rarity, true)
    } else {
        ItemStats::default()
    };
    Ok(Item::Flask(Flask {
        item_level: item_level(text),
        quality: quality(text),
        is_identified: identified,
        properties: flask_properties(text),
        stats,
        header,
    }))
}

fn parse_jewel(text: &ItemText, ctx: &ParseContext<'_>) -> Result<Item, ParseError> {
    let (name, type_name) = name_and_type(text, ctx);
    let header = header(text, name, type_name)?;
    let identified = is_identified(text);
    let stats = if identified {
        ctx.stats().parse(text, header.rarity, false)
    } else {
        ItemStats::default()
    };
    Ok(Item::Jewel(Jewel {
        item_level: item_level(text),
        is_identified: identified,
        is_corrupted: is_corrupted(text),
        stats,
        header,
    }))
}

fn parse_equippable(text: &ItemText, ctx: &ParseContext<'_>) -> Result<Item, ParseError> {
    let (name, type_name) = name_and_type(text, ctx);
    let header = header(text, name, type_name)?;
    let identified = is_identified(text);
    let stats = if identified {
        ctx.stats().parse(text, header.rarity, true)
    } else {
        ItemStats::default()
    };
    Ok(Item::Equippable(Equippable {
        item_level: item_level(text),
        quality: quality(text),
        is_identified: identified,
        is_corrupted: is_corrupted(text),
        influence: influence(text),
        sockets: text.value_of("Sockets").and_then(ItemSockets::parse),
        stats,
        header,
    }))
}
