//! Item stat region parsing.
//!
//! Finds the sections of an item text that hold stat lines, extracts each
//! line through the `StatExtractor`, and assembles the item's `ItemStats`
//! with pseudo stats appended. The map and organ variants differ only in
//! which catalog categories they search and how repeated lines count.

use crate::catalog::StatCatalog;
use crate::category::StatCategory;
use crate::config::ParserConfig;
use crate::extractor::StatExtractor;
use crate::item::{Influence, Rarity};
use crate::numeric::find_tokens;
use crate::pseudo::PseudoAggregator;
use crate::stat::{ItemStat, ItemStats, StatValue};
use crate::text::{is_property_line, ItemText};

/// Standalone marker lines that never hold stats.
const MARKER_LINES: &[&str] = &[
    "Corrupted",
    "Unidentified",
    "Mirrored",
    "Split",
    "Synthesised Item",
    "Fractured Item",
    "Searing Exarch Item",
    "Eater of Worlds Item",
];

/// Leading words of usage-instruction sections.
const DESCRIPTOR_PREFIXES: &[&str] = &[
    "Right click",
    "Right-click",
    "Place into",
    "Place an item",
    "Travel to this Map",
    "Combine this with",
    "Can be used in",
    "Shift click",
    "This is a Support Gem",
    "Will be used",
];

fn is_marker(line: &str) -> bool {
    MARKER_LINES.contains(&line) || Influence::MARKERS.iter().any(|(marker, _)| *marker == line)
}

fn is_non_stat_section(section: &[String]) -> bool {
    section.iter().all(|line| is_marker(line) || is_property_line(line))
        || section
            .first()
            .is_some_and(|line| DESCRIPTOR_PREFIXES.iter().any(|p| line.starts_with(p)))
}

/// Parses the stat region of an item text.
pub struct ItemStatsParser<'a> {
    catalog: &'a dyn StatCatalog,
    config: &'a ParserConfig,
}

impl<'a> ItemStatsParser<'a> {
    pub fn new(catalog: &'a dyn StatCatalog, config: &'a ParserConfig) -> Self {
        Self { catalog, config }
    }

    fn extractor(&self) -> StatExtractor<'a> {
        StatExtractor::new(self.catalog, self.config)
    }

    /// Sections after the `Item Level:` section (or after the header when
    /// there is none) that can hold stat lines.
    pub fn stat_sections<'t>(&self, text: &'t ItemText) -> Vec<&'t [String]> {
        let start = text.section_with_label("Item Level").map_or(1, |idx| idx + 1);
        text.sections()
            .iter()
            .skip(start)
            .filter(|section| !is_non_stat_section(section))
            .map(Vec::as_slice)
            .collect()
    }

    /// Parse equippable, flask and jewel stats.
    ///
    /// Lines default to explicit; a trailing annotation moves a line to
    /// the implicit, crafted, enchant or fractured partition. On uniques a
    /// trailing section with no catalog hit and no numbers is flavour text
    /// and is left out.
    pub fn parse(&self, text: &ItemText, rarity: Rarity, prefer_local: bool) -> ItemStats {
        let extractor = self.extractor();
        let mut sections: Vec<Vec<ItemStat>> = self
            .stat_sections(text)
            .into_iter()
            .map(|section| {
                section
                    .iter()
                    .filter_map(|line| extractor.extract(line, StatCategory::Explicit, prefer_local))
                    .collect()
            })
            .collect();

        if rarity == Rarity::Unique && sections.len() > 1 {
            if let Some(last) = sections.last() {
                if is_flavour_text(last) {
                    sections.pop();
                }
            }
        }

        self.assemble(sections.into_iter().flatten().collect())
    }

    /// Parse map stats: never local, searching the configured map
    /// categories. An annotated line searches its own category first, so
    /// `(implicit)` lines resolve to implicit ids when both exist.
    pub fn parse_map(&self, text: &ItemText) -> ItemStats {
        let extractor = self.extractor();
        let stats = self
            .stat_sections(text)
            .into_iter()
            .flatten()
            .filter_map(|line| {
                extractor.extract_in(line, StatCategory::Explicit, &self.config.map_categories, false)
            })
            .collect();
        self.assemble(stats)
    }

    /// Parse organ (monster) stats.
    ///
    /// Identical lines collapse into one stat whose value is the number of
    /// occurrences. A line seen once keeps its own value, or counts as 1
    /// when the template has no placeholder.
    pub fn parse_organ(&self, text: &ItemText) -> ItemStats {
        let extractor = self.extractor();
        let mut counted: Vec<(&str, usize)> = Vec::new();
        for line in self.stat_sections(text).into_iter().flatten() {
            match counted.iter_mut().find(|(seen, _)| *seen == line.as_str()) {
                Some((_, count)) => *count += 1,
                None => counted.push((line.as_str(), 1)),
            }
        }

        let stats = counted
            .into_iter()
            .filter_map(|(line, count)| {
                let mut stat = extractor.extract(line, StatCategory::Monster, false)?;
                stat.category = StatCategory::Monster;
                if count > 1 || stat.value.is_valueless() {
                    stat.value = StatValue::Single {
                        value: count as f64,
                    };
                }
                Some(stat)
            })
            .collect();
        self.assemble(stats)
    }

    /// Partition `stats` and append their pseudo stats.
    fn assemble(&self, stats: Vec<ItemStat>) -> ItemStats {
        let pseudo = PseudoAggregator::new(self.catalog, &self.config.resistances).aggregate(&stats);
        ItemStats::from_stats(stats, pseudo)
    }
}

fn is_flavour_text(section: &[ItemStat]) -> bool {
    section
        .iter()
        .all(|stat| !stat.is_matched() && find_tokens(&stat.text).is_empty())
}
