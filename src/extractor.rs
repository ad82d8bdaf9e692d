//! Stat line extraction.
//!
//! Matches one stat line against the catalog by trying every way of
//! turning its numbers into placeholders, most placeholders first, and
//! reads the stat's values from the numbers that were substituted.
//!
//! The search is bounded: never more placeholders than the catalog's
//! widest template, and lines with more than `MAX_REPLACEABLE_TOKENS`
//! numbers are only looked up verbatim.

use crate::catalog::{StatCatalog, StatTemplate};
use crate::category::{strip_annotation, StatCategory};
use crate::config::ParserConfig;
use crate::numeric::{find_tokens, placeholder_count, replace_tokens_into, NumericToken};
use crate::stat::{ItemStat, StatValue};
use tracing::trace;

/// Lines with more numbers than this skip the placeholder search.
pub const MAX_REPLACEABLE_TOKENS: usize = 8;

/// A catalog hit for one line.
#[derive(Debug, Clone)]
struct TemplateMatch<'c> {
    template: &'c StatTemplate,
    /// Values of the substituted tokens, left to right.
    values: Vec<f64>,
}

/// Extracts `ItemStat`s from single stat lines.
///
/// # Examples
///
/// ```rust
/// use itemtext::catalog::TemplateCatalog;
/// use itemtext::extractor::StatExtractor;
/// use itemtext::stat::StatValue;
/// use itemtext::{ParserConfig, StatCategory};
///
/// let catalog = TemplateCatalog::builder()
///     .template(StatCategory::Explicit, "explicit.stat_2223678961", "Adds # to # Chaos Damage")
///     .build();
/// let config = ParserConfig::default();
/// let extractor = StatExtractor::new(&catalog, &config);
///
/// let stat = extractor
///     .extract("Adds 10 to 23 Chaos Damage", StatCategory::Explicit, false)
///     .unwrap();
/// assert_eq!(stat.value, StatValue::MinMax { min: 10.0, max: 23.0 });
/// ```
pub struct StatExtractor<'a> {
    catalog: &'a dyn StatCatalog,
    config: &'a ParserConfig,
}

impl<'a> StatExtractor<'a> {
    pub fn new(catalog: &'a dyn StatCatalog, config: &'a ParserConfig) -> Self {
        Self { catalog, config }
    }

    /// Extract one stat line declared to be in `category`.
    ///
    /// A trailing annotation such as `(crafted)` overrides the declared
    /// category. When nothing matches in the category, its configured
    /// fallbacks are searched. Returns `None` only for blank lines; an
    /// unmatched line becomes a valueless stat carrying its own text.
    pub fn extract(&self, raw_line: &str, category: StatCategory, prefer_local: bool) -> Option<ItemStat> {
        let (_, annotated) = strip_annotation(raw_line);
        let category = annotated.unwrap_or(category);
        let mut categories = vec![category];
        categories.extend_from_slice(self.config.fallbacks_for(category));
        self.extract_in(raw_line, category, &categories, prefer_local)
    }

    /// Extract one line, searching the given catalog categories in order.
    /// A line annotation's category is searched first and tags the
    /// produced stat; otherwise the stat is tagged with `category`.
    pub fn extract_in(
        &self,
        raw_line: &str,
        category: StatCategory,
        search: &[StatCategory],
        prefer_local: bool,
    ) -> Option<ItemStat> {
        let (text, annotated) = strip_annotation(raw_line);
        if text.is_empty() {
            return None;
        }
        let category = annotated.unwrap_or(category);

        // The annotated category is searched before the configured ones.
        let mut order = annotated
            .into_iter()
            .chain(search.iter().copied().filter(|c| Some(*c) != annotated));

        let tokens = find_tokens(text);
        let found = order.find_map(|search_category| {
            self.find_template(text, &tokens, search_category, prefer_local)
        });

        let Some(found) = found else {
            trace!(line = text, %category, "no catalog template matched");
            return Some(ItemStat::unmatched(category, text));
        };

        trace!(line = text, id = %found.template.id, "matched catalog template");
        Some(ItemStat {
            category,
            id: Some(found.template.id.clone()),
            text: text.to_string(),
            text_with_placeholders: found.template.text.clone(),
            value: shape_value(&found.template.text, &found.values),
        })
    }

    fn find_template(
        &self,
        text: &str,
        tokens: &[NumericToken],
        category: StatCategory,
        prefer_local: bool,
    ) -> Option<TemplateMatch<'a>> {
        let widest = if tokens.len() > MAX_REPLACEABLE_TOKENS {
            0
        } else {
            tokens.len().min(self.catalog.max_placeholders())
        };
        let mut candidate = String::with_capacity(text.len());
        for replaced in (0..=widest).rev() {
            let mut subsets = Combinations::new(tokens.len(), replaced);
            while let Some(selected) = subsets.next_subset() {
                replace_tokens_into(&mut candidate, text, tokens, selected);
                let hits = self.catalog.lookup(category, &candidate);
                if let Some(template) = pick_variant(&hits, prefer_local) {
                    return Some(TemplateMatch {
                        template,
                        values: selected.iter().map(|&i| tokens[i].value).collect(),
                    });
                }
            }
        }
        None
    }
}

/// Choose between local and non-local variants sharing the same text.
fn pick_variant<'c>(hits: &[&'c StatTemplate], prefer_local: bool) -> Option<&'c StatTemplate> {
    hits.iter()
        .find(|t| t.is_local == prefer_local)
        .or_else(|| hits.first())
        .copied()
}

/// Build the value shape from the template's placeholder count.
///
/// Templates with more than two placeholders keep the first two values.
fn shape_value(template: &str, values: &[f64]) -> StatValue {
    match (placeholder_count(template), values) {
        (0, _) | (_, []) => StatValue::Valueless,
        (1, [value, ..]) => StatValue::Single { value: *value },
        (_, [value]) => StatValue::Single { value: *value },
        (_, [min, max, ..]) => StatValue::MinMax { min: *min, max: *max },
    }
}

/// The `r`-element subsets of `0..n` as ascending index lists, in
/// lexicographic order (`[0, 1]`, `[0, 2]`, `[1, 2]`, ...), produced one at
/// a time in a single reused buffer.
struct Combinations {
    n: usize,
    current: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl Combinations {
    fn new(n: usize, r: usize) -> Self {
        Self {
            n,
            current: (0..r).collect(),
            started: false,
            exhausted: r > n,
        }
    }

    fn next_subset(&mut self) -> Option<&[usize]> {
        if self.exhausted {
            return None;
        }
        if self.started {
            let r = self.current.len();
            // Rightmost position that can still advance.
            let Some(pos) = (0..r).rev().find(|&i| self.current[i] < self.n - r + i) else {
                self.exhausted = true;
                return None;
            };
            self.current[pos] += 1;
            for i in pos + 1..r {
                self.current[i] = self.current[i - 1] + 1;
            }
        }
        self.started = true;
        Some(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PseudoMapping, TemplateCatalog};
    use crate::stat_id::StatId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn catalog() -> TemplateCatalog {
        TemplateCatalog::builder()
            .template(StatCategory::Explicit, "explicit.life", "+# to maximum Life")
            .template(StatCategory::Explicit, "explicit.neg_life", "# to maximum Life")
            .template(StatCategory::Explicit, "explicit.phys", "Adds # to # Physical Damage")
            .template(StatCategory::Explicit, "explicit.phys_local", "Adds # to # Physical Damage (Local)")
            .template(StatCategory::Explicit, "explicit.poison", "#% chance for Poisons inflicted with this Weapon to deal 100% more Damage")
            .template(StatCategory::Explicit, "explicit.poison_300", "60% chance for Poisons inflicted with this Weapon to deal 300% more Damage")
            .template(StatCategory::Explicit, "explicit.unwavering", "Cannot be Stunned")
            .template(StatCategory::Explicit, "explicit.fixed", "Has 1 Abyssal Socket")
            .template(StatCategory::Crafted, "crafted.life", "+# to maximum Life")
            .template(StatCategory::Explicit, "explicit.currency", "Drops additional Currency Items")
            .build()
    }

    fn extract(line: &str, category: StatCategory, prefer_local: bool) -> ItemStat {
        let catalog = catalog();
        let config = ParserConfig::default();
        StatExtractor::new(&catalog, &config)
            .extract(line, category, prefer_local)
            .unwrap()
    }

    fn combinations(n: usize, r: usize) -> Vec<Vec<usize>> {
        let mut subsets = Combinations::new(n, r);
        let mut out = Vec::new();
        while let Some(selected) = subsets.next_subset() {
            out.push(selected.to_vec());
        }
        out
    }

    /// Counts lookups made against the wrapped catalog.
    struct CountingCatalog {
        inner: TemplateCatalog,
        lookups: AtomicUsize,
    }

    impl StatCatalog for CountingCatalog {
        fn lookup(&self, category: StatCategory, text: &str) -> Vec<&StatTemplate> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            self.inner.lookup(category, text)
        }

        fn pseudo_mappings_for(&self, stat_id: &StatId) -> Vec<PseudoMapping> {
            self.inner.pseudo_mappings_for(stat_id)
        }

        fn max_placeholders(&self) -> usize {
            self.inner.max_placeholders()
        }
    }

    fn counted_lookups(line: &str) -> (ItemStat, usize) {
        let counting = CountingCatalog {
            inner: catalog(),
            lookups: AtomicUsize::new(0),
        };
        let config = ParserConfig::default();
        let stat = StatExtractor::new(&counting, &config)
            .extract(line, StatCategory::Explicit, false)
            .unwrap();
        (stat, counting.lookups.load(Ordering::Relaxed))
    }

    #[test]
    fn test_combinations_order() {
        assert_eq!(combinations(3, 2), vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
        assert_eq!(combinations(2, 0), vec![Vec::<usize>::new()]);
        assert!(combinations(1, 2).is_empty());
        assert_eq!(combinations(4, 4).len(), 1);
        assert_eq!(combinations(5, 2).len(), 10);
    }

    #[test]
    fn test_search_stops_at_widest_template() {
        // Widest template has two placeholders: C(6,2) + C(6,1) + C(6,0).
        let (stat, lookups) = counted_lookups("1 2 3 4 5 6 unknown numbers");
        assert!(!stat.is_matched());
        assert_eq!(lookups, 15 + 6 + 1);
    }

    #[test]
    fn test_many_numbers_only_try_verbatim_text() {
        let line: String = (1..=30).map(|n| n.to_string()).collect::<Vec<_>>().join(" ");
        let (stat, lookups) = counted_lookups(&line);
        assert!(!stat.is_matched());
        assert_eq!(stat.text, line);
        assert_eq!(lookups, 1);
    }

    #[test]
    fn test_single_value() {
        let stat = extract("+52 to maximum Life", StatCategory::Explicit, false);
        assert_eq!(stat.id.unwrap().as_str(), "explicit.life");
        assert_eq!(stat.value, StatValue::Single { value: 52.0 });
        assert_eq!(stat.text, "+52 to maximum Life");
        assert_eq!(stat.text_with_placeholders, "+# to maximum Life");
    }

    #[test]
    fn test_negative_value() {
        let stat = extract("-10 to maximum Life", StatCategory::Explicit, false);
        assert_eq!(stat.id.unwrap().as_str(), "explicit.neg_life");
        assert_eq!(stat.value, StatValue::Single { value: -10.0 });
    }

    #[test]
    fn test_fixed_number_prefers_fewer_placeholders_only_when_needed() {
        let stat = extract(
            "60% chance for Poisons inflicted with this Weapon to deal 100% more Damage",
            StatCategory::Explicit,
            false,
        );
        assert_eq!(stat.id.unwrap().as_str(), "explicit.poison");
        assert_eq!(stat.value, StatValue::Single { value: 60.0 });
    }

    #[test]
    fn test_local_preference() {
        let local = extract("Adds 5 to 10 Physical Damage", StatCategory::Explicit, true);
        assert_eq!(local.id.unwrap().as_str(), "explicit.phys_local");
        assert_eq!(local.text_with_placeholders, "Adds # to # Physical Damage (Local)");

        let global = extract("Adds 5 to 10 Physical Damage", StatCategory::Explicit, false);
        assert_eq!(global.id.unwrap().as_str(), "explicit.phys");
        assert_eq!(global.value, StatValue::MinMax { min: 5.0, max: 10.0 });
    }

    #[test]
    fn test_annotation_selects_category() {
        let stat = extract("+20 to maximum Life (crafted)", StatCategory::Explicit, false);
        assert_eq!(stat.category, StatCategory::Crafted);
        assert_eq!(stat.id.unwrap().as_str(), "crafted.life");
        assert_eq!(stat.text, "+20 to maximum Life");
    }

    #[test]
    fn test_zero_placeholder_template_is_valueless() {
        let stat = extract("Has 1 Abyssal Socket", StatCategory::Explicit, false);
        assert_eq!(stat.id.unwrap().as_str(), "explicit.fixed");
        assert!(stat.value.is_valueless());

        let stat = extract("Cannot be Stunned", StatCategory::Explicit, false);
        assert!(stat.is_matched());
        assert!(stat.value.is_valueless());
    }

    #[test]
    fn test_unmatched_line_is_kept() {
        let stat = extract("Something entirely new 42 (implicit)", StatCategory::Explicit, false);
        assert!(!stat.is_matched());
        assert_eq!(stat.category, StatCategory::Implicit);
        assert_eq!(stat.text, "Something entirely new 42");
        assert_eq!(stat.text_with_placeholders, "Something entirely new 42");
    }

    #[test]
    fn test_monster_falls_back_to_explicit() {
        let stat = extract("Drops additional Currency Items", StatCategory::Monster, false);
        assert_eq!(stat.category, StatCategory::Monster);
        assert_eq!(stat.id.unwrap().as_str(), "explicit.currency");
    }

    #[test]
    fn test_blank_line_produces_nothing() {
        let catalog = catalog();
        let config = ParserConfig::default();
        let extractor = StatExtractor::new(&catalog, &config);
        assert!(extractor.extract("   ", StatCategory::Explicit, false).is_none());
    }
}
