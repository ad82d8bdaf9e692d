//! Pseudo-stat aggregation.
//!
//! Derives pseudo stats (totals such as "+#% total Elemental Resistance")
//! from an item's extracted stats. Contributions are grouped per pseudo id;
//! a group only becomes a stat when at least two valued contributions
//! feed it.
//!
//! A stat granting two resistances at once ("+#% to Fire and Cold
//! Resistances") maps to both specific totals and to the elemental and
//! grand totals. It counts once toward each specific total, and once per
//! specific resistance it grants toward the elemental and grand totals.

use crate::catalog::{StatCatalog, StatTemplate};
use crate::category::StatCategory;
use crate::config::ResistanceGroups;
use crate::numeric::fill_template;
use crate::stat::{ItemStat, StatValue};
use crate::stat_id::StatId;
use std::collections::HashMap;
use tracing::trace;

/// One weighted contribution to a pseudo group.
#[derive(Debug, Clone, Copy)]
struct Contribution {
    value: StatValue,
    multiplier: f64,
}

#[derive(Debug)]
struct PseudoGroup {
    id: StatId,
    template: StatTemplate,
    contributions: Vec<Contribution>,
}

impl PseudoGroup {
    /// Combined value, or `None` when no contribution carries a value.
    ///
    /// Mixed single/min-max groups fold min-max contributions in at their
    /// midpoint and produce a single value.
    fn combined(&self) -> Option<StatValue> {
        let valued: Vec<&Contribution> = self
            .contributions
            .iter()
            .filter(|c| !c.value.is_valueless())
            .collect();
        if valued.is_empty() {
            return None;
        }

        if valued.iter().all(|c| c.value.min_max().is_some()) {
            let (min, max) = valued.iter().fold((0.0, 0.0), |(min, max), c| {
                let (lo, hi) = c.value.min_max().unwrap_or_default();
                (min + lo * c.multiplier, max + hi * c.multiplier)
            });
            return Some(StatValue::MinMax { min, max });
        }

        let value = valued
            .iter()
            .map(|c| {
                let base = match c.value {
                    StatValue::Single { value } => value,
                    StatValue::MinMax { min, max } => (min + max) / 2.0,
                    StatValue::Valueless => 0.0,
                };
                base * c.multiplier
            })
            .sum();
        Some(StatValue::Single { value })
    }

    fn valued_count(&self) -> usize {
        self.contributions
            .iter()
            .filter(|c| !c.value.is_valueless())
            .count()
    }
}

/// Derives pseudo stats from extracted stats.
///
/// # Examples
///
/// ```rust
/// use itemtext::catalog::TemplateCatalog;
/// use itemtext::config::ResistanceGroups;
/// use itemtext::pseudo::PseudoAggregator;
/// use itemtext::stat::{ItemStat, StatValue};
/// use itemtext::{StatCategory, StatId};
///
/// let catalog = TemplateCatalog::builder()
///     .pseudo("pseudo.pseudo_total_life", "+# total maximum Life", &["explicit.life", "implicit.life"])
///     .build();
/// let groups = ResistanceGroups::default();
///
/// let life = |category, id: &str, value| ItemStat {
///     category,
///     id: Some(StatId::new(id)),
///     text: String::new(),
///     text_with_placeholders: "+# to maximum Life".to_string(),
///     value: StatValue::Single { value },
/// };
/// let stats = vec![
///     life(StatCategory::Explicit, "explicit.life", 40.0),
///     life(StatCategory::Implicit, "implicit.life", 20.0),
/// ];
///
/// let pseudo = PseudoAggregator::new(&catalog, &groups).aggregate(&stats);
/// assert_eq!(pseudo.len(), 1);
/// assert_eq!(pseudo[0].value, StatValue::Single { value: 60.0 });
/// assert_eq!(pseudo[0].text, "+60 total maximum Life");
/// ```
pub struct PseudoAggregator<'a> {
    catalog: &'a dyn StatCatalog,
    resistances: &'a ResistanceGroups,
}

impl<'a> PseudoAggregator<'a> {
    pub fn new(catalog: &'a dyn StatCatalog, resistances: &'a ResistanceGroups) -> Self {
        Self {
            catalog,
            resistances,
        }
    }

    /// Derive pseudo stats from `stats`. Pure: `stats` is not modified and
    /// the output order follows the first contribution to each group.
    pub fn aggregate(&self, stats: &[ItemStat]) -> Vec<ItemStat> {
        let mut groups: Vec<PseudoGroup> = Vec::new();
        let mut index: HashMap<StatId, usize> = HashMap::new();

        for stat in stats.iter().filter(|s| s.category != StatCategory::Pseudo) {
            // Derived stats never feed other derived stats.
            let Some(id) = stat.id.as_ref().filter(|id| !id.is_pseudo()) else {
                continue;
            };
            let mappings = self.catalog.pseudo_mappings_for(id);
            let mapped: Vec<&StatId> = mappings.iter().map(|m| &m.pseudo_id).collect();

            for mapping in &mappings {
                let contribution = Contribution {
                    value: stat.value,
                    multiplier: self.multiplier(&mapping.pseudo_id, &mapped),
                };
                let slot = *index.entry(mapping.pseudo_id.clone()).or_insert_with(|| {
                    groups.push(PseudoGroup {
                        id: mapping.pseudo_id.clone(),
                        template: mapping.template.clone(),
                        contributions: Vec::new(),
                    });
                    groups.len() - 1
                });
                groups[slot].contributions.push(contribution);
            }
        }

        groups
            .into_iter()
            .filter(|group| group.valued_count() >= 2)
            .filter_map(|group| {
                let value = group.combined()?;
                trace!(pseudo = %group.id, contributors = group.valued_count(), "derived pseudo stat");
                let values = match value {
                    StatValue::Single { value } => vec![value],
                    StatValue::MinMax { min, max } => vec![min, max],
                    StatValue::Valueless => Vec::new(),
                };
                Some(ItemStat {
                    category: StatCategory::Pseudo,
                    text: fill_template(&group.template.text, &values),
                    text_with_placeholders: group.template.text.clone(),
                    id: Some(group.id),
                    value,
                })
            })
            .collect()
    }

    /// How many times a stat counts toward `pseudo_id`, given every pseudo
    /// id that stat maps to.
    fn multiplier(&self, pseudo_id: &StatId, mapped: &[&StatId]) -> f64 {
        if !self.resistances.is_total(pseudo_id) {
            return 1.0;
        }
        let specific = mapped
            .iter()
            .filter(|id| self.resistances.counts_toward(pseudo_id, id))
            .count();
        specific.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TemplateCatalog;

    const FIRE: &str = "pseudo.pseudo_total_fire_resistance";
    const COLD: &str = "pseudo.pseudo_total_cold_resistance";
    const CHAOS: &str = "pseudo.pseudo_total_chaos_resistance";
    const ELE: &str = "pseudo.pseudo_total_elemental_resistance";
    const TOTAL: &str = "pseudo.pseudo_total_resistance";

    fn catalog() -> TemplateCatalog {
        TemplateCatalog::builder()
            .pseudo(FIRE, "+#% total to Fire Resistance", &["explicit.fire", "explicit.fire_cold", "explicit.fire_chaos"])
            .pseudo(COLD, "+#% total to Cold Resistance", &["explicit.cold", "explicit.fire_cold"])
            .pseudo(CHAOS, "+#% total to Chaos Resistance", &["explicit.chaos", "explicit.fire_chaos"])
            .pseudo(ELE, "+#% total Elemental Resistance", &["explicit.fire", "explicit.cold", "explicit.fire_cold", "explicit.fire_chaos"])
            .pseudo(TOTAL, "+#% total Resistance", &["explicit.fire", "explicit.cold", "explicit.chaos", "explicit.fire_cold", "explicit.fire_chaos"])
            .pseudo("pseudo.pseudo_adds_chaos_damage", "Adds # to # Chaos Damage", &["explicit.chaos_dmg", "crafted.chaos_dmg"])
            .build()
    }

    fn single(id: &str, value: f64) -> ItemStat {
        ItemStat {
            category: StatCategory::Explicit,
            id: Some(StatId::new(id)),
            text: String::new(),
            text_with_placeholders: String::new(),
            value: StatValue::Single { value },
        }
    }

    fn aggregate(stats: &[ItemStat]) -> Vec<ItemStat> {
        let catalog = catalog();
        let groups = ResistanceGroups::default();
        PseudoAggregator::new(&catalog, &groups).aggregate(stats)
    }

    fn value_of(pseudo: &[ItemStat], id: &str) -> Option<StatValue> {
        pseudo
            .iter()
            .find(|s| s.id.as_ref().is_some_and(|i| i.as_str() == id))
            .map(|s| s.value)
    }

    #[test]
    fn test_double_resistance_weighting() {
        let pseudo = aggregate(&[single("explicit.fire_cold", 10.0), single("explicit.fire", 17.0)]);
        assert_eq!(value_of(&pseudo, FIRE), Some(StatValue::Single { value: 27.0 }));
        assert_eq!(value_of(&pseudo, ELE), Some(StatValue::Single { value: 37.0 }));
        assert_eq!(value_of(&pseudo, TOTAL), Some(StatValue::Single { value: 37.0 }));
        // Cold has a single contributor.
        assert_eq!(value_of(&pseudo, COLD), None);
    }

    #[test]
    fn test_chaos_pair_counts_twice_only_in_grand_total() {
        let pseudo = aggregate(&[single("explicit.fire_chaos", 10.0), single("explicit.cold", 5.0)]);
        assert_eq!(value_of(&pseudo, ELE), Some(StatValue::Single { value: 15.0 }));
        assert_eq!(value_of(&pseudo, TOTAL), Some(StatValue::Single { value: 25.0 }));
    }

    #[test]
    fn test_single_contributor_is_dropped() {
        assert!(aggregate(&[single("explicit.fire_cold", 10.0)]).is_empty());
        assert!(aggregate(&[single("explicit.fire", 10.0)]).is_empty());
    }

    #[test]
    fn test_min_max_sums_independently() {
        let mut a = single("explicit.chaos_dmg", 0.0);
        a.value = StatValue::MinMax { min: 10.0, max: 23.0 };
        let mut b = single("crafted.chaos_dmg", 0.0);
        b.category = StatCategory::Crafted;
        b.value = StatValue::MinMax { min: 3.0, max: 7.0 };

        let pseudo = aggregate(&[a, b]);
        assert_eq!(pseudo.len(), 1);
        assert_eq!(pseudo[0].value, StatValue::MinMax { min: 13.0, max: 30.0 });
        assert_eq!(pseudo[0].text, "Adds 13 to 30 Chaos Damage");
        assert_eq!(pseudo[0].category, StatCategory::Pseudo);
    }

    #[test]
    fn test_input_is_untouched_and_output_is_repeatable() {
        let stats = vec![single("explicit.fire", 10.0), single("explicit.cold", 12.0)];
        let before = stats.clone();
        let first = aggregate(&stats);
        let second = aggregate(&stats);
        assert_eq!(stats, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_pseudo_ids_do_not_feed_pseudo_groups() {
        let catalog = TemplateCatalog::builder()
            .pseudo(ELE, "+#% total Elemental Resistance", &[FIRE, "explicit.cold"])
            .build();
        let groups = ResistanceGroups::default();
        let stats = vec![single(FIRE, 30.0), single("explicit.cold", 12.0)];
        assert!(PseudoAggregator::new(&catalog, &groups).aggregate(&stats).is_empty());
    }

    #[test]
    fn test_unmatched_stats_are_ignored() {
        let stats = vec![
            ItemStat::unmatched(StatCategory::Explicit, "odd"),
            single("explicit.fire", 10.0),
        ];
        assert!(aggregate(&stats).is_empty());
    }
}
