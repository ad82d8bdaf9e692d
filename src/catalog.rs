//! Stat template catalog.
//!
//! The catalog is the read-only lookup every parse consults:
//! `(category, exact template text) -> template` and
//! `stat id -> pseudo templates it contributes to`. It is loaded once and
//! shared behind an `Arc` afterwards; nothing mutates it after load.

use crate::category::StatCategory;
use crate::error::ParseError;
use crate::graph::PseudoGraph;
use crate::numeric::{placeholder_count, PLACEHOLDER};
use crate::stat_id::StatId;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Trailing marker of local template variants in catalog text.
const LOCAL_SUFFIXES: &[&str] = &["(Local)", "(local)"];

/// One catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StatTemplate {
    /// Stable catalog key.
    pub id: StatId,
    /// Canonical template text, as the catalog spells it.
    pub text: String,
    /// The category this template belongs to.
    pub category: StatCategory,
    /// Whether the template applies to the item's own base (local) only.
    pub is_local: bool,
}

impl StatTemplate {
    /// Create a template. A trailing `(Local)` marks it as local.
    pub fn new(category: StatCategory, id: impl Into<StatId>, text: impl Into<String>) -> Self {
        let text = text.into();
        let is_local = split_local(&text).1;
        Self {
            id: id.into(),
            text,
            category,
            is_local,
        }
    }

    /// Template text without the local annotation; this is the lookup key.
    pub fn match_text(&self) -> &str {
        split_local(&self.text).0
    }
}

fn split_local(text: &str) -> (&str, bool) {
    let trimmed = text.trim();
    for suffix in LOCAL_SUFFIXES {
        if let Some(rest) = trimmed.strip_suffix(suffix) {
            return (rest.trim_end(), true);
        }
    }
    (trimmed, false)
}

/// The pseudo template a stat contributes to.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoMapping {
    pub pseudo_id: StatId,
    pub template: StatTemplate,
}

/// Read-only stat template lookups consumed by the parser.
///
/// Implementations must be safe to share across threads: parses running
/// concurrently query the same catalog without coordination.
pub trait StatCatalog: Send + Sync {
    /// Every template in `category` whose text equals `text` exactly.
    ///
    /// A local and a non-local variant may share the same text; both are
    /// returned and the caller picks.
    fn lookup(&self, category: StatCategory, text: &str) -> Vec<&StatTemplate>;

    /// Pseudo templates the stat with `stat_id` contributes to.
    fn pseudo_mappings_for(&self, stat_id: &StatId) -> Vec<PseudoMapping>;

    /// Largest placeholder count of any template; bounds the extractor's
    /// search. Implementations that cannot tell return `usize::MAX`.
    fn max_placeholders(&self) -> usize {
        usize::MAX
    }
}

/// The default catalog: hashed template index plus a pseudo contribution graph.
///
/// # Examples
///
/// ```rust
/// use itemtext::catalog::{StatCatalog, TemplateCatalog};
/// use itemtext::StatCategory;
///
/// let catalog = TemplateCatalog::builder()
///     .template(StatCategory::Explicit, "explicit.stat_life", "+# to maximum Life")
///     .build();
///
/// let hits = catalog.lookup(StatCategory::Explicit, "+# to maximum Life");
/// assert_eq!(hits.len(), 1);
/// assert!(catalog.lookup(StatCategory::Implicit, "+# to maximum Life").is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct TemplateCatalog {
    templates: Vec<StatTemplate>,
    index: HashMap<(StatCategory, String), Vec<usize>>,
    by_id: HashMap<StatId, usize>,
    max_placeholders: usize,
    pseudo_templates: HashMap<StatId, StatTemplate>,
    contributions: PseudoGraph,
}

#[derive(Debug, Deserialize)]
struct StatsDocument {
    result: Vec<StatGroup>,
}

#[derive(Debug, Deserialize)]
struct StatGroup {
    label: String,
    entries: Vec<StatEntry>,
}

#[derive(Debug, Deserialize)]
struct StatEntry {
    id: String,
    text: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PseudoDefinition {
    id: String,
    text: String,
    #[serde(default)]
    sources: Vec<String>,
}

impl TemplateCatalog {
    /// Start building a catalog by hand.
    pub fn builder() -> TemplateCatalogBuilder {
        TemplateCatalogBuilder::default()
    }

    /// Load the trade service's stats document.
    ///
    /// The document shape is
    /// `{"result":[{"label":"Explicit","entries":[{"id":..,"text":..,"type":..}]}]}`.
    /// An entry's `type` wins over its group label when both are present.
    pub fn from_json_str(json: &str) -> Result<Self, ParseError> {
        let document: StatsDocument = serde_json::from_str(json)?;
        let mut builder = Self::builder();
        for group in document.result {
            let group_category = StatCategory::from_label(&group.label);
            for entry in group.entries {
                if entry.id.trim().is_empty() || entry.text.trim().is_empty() {
                    return Err(ParseError::Catalog(format!(
                        "entry in group '{}' has an empty id or text",
                        group.label
                    )));
                }
                let category = entry
                    .kind
                    .as_deref()
                    .map(StatCategory::from_label)
                    .filter(|c| *c != StatCategory::Unknown)
                    .unwrap_or(group_category);
                builder = builder.template(category, entry.id.as_str(), entry.text);
            }
        }
        let catalog = builder.build();
        debug!(templates = catalog.templates.len(), "loaded stat templates");
        Ok(catalog)
    }

    /// Add pseudo definitions from a JSON array of
    /// `{"id": .., "text": .., "sources": [stat ids]}`.
    pub fn with_pseudo_json(mut self, json: &str) -> Result<Self, ParseError> {
        let definitions: Vec<PseudoDefinition> = serde_json::from_str(json)?;
        for definition in definitions {
            if !definition.text.contains(PLACEHOLDER) {
                return Err(ParseError::Catalog(format!(
                    "pseudo definition '{}' has no placeholder in '{}'",
                    definition.id, definition.text
                )));
            }
            let sources: Vec<StatId> = definition.sources.iter().map(|s| StatId::new(s)).collect();
            self.add_pseudo(StatId::new(&definition.id), definition.text, &sources);
        }
        debug!(
            pseudo_templates = self.pseudo_templates.len(),
            contributions = self.contributions.edge_count(),
            "loaded pseudo definitions"
        );
        Ok(self)
    }

    fn add_template(&mut self, template: StatTemplate) {
        let key = (template.category, template.match_text().to_string());
        let idx = self.templates.len();
        self.index.entry(key).or_default().push(idx);
        self.by_id.entry(template.id.clone()).or_insert(idx);
        self.max_placeholders = self.max_placeholders.max(placeholder_count(&template.text));
        self.templates.push(template);
    }

    fn add_pseudo(&mut self, id: StatId, text: String, sources: &[StatId]) {
        self.pseudo_templates
            .entry(id.clone())
            .or_insert_with(|| StatTemplate::new(StatCategory::Pseudo, id.clone(), text));
        for source in sources {
            self.contributions.add_contribution(source.clone(), id.clone());
        }
    }

    /// Number of (non-pseudo) templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Look up a template by id.
    pub fn template(&self, id: &StatId) -> Option<&StatTemplate> {
        self.pseudo_templates
            .get(id)
            .or_else(|| self.by_id.get(id).map(|&idx| &self.templates[idx]))
    }
}

impl StatCatalog for TemplateCatalog {
    fn lookup(&self, category: StatCategory, text: &str) -> Vec<&StatTemplate> {
        self.index
            .get(&(category, text.to_string()))
            .map(|indices| indices.iter().map(|&i| &self.templates[i]).collect())
            .unwrap_or_default()
    }

    fn pseudo_mappings_for(&self, stat_id: &StatId) -> Vec<PseudoMapping> {
        self.contributions
            .targets_of(stat_id)
            .into_iter()
            .filter_map(|pseudo_id| {
                self.pseudo_templates.get(&pseudo_id).map(|template| PseudoMapping {
                    pseudo_id,
                    template: template.clone(),
                })
            })
            .collect()
    }

    fn max_placeholders(&self) -> usize {
        self.max_placeholders
    }
}

/// Builder for `TemplateCatalog`, mostly for injecting fixture catalogs.
#[derive(Debug, Default)]
pub struct TemplateCatalogBuilder {
    catalog: TemplateCatalog,
}

impl TemplateCatalogBuilder {
    /// Add a stat template.
    pub fn template(
        mut self,
        category: StatCategory,
        id: impl Into<StatId>,
        text: impl Into<String>,
    ) -> Self {
        self.catalog.add_template(StatTemplate::new(category, id, text));
        self
    }

    /// Add a pseudo template and the stats that contribute to it.
    pub fn pseudo(mut self, id: impl Into<StatId>, text: impl Into<String>, sources: &[&str]) -> Self {
        let sources: Vec<StatId> = sources.iter().map(|s| StatId::new(s)).collect();
        self.catalog.add_pseudo(id.into(), text.into(), &sources);
        self
    }

    /// Finish building.
    pub fn build(self) -> TemplateCatalog {
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATS_JSON: &str = r#"{
        "result": [
            {
                "label": "Explicit",
                "entries": [
                    {"id": "explicit.stat_3299347043", "text": "+# to maximum Life", "type": "explicit"},
                    {"id": "explicit.stat_1940865751", "text": "Adds # to # Physical Damage (Local)", "type": "explicit"},
                    {"id": "explicit.stat_960081730", "text": "Adds # to # Physical Damage", "type": "explicit"}
                ]
            },
            {
                "label": "Implicit",
                "entries": [
                    {"id": "implicit.stat_3299347043", "text": "+# to maximum Life", "type": "implicit"}
                ]
            },
            {
                "label": "Veiled",
                "entries": [
                    {"id": "veiled.mod_1", "text": "Veiled Prefix"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_load_groups_by_category() {
        let catalog = TemplateCatalog::from_json_str(STATS_JSON).unwrap();
        assert_eq!(catalog.len(), 5);

        let explicit = catalog.lookup(StatCategory::Explicit, "+# to maximum Life");
        assert_eq!(explicit.len(), 1);
        assert_eq!(explicit[0].id.as_str(), "explicit.stat_3299347043");

        let implicit = catalog.lookup(StatCategory::Implicit, "+# to maximum Life");
        assert_eq!(implicit[0].id.as_str(), "implicit.stat_3299347043");

        assert_eq!(catalog.lookup(StatCategory::Unknown, "Veiled Prefix").len(), 1);
    }

    #[test]
    fn test_local_variants_share_a_key() {
        let catalog = TemplateCatalog::from_json_str(STATS_JSON).unwrap();
        let hits = catalog.lookup(StatCategory::Explicit, "Adds # to # Physical Damage");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|t| t.is_local));
        assert!(hits.iter().any(|t| !t.is_local));
    }

    #[test]
    fn test_template_by_id_and_widest_template() {
        let catalog = TemplateCatalog::from_json_str(STATS_JSON).unwrap();
        let local = catalog.template(&StatId::new("explicit.stat_1940865751")).unwrap();
        assert!(local.is_local);
        assert_eq!(
            catalog.template(&StatId::new("implicit.stat_3299347043")).unwrap().category,
            StatCategory::Implicit
        );
        assert!(catalog.template(&StatId::new("explicit.missing")).is_none());
        assert_eq!(catalog.max_placeholders(), 2);
        assert_eq!(TemplateCatalog::default().max_placeholders(), 0);
    }

    #[test]
    fn test_empty_entry_is_rejected() {
        let json = r#"{"result":[{"label":"Explicit","entries":[{"id":"","text":"x"}]}]}"#;
        assert!(matches!(
            TemplateCatalog::from_json_str(json),
            Err(ParseError::Catalog(_))
        ));
    }

    #[test]
    fn test_pseudo_json() {
        let pseudo = r#"[
            {"id": "pseudo.pseudo_total_life", "text": "+# total maximum Life",
             "sources": ["explicit.stat_3299347043", "implicit.stat_3299347043"]}
        ]"#;
        let catalog = TemplateCatalog::from_json_str(STATS_JSON)
            .unwrap()
            .with_pseudo_json(pseudo)
            .unwrap();

        let mappings = catalog.pseudo_mappings_for(&StatId::new("implicit.stat_3299347043"));
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].pseudo_id.as_str(), "pseudo.pseudo_total_life");
        assert_eq!(mappings[0].template.category, StatCategory::Pseudo);
        assert!(catalog.template(&StatId::new("pseudo.pseudo_total_life")).is_some());
    }

    #[test]
    fn test_pseudo_without_placeholder_is_rejected() {
        let pseudo = r#"[{"id": "pseudo.x", "text": "no number", "sources": []}]"#;
        let result = TemplateCatalog::default().with_pseudo_json(pseudo);
        assert!(matches!(result, Err(ParseError::Catalog(_))));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            TemplateCatalog::from_json_str("{not json"),
            Err(ParseError::Json(_))
        ));
    }
}
