//! Item parser module.
//!
//! Provides `ItemParser`, the entry point that turns clipboard text into a
//! typed `Item`. It owns the stat catalog, the base type resolver and the
//! configuration, and runs the recognizer chain over the text.

use crate::catalog::StatCatalog;
use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::item::Item;
use crate::recognizer::{classify, ParseContext};
use crate::resolve::{NoTypeResolution, TypeResolver};
use crate::text::ItemText;
use std::sync::Arc;
use tracing::debug;

/// Parses clipboard item text into `Item`s.
///
/// The parser holds no per-item state, so one instance can parse any
/// number of items, from several threads when shared behind an `Arc`.
///
/// # Examples
///
/// ```rust
/// use itemtext::{Item, ItemParser, StatCategory, TemplateCatalog};
/// use std::sync::Arc;
///
/// let catalog = TemplateCatalog::builder()
///     .template(StatCategory::Explicit, "explicit.life", "+# to maximum Life")
///     .build();
/// let parser = ItemParser::new(Arc::new(catalog));
///
/// let item = parser
///     .parse("Rarity: Rare\nDoom Loop\nLeather Belt\n--------\nItem Level: 70\n--------\n+48 to maximum Life")
///     .unwrap();
/// assert_eq!(item.kind(), "equippable");
/// assert_eq!(item.type_name(), "Leather Belt");
///
/// let stats = item.stats().unwrap();
/// assert_eq!(stats.explicit()[0].id.as_ref().unwrap().as_str(), "explicit.life");
/// ```
#[derive(Clone)]
pub struct ItemParser {
    catalog: Arc<dyn StatCatalog>,
    resolver: Arc<dyn TypeResolver>,
    config: ParserConfig,
}

impl ItemParser {
    /// Create a parser over `catalog` with default configuration and no
    /// base type resolution.
    pub fn new(catalog: Arc<dyn StatCatalog>) -> Self {
        Self {
            catalog,
            resolver: Arc::new(NoTypeResolution),
            config: ParserConfig::default(),
        }
    }

    /// Use `resolver` to find base types of single-line magic items.
    pub fn with_resolver(mut self, resolver: Arc<dyn TypeResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidConfig` if `config` fails validation.
    pub fn with_config(mut self, config: ParserConfig) -> Result<Self, ParseError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one item.
    ///
    /// # Errors
    ///
    /// - `ParseError::EmptyInput` if the text has no lines
    /// - `ParseError::MissingRarity` if there is no `Rarity:` line
    /// - `ParseError::Unclassifiable` if no recognizer accepts the text
    pub fn parse(&self, item_text: &str) -> Result<Item, ParseError> {
        let text = ItemText::parse(item_text)?;
        self.parse_text(&text)
    }

    /// Parse one item given as separate lines.
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<Item, ParseError> {
        let text = ItemText::from_lines(lines)?;
        self.parse_text(&text)
    }

    fn parse_text(&self, text: &ItemText) -> Result<Item, ParseError> {
        if text.rarity_label().is_none() {
            debug!("item text has no rarity line");
            return Err(ParseError::MissingRarity);
        }

        let Some(recognizer) = classify(text) else {
            debug!(rarity = text.rarity_label(), "no recognizer accepted the item");
            return Err(ParseError::Unclassifiable {
                item_text: text.raw().to_string(),
            });
        };
        debug!(kind = recognizer.kind, "recognized item");

        let ctx = ParseContext {
            catalog: self.catalog.as_ref(),
            resolver: self.resolver.as_ref(),
            config: &self.config,
        };
        (recognizer.parse)(text, &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TemplateCatalog;
    use crate::category::StatCategory;

    fn parser() -> ItemParser {
        ItemParser::new(Arc::new(TemplateCatalog::builder().build()))
    }

    #[test]
    fn test_missing_rarity() {
        let err = parser().parse("Chaos Orb\n--------\nStack Size: 1/10").unwrap_err();
        assert!(matches!(err, ParseError::MissingRarity));
    }

    #[test]
    fn test_empty_input() {
        let err = parser().parse("  \n\n").unwrap_err();
        assert!(matches!(err, ParseError::EmptyInput));
    }

    #[test]
    fn test_unclassifiable_keeps_text() {
        let raw = "Rarity: Quest\nAn Odd Trinket";
        match parser().parse(raw) {
            Err(ParseError::Unclassifiable { item_text }) => assert_eq!(item_text, raw),
            other => panic!("expected Unclassifiable, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_lines_matches_parse() {
        let lines = ["Rarity: Currency", "Chaos Orb", "--------", "Stack Size: 3/10"];
        let parser = parser();
        let from_lines = parser.parse_lines(&lines).unwrap();
        let from_text = parser.parse(&lines.join("\n")).unwrap();
        assert_eq!(from_lines, from_text);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ParserConfig::default();
        config
            .category_fallbacks
            .insert(StatCategory::Explicit, vec![StatCategory::Explicit]);
        assert!(matches!(
            parser().with_config(config),
            Err(ParseError::InvalidConfig(_))
        ));
    }
}
