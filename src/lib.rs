//! # itemtext - Typed Items from Game Clipboard Text
//!
//! Parses the item text the game puts on the clipboard into typed items:
//! - **Recognizer chain** picks exactly one item kind per text
//! - **Template matching** maps stat lines onto catalog stat ids
//! - **Pseudo stats** sum related stats into aggregate totals
//! - **Catalog-driven** design (no stat wording is built in)
//!
//! ## Core Concepts
//!
//! ### Parse Pipeline
//!
//! ```text
//! [clipboard text] → [ItemText] → [Recognizer] → [Item]
//!                                      ↓
//!                    [StatExtractor] → [PseudoAggregator] → [ItemStats]
//! ```
//!
//! 1. **ItemText** splits the text into `--------` separated sections
//! 2. **Recognizers** are tried in order; the first accepting one parses
//! 3. **StatExtractor** turns each stat line into an `ItemStat` by trying
//!    every way of replacing its numbers with `#` against the catalog
//! 4. **PseudoAggregator** derives totals from the matched stats
//!
//! ## Example
//!
//! ```rust
//! use itemtext::*;
//! use std::sync::Arc;
//!
//! let catalog = TemplateCatalog::builder()
//!     .template(StatCategory::Explicit, "explicit.fire", "+#% to Fire Resistance")
//!     .template(StatCategory::Explicit, "explicit.cold", "+#% to Cold Resistance")
//!     .pseudo("pseudo.pseudo_total_elemental_resistance", "+#% total Elemental Resistance",
//!         &["explicit.fire", "explicit.cold"])
//!     .build();
//! let parser = ItemParser::new(Arc::new(catalog));
//!
//! let item = parser.parse(
//!     "Rarity: Rare\nGale Coil\nRuby Ring\n--------\nItem Level: 80\n--------\n\
//!      +20% to Fire Resistance\n+15% to Cold Resistance",
//! ).unwrap();
//!
//! let stats = item.stats().unwrap();
//! assert_eq!(stats.pseudo()[0].value, StatValue::Single { value: 35.0 });
//! ```
//!
//! ## Modules
//!
//! - [`parser`] - Entry point
//! - [`recognizer`] - Item kind recognizers
//! - [`text`] - Clipboard text sections
//! - [`item`] - Parsed item types
//! - [`stats_parser`] - Stat region parsing
//! - [`extractor`] - Stat line to template matching
//! - [`pseudo`] - Pseudo stat aggregation
//! - [`catalog`] - Stat templates and pseudo definitions
//! - [`graph`] - Stat to pseudo stat contribution graph
//! - [`config`] - Parser configuration
//! - [`listing`] - Gems from trade listings
//! - [`error`] - Error types

pub mod catalog;
pub mod category;
pub mod config;
pub mod error;
pub mod extractor;
pub mod graph;
pub mod item;
pub mod listing;
pub mod numeric;
pub mod parser;
pub mod pseudo;
pub mod recognizer;
pub mod resolve;
pub mod sockets;
pub mod stat;
pub mod stat_id;
pub mod stats_parser;
pub mod text;

// Re-export main types for convenience
pub use catalog::{StatCatalog, TemplateCatalog};
pub use category::StatCategory;
pub use config::ParserConfig;
pub use error::ParseError;
pub use item::Item;
pub use parser::ItemParser;
pub use resolve::TypeResolver;
pub use stat::{ItemStat, ItemStats, StatValue};
pub use stat_id::StatId;
