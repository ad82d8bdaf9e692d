//! Clipboard item text.
//!
//! The game exports an item as lines grouped into sections separated by a
//! fixed `--------` line. The first section is the header (`Rarity:` line
//! followed by name and/or base type lines); properties are `Label: value`
//! lines; markers such as `Corrupted` stand alone.

use crate::error::ParseError;

/// The line separating sections.
pub const SEPARATOR: &str = "--------";

/// Item text split into trimmed, non-empty lines per section.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemText {
    raw: String,
    sections: Vec<Vec<String>>,
}

impl ItemText {
    /// Split clipboard text into sections.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use itemtext::text::ItemText;
    ///
    /// let text = ItemText::parse("Rarity: Currency\nChaos Orb\n--------\nStack Size: 5/10").unwrap();
    /// assert_eq!(text.sections().len(), 2);
    /// assert_eq!(text.rarity_label(), Some("Currency"));
    /// assert_eq!(text.names(), &["Chaos Orb".to_string()]);
    /// assert_eq!(text.value_of("Stack Size"), Some("5/10"));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let mut sections: Vec<Vec<String>> = vec![Vec::new()];
        for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if line == SEPARATOR {
                sections.push(Vec::new());
            } else if let Some(current) = sections.last_mut() {
                current.push(line.to_string());
            }
        }
        sections.retain(|section| !section.is_empty());
        if sections.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        Ok(Self {
            raw: raw.to_string(),
            sections,
        })
    }

    /// Build from already-split lines.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, ParseError> {
        let joined = lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n");
        Self::parse(&joined)
    }

    /// The text exactly as given.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn sections(&self) -> &[Vec<String>] {
        &self.sections
    }

    fn header(&self) -> &[String] {
        &self.sections[0]
    }

    fn rarity_position(&self) -> Option<usize> {
        self.header()
            .iter()
            .position(|line| line.starts_with("Rarity:"))
    }

    /// The value of the header's `Rarity:` line.
    pub fn rarity_label(&self) -> Option<&str> {
        self.rarity_position()
            .map(|pos| label_value(&self.header()[pos], "Rarity").unwrap_or(""))
    }

    /// Header lines after the rarity line: the name and/or base type.
    pub fn names(&self) -> &[String] {
        match self.rarity_position() {
            Some(pos) => &self.header()[pos + 1..],
            None => &[],
        }
    }

    /// Value of the first `label: value` line anywhere in the text,
    /// outside the header.
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .skip(1)
            .flatten()
            .find_map(|line| label_value(line, label))
    }

    /// Whether any line equals `line` exactly.
    pub fn has_line(&self, line: &str) -> bool {
        self.sections.iter().flatten().any(|l| l == line)
    }

    /// Whether any line starts with `prefix`.
    pub fn has_line_starting_with(&self, prefix: &str) -> bool {
        self.sections.iter().flatten().any(|l| l.starts_with(prefix))
    }

    /// Index of the first section holding a `label:` line.
    pub fn section_with_label(&self, label: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|section| section.iter().any(|line| label_value(line, label).is_some()))
    }
}

/// Value of a `label: value` line, or `None` when the line has another label.
pub fn label_value<'l>(line: &'l str, label: &str) -> Option<&'l str> {
    line.strip_prefix(label)
        .and_then(|rest| rest.strip_prefix(':'))
        .map(str::trim)
}

/// Whether a line looks like a `Label: value` property.
pub fn is_property_line(line: &str) -> bool {
    match line.split_once(": ") {
        Some((label, value)) => {
            !label.is_empty()
                && !value.is_empty()
                && label
                    .chars()
                    .all(|c| c.is_alphabetic() || c == ' ' || c == '\'')
        }
        None => line.ends_with(':'),
    }
}
