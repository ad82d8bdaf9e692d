//! Error types for item parsing and catalog loading.
//!
//! Everything that can fail outright is represented by the `ParseError`
//! enum. Unmatched stat lines are not errors: they degrade to valueless
//! stats inside the parse.

use thiserror::Error;

/// Shorten item text for display, keeping the first line only.
fn first_line(text: &str) -> &str {
    text.lines().find(|line| !line.trim().is_empty()).unwrap_or("")
}

/// Errors that can occur while parsing item text or loading parser data.
///
/// # Examples
///
/// ```rust
/// use itemtext::ParseError;
///
/// let err = ParseError::Unclassifiable {
///     item_text: "Rarity: Mystery\nSomething".to_string(),
/// };
/// assert!(err.to_string().contains("Rarity: Mystery"));
/// ```
#[derive(Debug, Error)]
pub enum ParseError {
    /// No recognizer accepted the item text.
    ///
    /// The verbatim text is kept so callers can show it back to the user.
    #[error("Could not parse item text starting with: {}", first_line(.item_text))]
    Unclassifiable { item_text: String },

    /// The input had no non-blank lines.
    #[error("Item text is empty")]
    EmptyInput,

    /// The header section has no `Rarity:` line.
    #[error("Item text has no rarity header")]
    MissingRarity,

    /// A catalog document was structurally invalid.
    #[error("Invalid stat catalog: {0}")]
    Catalog(String),

    /// A catalog or configuration document failed to deserialize.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The parser configuration failed validation.
    #[error("Invalid parser configuration: {0}")]
    InvalidConfig(String),
}

impl ParseError {
    /// Whether this error means "the clipboard did not hold a recognizable item".
    ///
    /// These are user-recoverable: the caller should show a hint instead of
    /// reporting a defect.
    pub fn is_unparseable_input(&self) -> bool {
        matches!(
            self,
            ParseError::Unclassifiable { .. } | ParseError::EmptyInput | ParseError::MissingRarity
        )
    }
}
