//! Numeric tokens in stat and property text.
//!
//! Numbers are read with invariant (non-locale) decimal rules: an optional
//! leading minus, digits, and at most one `.` fraction. Digit runs that do
//! not fit that shape (`1,000`, `1.2.3`) are not numeric tokens and stay
//! part of the literal text.

use once_cell::sync::Lazy;
use regex::Regex;

/// The marker substituted for a variable number in a stat template.
pub const PLACEHOLDER: &str = "#";

static NUMBER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:[.,]\d+)*").expect("number pattern is valid"));

/// One number found in a line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericToken {
    /// Byte offset of the first character (the sign, if negative).
    pub start: usize,
    /// Byte offset one past the last digit.
    pub end: usize,
    /// Parsed value; negative tokens keep their sign.
    pub value: f64,
}

/// Find every well-formed numeric token in `text`, left to right.
///
/// A `-` only counts as a sign when it does not directly follow a letter
/// or digit, so hyphenated words and ranges like `1-2` read as two
/// positive numbers.
///
/// # Examples
///
/// ```rust
/// use itemtext::numeric::find_tokens;
///
/// let tokens = find_tokens("Adds 10 to 23 Chaos Damage");
/// let values: Vec<f64> = tokens.iter().map(|t| t.value).collect();
/// assert_eq!(values, vec![10.0, 23.0]);
///
/// assert_eq!(find_tokens("-10 to maximum Life")[0].value, -10.0);
/// ```
pub fn find_tokens(text: &str) -> Vec<NumericToken> {
    NUMBER_RUN
        .find_iter(text)
        .filter_map(|m| {
            let mut start = m.start();
            if text[start..].starts_with('-')
                && text[..start]
                    .chars()
                    .next_back()
                    .is_some_and(|c| c.is_alphanumeric())
            {
                start += 1;
            }
            parse_invariant(&text[start..m.end()]).map(|value| NumericToken {
                start,
                end: m.end(),
                value,
            })
        })
        .collect()
}

/// Parse a number with invariant decimal rules, rejecting grouped digits.
pub fn parse_invariant(raw: &str) -> Option<f64> {
    if raw.contains(',') || raw.matches('.').count() > 1 {
        return None;
    }
    raw.parse::<f64>().ok()
}

/// Write `text` into `out` (cleared first) with the tokens at `selected`
/// indices replaced by the placeholder marker.
///
/// `selected` must be sorted ascending and index into `tokens`.
pub fn replace_tokens_into(out: &mut String, text: &str, tokens: &[NumericToken], selected: &[usize]) {
    out.clear();
    let mut cursor = 0;
    for &idx in selected {
        let token = &tokens[idx];
        out.push_str(&text[cursor..token.start]);
        out.push_str(PLACEHOLDER);
        cursor = token.end;
    }
    out.push_str(&text[cursor..]);
}

/// Number of placeholder markers in a template.
pub fn placeholder_count(template: &str) -> usize {
    template.matches(PLACEHOLDER).count()
}

/// Render a value the way the game does: whole numbers without a fraction.
///
/// # Examples
///
/// ```rust
/// use itemtext::numeric::format_value;
///
/// assert_eq!(format_value(27.0), "27");
/// assert_eq!(format_value(1.5), "1.5");
/// assert_eq!(format_value(-3.0), "-3");
/// ```
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Fill each placeholder in `template` with the next value, in order.
pub fn fill_template(template: &str, values: &[f64]) -> String {
    let mut values = values.iter();
    let mut out = String::with_capacity(template.len());
    let mut parts = template.split(PLACEHOLDER).peekable();
    while let Some(part) = parts.next() {
        out.push_str(part);
        if parts.peek().is_some() {
            match values.next() {
                Some(value) => out.push_str(&format_value(*value)),
                None => out.push_str(PLACEHOLDER),
            }
        }
    }
    out
}

/// The first numeric token of a property value (`"+20% (augmented)"` -> 20).
pub fn first_number(text: &str) -> Option<f64> {
    find_tokens(text).first().map(|token| token.value)
}

/// Parse a `used/total` pair whose parts may carry `.`/`,` thousands
/// separators (`"150/1.000"` -> `(150, 1000)`).
pub fn parse_progress_pair(text: &str) -> Option<(u64, u64)> {
    let (used, total) = text.split_once('/')?;
    let digits = |part: &str| -> Option<u64> {
        let cleaned: String = part
            .trim()
            .chars()
            .filter(|c| !matches!(c, '.' | ',' | ' ' | '\u{a0}'))
            .collect();
        cleaned.parse::<u64>().ok()
    };
    Some((digits(used)?, digits(total)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(text: &str) -> Vec<f64> {
        find_tokens(text).iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_decimal_token() {
        assert_eq!(values("Regenerate 1.5% of Life per second"), vec![1.5]);
    }

    #[test]
    fn test_hyphen_after_word_is_not_a_sign() {
        assert_eq!(values("Level-5 thing"), vec![5.0]);
        assert_eq!(values("1-2"), vec![1.0, 2.0]);
    }

    #[test]
    fn test_malformed_runs_are_skipped() {
        assert!(values("costs 1,000 gold").is_empty());
        assert!(values("version 1.2.3").is_empty());
        assert_eq!(values("1,000 and 7"), vec![7.0]);
    }

    fn replace_tokens(text: &str, tokens: &[NumericToken], selected: &[usize]) -> String {
        let mut out = String::from("stale");
        replace_tokens_into(&mut out, text, tokens, selected);
        out
    }

    #[test]
    fn test_replace_subset() {
        let text = "60% chance to deal 100% more Damage";
        let tokens = find_tokens(text);
        assert_eq!(
            replace_tokens(text, &tokens, &[0]),
            "#% chance to deal 100% more Damage"
        );
        assert_eq!(
            replace_tokens(text, &tokens, &[0, 1]),
            "#% chance to deal #% more Damage"
        );
        assert_eq!(replace_tokens(text, &tokens, &[]), text);
    }

    #[test]
    fn test_fill_template() {
        assert_eq!(fill_template("+#% total to Fire Resistance", &[27.0]), "+27% total to Fire Resistance");
        assert_eq!(fill_template("Adds # to # Damage", &[1.0]), "Adds 1 to # Damage");
    }

    #[test]
    fn test_progress_pair() {
        assert_eq!(parse_progress_pair("150/1.000"), Some((150, 1000)));
        assert_eq!(parse_progress_pair("1/15,249"), Some((1, 15249)));
        assert_eq!(parse_progress_pair("nope"), None);
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("+20% (augmented)"), Some(20.0));
        assert_eq!(first_number("none"), None);
    }
}
