//! Item-text parsing: quantity extraction from freeform input.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "milk x3", "milk X3", "milk x 3" is NOT accepted (digits must follow x)
    static ref TRAILING_X: Regex = Regex::new(r"(?i)^(.*?)\s*x(\d+)$").unwrap();
    // "2 apples"
    static ref LEADING_NUMBER: Regex = Regex::new(r"^(\d+)\s+(.*)$").unwrap();
}

/// Result of parsing raw item input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItem {
    pub text: String,
    pub quantity: Option<u32>,
}

/// Extract a quantity token from freeform item text.
///
/// Two patterns are recognized, trailing-x first:
/// - `<label> x<digits>` (case-insensitive x): "milk x3" → ("milk", 3)
/// - `<digits> <label>`: "2 apples" → ("apples", 2)
///
/// Only one pattern applies; anything else returns the trimmed text with no
/// quantity. Capitalization is the caller's concern, not this function's.
pub fn parse_item_text(raw: &str) -> ParsedItem {
    let trimmed = raw.trim();

    if let Some(caps) = TRAILING_X.captures(trimmed) {
        if let Ok(quantity) = caps[2].parse::<u32>() {
            return ParsedItem {
                text: caps[1].trim().to_string(),
                quantity: Some(quantity),
            };
        }
    }

    if let Some(caps) = LEADING_NUMBER.captures(trimmed) {
        if let Ok(quantity) = caps[1].parse::<u32>() {
            return ParsedItem {
                text: caps[2].trim().to_string(),
                quantity: Some(quantity),
            };
        }
    }

    ParsedItem {
        text: trimmed.to_string(),
        quantity: None,
    }
}

/// Uppercase the first letter of the text, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
