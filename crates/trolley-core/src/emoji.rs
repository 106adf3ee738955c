//! Best-effort emoji annotation of item text.
//!
//! A flat keyword table of food and household terms, scanned longest-first
//! with word-boundary matching so short keywords never fire inside longer
//! words ("pea" inside "peanut"). False negatives are fine; an item without
//! an emoji is still a perfectly good item.

use lazy_static::lazy_static;

/// Keyword → emoji lookup table, including irregular plural forms.
const EMOJI_TABLE: &[(&str, &str)] = &[
    // Fruits
    ("apple", "🍎"),
    ("banana", "🍌"),
    ("orange", "🍊"),
    ("lemon", "🍋"),
    ("lime", "🍋"),
    ("grape", "🍇"),
    ("strawberry", "🍓"),
    ("strawberries", "🍓"),
    ("watermelon", "🍉"),
    ("melon", "🍈"),
    ("peach", "🍑"),
    ("pear", "🍐"),
    ("cherry", "🍒"),
    ("cherries", "🍒"),
    ("kiwi", "🥝"),
    ("mango", "🥭"),
    ("pineapple", "🍍"),
    ("coconut", "🥥"),
    ("avocado", "🥑"),
    // Vegetables
    ("tomato", "🍅"),
    ("tomatoes", "🍅"),
    ("carrot", "🥕"),
    ("corn", "🌽"),
    ("pepper", "🫑"),
    ("broccoli", "🥦"),
    ("lettuce", "🥬"),
    ("cucumber", "🥒"),
    ("potato", "🥔"),
    ("potatoes", "🥔"),
    ("onion", "🧅"),
    ("garlic", "🧄"),
    ("mushroom", "🍄"),
    ("eggplant", "🍆"),
    // Dairy
    ("milk", "🥛"),
    ("cheese", "🧀"),
    ("butter", "🧈"),
    ("egg", "🥚"),
    ("eggs", "🥚"),
    // Meat & protein
    ("chicken", "🍗"),
    ("bacon", "🥓"),
    ("steak", "🥩"),
    ("meat", "🥩"),
    ("fish", "🐟"),
    ("shrimp", "🍤"),
    // Bakery
    ("bread", "🍞"),
    ("bagel", "🥯"),
    ("croissant", "🥐"),
    ("baguette", "🥖"),
    // Beverages
    ("coffee", "☕"),
    ("tea", "🍵"),
    ("juice", "🧃"),
    ("soda", "🥤"),
    ("water", "💧"),
    ("wine", "🍷"),
    ("beer", "🍺"),
    // Snacks & sweets
    ("cookie", "🍪"),
    ("cookies", "🍪"),
    ("chocolate", "🍫"),
    ("candy", "🍬"),
    ("ice cream", "🍦"),
    ("donut", "🍩"),
    ("cake", "🍰"),
    ("pie", "🥧"),
    ("popcorn", "🍿"),
    ("chips", "🥨"),
    // Condiments
    ("ketchup", "🍅"),
    ("mustard", "🌭"),
    ("mayo", "🥚"),
    ("mayonnaise", "🥚"),
    ("honey", "🍯"),
    ("jam", "🍓"),
    // Pantry
    ("rice", "🍚"),
    ("pasta", "🍝"),
    ("cereal", "🥣"),
    ("soup", "🥫"),
    ("beans", "🫘"),
    // Other
    ("pizza", "🍕"),
    ("burger", "🍔"),
    ("taco", "🌮"),
    ("burrito", "🌯"),
    ("sandwich", "🥪"),
    ("salad", "🥗"),
    ("peanut", "🥜"),
    ("peanuts", "🥜"),
    ("salt", "🧂"),
    ("oil", "🫒"),
];

lazy_static! {
    /// Table entries sorted longest keyword first, so "peanut" is tried
    /// before "pea" ever could be and "ice cream" before "cream"-like terms.
    static ref SCAN_ORDER: Vec<(&'static str, &'static str)> = {
        let mut entries = EMOJI_TABLE.to_vec();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));
        entries
    };
}

fn is_emoji_char(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F300..=0x1F9FF | 0x1FA70..=0x1FAFF | 0x2600..=0x27BF
    )
}

/// Strip a single leading emoji character and any whitespace after it.
///
/// Covers the codepoint ranges the annotation table emits; text without a
/// leading emoji is returned unchanged.
pub fn strip_leading_emoji(text: &str) -> &str {
    match text.chars().next() {
        Some(c) if is_emoji_char(c) => text[c.len_utf8()..].trim_start(),
        _ => text,
    }
}

/// Whole-word match, accepting a simple `s`/`es` plural of the keyword.
fn token_matches(token: &str, keyword: &str) -> bool {
    token == keyword
        || token.strip_suffix('s') == Some(keyword)
        || token.strip_suffix("es") == Some(keyword)
}

/// Find a representative emoji for the item text, if the table knows one.
///
/// The lowercased text is checked for an exact table hit first; otherwise
/// keywords are scanned longest-first against whole words of the text.
pub fn find_emoji(text: &str) -> Option<&'static str> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    for (keyword, emoji) in EMOJI_TABLE {
        if *keyword == lower {
            return Some(emoji);
        }
    }

    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    for (keyword, emoji) in SCAN_ORDER.iter() {
        match keyword.split_once(' ') {
            Some((first, second)) => {
                // Multi-word keyword: match consecutive tokens.
                if tokens
                    .windows(2)
                    .any(|w| token_matches(w[0], first) && token_matches(w[1], second))
                {
                    return Some(emoji);
                }
            }
            None => {
                if tokens.iter().any(|t| token_matches(t, keyword)) {
                    return Some(emoji);
                }
            }
        }
    }

    None
}

/// Prefix the text with a matching emoji and a space.
///
/// If the text already contains the chosen emoji, or nothing matches, the
/// input is returned unchanged — annotation is idempotent and never fails.
pub fn annotate(text: &str) -> String {
    match find_emoji(text) {
        Some(emoji) if !text.contains(emoji) => format!("{} {}", emoji, text),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert_eq!(find_emoji("milk"), Some("🥛"));
        assert_eq!(find_emoji("Milk"), Some("🥛"));
        assert_eq!(find_emoji("ice cream"), Some("🍦"));
    }

    #[test]
    fn word_boundary_match() {
        assert_eq!(find_emoji("whole milk"), Some("🥛"));
        assert_eq!(find_emoji("vanilla ice cream"), Some("🍦"));
    }

    #[test]
    fn plural_forms() {
        assert_eq!(find_emoji("apples"), Some("🍎"));
        assert_eq!(find_emoji("strawberries"), Some("🍓"));
        assert_eq!(find_emoji("tomatoes"), Some("🍅"));
        assert_eq!(find_emoji("eggs"), Some("🥚"));
    }

    #[test]
    fn longest_keyword_wins() {
        // "chocolate" (9) is tried before "milk" (4).
        assert_eq!(find_emoji("chocolate milk"), Some("🍫"));
        assert_eq!(find_emoji("peanuts"), Some("🥜"));
    }

    #[test]
    fn no_substring_false_positives() {
        // Source behavior matched "tea" inside "steak"; word-boundary
        // matching does not.
        assert_eq!(find_emoji("steak"), Some("🥩"));
        assert_eq!(find_emoji("xyz-nonfood-item"), None);
    }

    #[test]
    fn annotate_prefixes_and_is_idempotent() {
        let once = annotate("apples");
        assert_eq!(once, "🍎 apples");
        assert_eq!(annotate(&once), once);
    }

    #[test]
    fn annotate_unknown_text_unchanged() {
        assert_eq!(annotate("xyz-nonfood-item"), "xyz-nonfood-item");
        assert_eq!(annotate(""), "");
    }

    #[test]
    fn strip_leading_emoji_variants() {
        assert_eq!(strip_leading_emoji("🍎 Apples"), "Apples");
        assert_eq!(strip_leading_emoji("☕ Coffee"), "Coffee");
        assert_eq!(strip_leading_emoji("🫑 Peppers"), "Peppers");
        assert_eq!(strip_leading_emoji("Apples"), "Apples");
        assert_eq!(strip_leading_emoji(""), "");
    }
}
