//! Core domain model and pure computations for the trolley shopping list.
//!
//! This crate holds the data types shared across the suite plus the three
//! pure engines that give the app its behavior:
//! - item-text parsing (quantity extraction),
//! - emoji annotation of item text,
//! - frequency/recency ranking of suggestions.
//!
//! Nothing in here performs I/O; storage lives in `trolley-store` and the
//! operations the UI calls live in `trolley-service`.

pub mod backup;
pub mod category;
pub mod emoji;
pub mod item;
pub mod list;
pub mod parse;
pub mod suggest;

pub use backup::Backup;
pub use category::Category;
pub use emoji::{annotate, find_emoji, strip_leading_emoji};
pub use item::{HeldItem, Item};
pub use list::{ListMember, MemberRole, ShoppingList, Uid, UserRef};
pub use parse::{capitalize_first, parse_item_text, ParsedItem};
pub use suggest::{normalized_key, rank, RankedSuggestion, Suggestion, DEFAULT_SUGGESTION_LIMIT};
