use std::collections::BTreeSet;
use std::fmt;

use crate::models::Thread;

pub const ALL_CATEGORIES: &str = "ALL";

/// Title-cases free-text categories: each word's first letter upper, rest lower.
pub fn to_title_case(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized category of a thread, `None` when absent or blank.
pub fn normalized_category(thread: &Thread) -> Option<String> {
    thread
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(to_title_case)
}

pub fn collect_categories(threads: &[Thread]) -> Vec<String> {
    threads
        .iter()
        .filter_map(normalized_category)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Merges `category` into an already sorted list, keeping it sorted and unique.
pub fn merge_category(categories: &mut Vec<String>, category: &str) {
    if category.trim().is_empty() {
        return;
    }
    let normalized = to_title_case(category);
    if let Err(pos) = categories.binary_search(&normalized) {
        categories.insert(pos, normalized);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parses a persisted filter; the `ALL` sentinel and blanks mean no filter.
    pub fn from_stored(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }

    pub fn as_stored(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Category(category) => category,
        }
    }

    pub fn matches(&self, thread: &Thread) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => {
                normalized_category(thread).as_deref() == Some(to_title_case(category).as_str())
            }
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Category(category) => f.write_str(&to_title_case(category)),
        }
    }
}
