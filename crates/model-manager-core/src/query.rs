//! Search, category filtering and ordering over a scan result.
//!
//! All operations borrow from the scan cache and never reorder it.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scanner::ModelFile;

/// Sentinel category value meaning "no category filter"
pub const ALL_CATEGORIES: &str = "All";

/// Ordering applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Largest first
    #[default]
    Size,
    /// Case-insensitive ascending
    Name,
    /// Most recently modified first
    Date,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Name => "name",
            Self::Date => "date",
        }
    }

    /// Label used by selectors
    pub fn label(&self) -> &'static str {
        match self {
            Self::Size => "Size ↓",
            Self::Name => "Name",
            Self::Date => "Date",
        }
    }

    pub fn all() -> &'static [SortKey] {
        &[SortKey::Size, SortKey::Name, SortKey::Date]
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "size" => Ok(Self::Size),
            "name" => Ok(Self::Name),
            "date" | "modified" => Ok(Self::Date),
            _ => Err(format!("Unknown sort key: {} (expected size, name or date)", s)),
        }
    }
}

/// Category restriction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, model: &ModelFile) -> bool {
        match self {
            Self::All => true,
            Self::Only(label) => model.category.label == *label,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "{}", ALL_CATEGORIES),
            Self::Only(label) => write!(f, "{}", label),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == ALL_CATEGORIES {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_string()))
        }
    }
}

/// Case-insensitive substring match on the file name
///
/// An empty or whitespace-only query matches everything.
pub fn matches_search(model: &ModelFile, search: &str) -> bool {
    let query = search.trim().to_lowercase();
    query.is_empty() || model.name.to_lowercase().contains(&query)
}

/// Apply search and category filters, keeping input order
pub fn filter<'a>(
    models: &'a [ModelFile],
    search: &str,
    category: &CategoryFilter,
) -> Vec<&'a ModelFile> {
    models
        .iter()
        .filter(|m| matches_search(m, search))
        .filter(|m| category.matches(m))
        .collect()
}

/// Order models by `key` (stable for equal keys)
pub fn sort(models: &mut [&ModelFile], key: SortKey) {
    match key {
        SortKey::Size => models.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes)),
        SortKey::Name => models.sort_by_cached_key(|m| m.name.to_lowercase()),
        SortKey::Date => models.sort_by(|a, b| b.modified_at.cmp(&a.modified_at)),
    }
}

/// One filter/sort request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Filter then sort
    pub fn apply<'a>(&self, models: &'a [ModelFile]) -> Vec<&'a ModelFile> {
        let mut filtered = filter(models, &self.search, &self.category);
        sort(&mut filtered, self.sort);
        filtered
    }
}

/// Category choices for a result set: `"All"` then sorted distinct labels
pub fn unique_categories(models: &[ModelFile]) -> Vec<String> {
    let labels: BTreeSet<&str> = models.iter().map(|m| m.category.label.as_str()).collect();
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(labels.into_iter().map(str::to_string))
        .collect()
}
