//! Category filter used by catalog listings.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Category selection for product listings.
///
/// The catalog's own categories are free-form strings; `All` is the
/// storefront-side sentinel meaning "no category filter" and is spelled
/// `"all"` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// The wire spelling of [`CategoryFilter::All`].
    pub const ALL: &'static str = "all";

    /// Parse from a query parameter. Blank input and `"all"` mean no filter.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == Self::ALL {
            Self::All
        } else {
            Self::Named(trimmed.to_string())
        }
    }

    /// The wire value (`"all"` or the category name).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL,
            Self::Named(name) => name,
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Human-readable name: `"All Products"`, or each word capitalized.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::All => "All Products".to_string(),
            Self::Named(name) => name
                .split(' ')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
