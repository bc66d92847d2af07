//! Core shared types for docsearch.
//!
//! This crate is intentionally small: the only dependency is `serde`, so
//! configuration and index crates can agree on category identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A symbol category, as emitted by the documentation generator.
///
/// The declaration order is the generator's own section order and is the
/// default display order for grouped results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    All,
    Classes,
    Namespaces,
    Files,
    Functions,
    Variables,
    Typedefs,
    Enums,
    #[serde(rename = "enumvalues")]
    EnumValues,
    Related,
    Defines,
    Groups,
    Pages,
    Concepts,
}

impl Category {
    pub const ALL: [Category; 14] = [
        Category::All,
        Category::Classes,
        Category::Namespaces,
        Category::Files,
        Category::Functions,
        Category::Variables,
        Category::Typedefs,
        Category::Enums,
        Category::EnumValues,
        Category::Related,
        Category::Defines,
        Category::Groups,
        Category::Pages,
        Category::Concepts,
    ];

    /// Identifier used in shard file names (`classes_c.js`) and in config files.
    pub const fn id(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Classes => "classes",
            Category::Namespaces => "namespaces",
            Category::Files => "files",
            Category::Functions => "functions",
            Category::Variables => "variables",
            Category::Typedefs => "typedefs",
            Category::Enums => "enums",
            Category::EnumValues => "enumvalues",
            Category::Related => "related",
            Category::Defines => "defines",
            Category::Groups => "groups",
            Category::Pages => "pages",
            Category::Concepts => "concepts",
        }
    }

    /// Human readable heading for a result group.
    pub const fn label(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Classes => "Classes",
            Category::Namespaces => "Namespaces",
            Category::Files => "Files",
            Category::Functions => "Functions",
            Category::Variables => "Variables",
            Category::Typedefs => "Typedefs",
            Category::Enums => "Enumerations",
            Category::EnumValues => "Enumerator",
            Category::Related => "Friends",
            Category::Defines => "Macros",
            Category::Groups => "Modules",
            Category::Pages => "Pages",
            Category::Concepts => "Concepts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown symbol category `{}`", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.id() == lowered)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Identifies a bucket of the index: one category, one leading character.
///
/// `letter` is always lowercase; it is the first character of the sort keys
/// stored in the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShardKey {
    pub category: Category,
    pub letter: char,
}

impl ShardKey {
    #[inline]
    pub fn new(category: Category, letter: char) -> Self {
        Self {
            category,
            letter: fold_letter(letter),
        }
    }
}

impl fmt::Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.letter)
    }
}

/// Lowercases a bucket character the same way sort keys are lowercased.
#[inline]
pub fn fold_letter(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

/// Monotonic identifier of one query attempt within a session.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl Generation {
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
