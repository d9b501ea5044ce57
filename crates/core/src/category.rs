//! Tag-driven category inference.
//!
//! Listings are not categorised by hand. Instead the free-text tags a seller
//! enters are matched against [`CATEGORY_RULES`], an ordered table of
//! trigger substrings; the first category with a matching trigger wins and
//! anything unmatched is [`Category::General`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Coarse product category shown in, and searched by, the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    #[serde(rename = "Food & Drink")]
    FoodAndDrink,
    Fashion,
    Home,
    Education,
    Sports,
    General,
}

impl Category {
    /// Label stored with the product and displayed to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::FoodAndDrink => "Food & Drink",
            Self::Fashion => "Fashion",
            Self::Home => "Home",
            Self::Education => "Education",
            Self::Sports => "Sports",
            Self::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trigger substrings per category, in priority order.
///
/// Triggers are lowercase; tags are lowercased before matching.
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Electronics, &["electronic", "tech"]),
    (Category::FoodAndDrink, &["food", "drink"]),
    (Category::Fashion, &["clothing", "fashion"]),
    (Category::Home, &["home", "furniture"]),
    (Category::Education, &["book", "education"]),
    (Category::Sports, &["sport", "fitness"]),
];

/// Classify a free-text tag string into a [`Category`].
#[must_use]
pub fn infer_category(tags: &str) -> Category {
    let tags = tags.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| tags.contains(t)))
        .map_or(Category::General, |(category, _)| *category)
}
