use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

/// Display record for a category: stable id, human-readable name, and the
/// chart color the frontend renders it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Category {
    fn new(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

pub const UNCATEGORIZED: &str = "Uncategorized";

lazy_static! {
    static ref CATEGORIES: HashMap<&'static str, Category> = {
        let mut m = HashMap::new();
        for (id, name, color) in [
            ("1", "Arts, Culture & Entertainment", "#ff4b5c"),
            ("2", "News, Politics & Society", "#f15bb5"),
            ("3", "Technology & Science", "#3cba54"),
            ("4", "Health & Wellness", "#4ade80"),
            ("5", "Food, Drink & Lifestyle", "#ff6f61"),
            ("6", "Business & Finance", "#ffbe0b"),
            ("7", "Travel & Transportation", "#8ecae6"),
            ("8", "Education & Learning", "#5bc0eb"),
            ("9", "Family & Relationships", "#9d4edd"),
            ("10", "Shopping", "#ffb703"),
            ("11", "Sports", "#8338ec"),
            ("12", UNCATEGORIZED, "#aaaaaa"),
        ] {
            m.insert(name, Category::new(id, name, color));
        }
        m
    };
}

/// Static label-to-category table. Categories are keyed by label name; an
/// unknown label always resolves to the "Uncategorized" record.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryRegistry;

impl CategoryRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Resolves a predicted label to its display category, falling back to
    /// "Uncategorized" for labels the taxonomy does not know.
    pub fn resolve(&self, label: &str) -> &'static Category {
        CATEGORIES.get(label).unwrap_or_else(|| &CATEGORIES[UNCATEGORIZED])
    }

    /// True if the label names a real (non-fallback) category.
    pub fn contains(&self, label: &str) -> bool {
        CATEGORIES.contains_key(label)
    }

    pub fn len(&self) -> usize {
        CATEGORIES.len()
    }

    pub fn is_empty(&self) -> bool {
        CATEGORIES.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &'static Category> {
        CATEGORIES.values()
    }
}
