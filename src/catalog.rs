// Catalog module: the in-memory mapping from category to meal names.
// Everything here is pure: no file access, no printing. The store module
// decides when a mutation gets written to disk.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Built-in catalog used on first run or when the meal file is unusable.
const DEFAULT_MEALS: [(&str, [&str; 3]); 4] = [
    (
        "breakfast",
        ["Oatmeal with fruit", "Scrambled eggs on toast", "Yogurt parfait"],
    ),
    (
        "lunch",
        ["Chicken salad", "Veggie wrap", "Grilled cheese and tomato soup"],
    ),
    (
        "dinner",
        ["Spaghetti Bolognese", "Stir-fry tofu and veggies", "Salmon with rice"],
    ),
    (
        "snack",
        ["Apple and peanut butter", "Hummus and carrots", "Mixed nuts"],
    ),
];

/// Meal names grouped by lowercase category. Category order is insertion
/// order, which is also the order they are written back to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: IndexMap<String, Vec<String>>,
}

/// Result of `Catalog::add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added { category: String, meal: String },
    Duplicate { category: String, meal: String },
}

/// Result of `Catalog::remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed { category: String, meal: String },
    NoSuchCategory { category: String },
    OutOfRange { category: String, index: i64 },
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh copy of the built-in catalog (4 categories, 3 meals each).
    pub fn defaults() -> Self {
        let categories = DEFAULT_MEALS
            .iter()
            .map(|(category, meals)| {
                (
                    category.to_string(),
                    meals.iter().map(|m| m.to_string()).collect(),
                )
            })
            .collect();
        Catalog { categories }
    }

    /// Build a catalog from a document as it was read from disk.
    ///
    /// Keys are lowercased. When two keys only differ by case their lists
    /// are merged in document order and exact duplicates are dropped.
    pub fn from_document(document: IndexMap<String, Vec<String>>) -> Self {
        let mut catalog = Catalog::new();
        for (category, meals) in document {
            let list = catalog
                .categories
                .entry(category.to_lowercase())
                .or_default();
            for meal in meals {
                if !list.contains(&meal) {
                    list.push(meal);
                }
            }
        }
        catalog
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Categories with their meals, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(category, meals)| (category.as_str(), meals.as_slice()))
    }

    /// Meals of `category` (looked up case-insensitively).
    pub fn meals(&self, category: &str) -> Option<&[String]> {
        self.categories
            .get(&category.to_lowercase())
            .map(Vec::as_slice)
    }

    /// Append `meal` to `category`, creating the category if needed.
    /// A meal already present (exact match) is left alone.
    pub fn add(&mut self, category: &str, meal: &str) -> AddOutcome {
        let category = category.to_lowercase();
        let list = self.categories.entry(category.clone()).or_default();
        if list.iter().any(|m| m == meal) {
            return AddOutcome::Duplicate {
                category,
                meal: meal.to_string(),
            };
        }
        list.push(meal.to_string());
        AddOutcome::Added {
            category,
            meal: meal.to_string(),
        }
    }

    /// Remove the meal at 1-based `index` from `category`.
    pub fn remove(&mut self, category: &str, index: i64) -> RemoveOutcome {
        let category = category.to_lowercase();
        let list = match self.categories.get_mut(&category) {
            Some(list) if !list.is_empty() => list,
            _ => return RemoveOutcome::NoSuchCategory { category },
        };
        let position = match usize::try_from(index) {
            Ok(i) if (1..=list.len()).contains(&i) => i - 1,
            _ => return RemoveOutcome::OutOfRange { category, index },
        };
        let meal = list.remove(position);
        RemoveOutcome::Removed { category, meal }
    }

    /// Multi-line listing: a title-cased header per category followed by
    /// its meals numbered from 1.
    pub fn render_list(&self) -> String {
        let mut lines = Vec::new();
        for (category, meals) in self.iter() {
            lines.push(format!("{}:", title_case(category)));
            for (i, meal) in meals.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, meal));
            }
        }
        lines.join("\n")
    }
}

impl AddOutcome {
    /// Whether the catalog changed and needs saving.
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }
}

impl RemoveOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, RemoveOutcome::Removed { .. })
    }
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddOutcome::Added { category, meal } => write!(f, "Added '{meal}' to '{category}'."),
            AddOutcome::Duplicate { category, meal } => {
                write!(f, "'{meal}' already exists in '{category}'.")
            }
        }
    }
}

impl fmt::Display for RemoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoveOutcome::Removed { category, meal } => {
                write!(f, "Removed '{meal}' from '{category}'.")
            }
            RemoveOutcome::NoSuchCategory { category } => {
                write!(f, "No such category: '{category}'.")
            }
            RemoveOutcome::OutOfRange { category, .. } => {
                write!(f, "Index out of range for '{category}'.")
            }
        }
    }
}

/// Uppercase the first letter of every alphabetic run and lowercase the
/// rest, e.g. `"late-night snack"` becomes `"Late-Night Snack"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
