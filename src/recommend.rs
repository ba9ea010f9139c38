// Recommendation engine: picks a random meal from one category or from the
// whole catalog. The caller passes the generator in so tests can seed it.

use crate::catalog::{title_case, Catalog};
use fastrand::Rng;

/// Recommend a meal.
///
/// With a category, returns one of its meals verbatim, or a "no meals
/// found" message when the category is absent or empty. Without one, picks
/// a random non-empty category and returns `"<Category>: <meal>"`.
pub fn recommend(catalog: &Catalog, category: Option<&str>, rng: &mut Rng) -> String {
    match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => match catalog.meals(category) {
            Some(meals) if !meals.is_empty() => meals[rng.usize(..meals.len())].clone(),
            _ => format!("No meals found for category '{}'.", category),
        },
        None => recommend_any(catalog, rng),
    }
}

fn recommend_any(catalog: &Catalog, rng: &mut Rng) -> String {
    // Empty categories have nothing to offer, so only stocked ones take part.
    let stocked: Vec<(&str, &[String])> = catalog
        .iter()
        .filter(|(_, meals)| !meals.is_empty())
        .collect();
    if stocked.is_empty() {
        return "No meals in the catalog.".to_string();
    }
    let (category, meals) = stocked[rng.usize(..stocked.len())];
    let meal = &meals[rng.usize(..meals.len())];
    format!("{}: {}", title_case(category), meal)
}
