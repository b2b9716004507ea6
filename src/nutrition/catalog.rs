use lazy_static::lazy_static;
use std::collections::BTreeMap;

use crate::error::AppError;
use crate::nutrition::types::{ComponentType, CookingMethod, Meal};

fn method(
    name: &str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
    price: f64,
) -> CookingMethod {
    CookingMethod {
        method: name.to_string(),
        calories,
        protein,
        carbs,
        fat,
        fiber,
        price,
    }
}

#[allow(clippy::too_many_arguments)]
fn meal(
    name: &str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
    price: f64,
    component_type: ComponentType,
    food_type: &str,
    cooking_methods: Vec<CookingMethod>,
) -> Meal {
    Meal {
        name: name.to_string(),
        calories,
        protein,
        carbs,
        fat,
        fiber,
        price,
        component_type,
        food_type: food_type.to_string(),
        cooking_methods,
    }
}

lazy_static! {
    /// Static meal catalog. All figures per 100g; prices in VND per 100g.
    pub static ref MEALS: Vec<Meal> = vec![
        // Carbs
        meal("Brown rice", 130.0, 2.7, 27.0, 1.0, 2.8, 2500.0, ComponentType::Carb, "grains", vec![
            method("boiled", 216.0, 4.5, 45.0, 1.7, 4.6, 4000.0),
            method("steamed", 216.0, 4.5, 45.0, 1.7, 4.6, 4000.0),
        ]),
        meal("Oats", 379.0, 13.2, 66.3, 6.9, 10.1, 12500.0, ComponentType::Carb, "grains", vec![
            method("boiled", 307.0, 10.7, 54.1, 5.6, 8.2, 10000.0),
            method("raw", 189.0, 6.6, 33.2, 3.5, 5.1, 6250.0),
        ]),
        meal("Sweet potato", 86.0, 1.6, 20.0, 0.1, 3.0, 4000.0, ComponentType::Carb, "tubers", vec![
            method("baked", 129.0, 2.4, 30.0, 0.2, 4.5, 6000.0),
            method("boiled", 129.0, 2.4, 30.0, 0.2, 4.5, 6000.0),
        ]),
        meal("Banana", 89.0, 1.1, 23.0, 0.3, 2.6, 2500.0, ComponentType::Carb, "fruits", vec![
            method("raw", 105.0, 1.3, 27.0, 0.4, 3.1, 3000.0),
        ]),
        // Protein
        meal("Chicken breast", 165.0, 31.0, 0.0, 3.6, 0.0, 40000.0, ComponentType::Protein, "poultry", vec![
            method("grilled", 248.0, 46.5, 0.0, 5.4, 0.0, 20000.0),
            method("boiled", 248.0, 46.5, 0.0, 5.4, 0.0, 20000.0),
            method("baked", 248.0, 46.5, 0.0, 5.4, 0.0, 20000.0),
        ]),
        meal("Chicken egg", 155.0, 13.0, 1.1, 11.0, 0.0, 1500.0, ComponentType::Protein, "eggs", vec![
            method("boiled", 155.0, 13.0, 1.1, 11.0, 0.0, 3000.0),
            method("fried", 184.0, 13.0, 1.1, 14.0, 0.0, 3000.0),
            method("scrambled", 170.0, 13.0, 1.1, 12.0, 0.0, 3000.0),
        ]),
        meal("Salmon", 208.0, 22.0, 0.0, 13.0, 0.0, 60000.0, ComponentType::Protein, "fish", vec![
            method("baked", 312.0, 33.0, 0.0, 19.5, 0.0, 60000.0),
            method("grilled", 312.0, 33.0, 0.0, 19.5, 0.0, 60000.0),
        ]),
        meal("Yogurt", 61.0, 3.5, 4.7, 3.3, 0.0, 7500.0, ComponentType::Protein, "dairy", vec![
            method("plain", 122.0, 7.0, 9.4, 6.6, 0.0, 15000.0),
        ]),
        // Good fats
        meal("Almonds", 579.0, 21.2, 21.6, 49.9, 12.5, 17500.0, ComponentType::GoodFat, "nuts", vec![
            method("raw", 173.0, 6.4, 6.5, 15.0, 3.8, 5250.0),
        ]),
        meal("Butter", 717.0, 2.5, 4.4, 81.1, 10.0, 22500.0, ComponentType::GoodFat, "dairy", vec![
            method("spread", 107.0, 0.4, 0.7, 12.2, 1.5, 3375.0),
        ]),
        meal("Olive oil", 884.0, 0.0, 0.0, 100.0, 0.0, 12500.0, ComponentType::GoodFat, "oils", vec![
            method("drizzled", 132.0, 0.0, 0.0, 15.0, 0.0, 1875.0),
        ]),
        // Fiber
        meal("Broccoli", 34.0, 2.8, 6.6, 0.4, 2.6, 7500.0, ComponentType::Fiber, "vegetables", vec![
            method("steamed", 51.0, 4.2, 9.9, 0.6, 3.9, 11250.0),
            method("boiled", 51.0, 4.2, 9.9, 0.6, 3.9, 11250.0),
            method("raw", 51.0, 4.2, 9.9, 0.6, 3.9, 8000.0),
        ]),
        meal("Tomato", 18.0, 0.9, 3.9, 0.2, 1.2, 5000.0, ComponentType::Fiber, "vegetables", vec![
            method("raw", 36.0, 1.8, 7.8, 0.4, 2.4, 10000.0),
        ]),
        meal("Kale", 49.0, 4.3, 8.8, 0.9, 3.6, 6000.0, ComponentType::Fiber, "vegetables", vec![
            method("steamed", 98.0, 8.6, 17.6, 1.8, 7.2, 10000.0),
            method("sauteed", 98.0, 8.6, 17.6, 1.8, 7.2, 10000.0),
            method("raw", 98.0, 8.6, 17.6, 1.8, 7.2, 5000.0),
        ]),
        meal("Apple", 52.0, 0.3, 13.8, 0.2, 2.4, 4000.0, ComponentType::Fiber, "fruits", vec![
            method("raw", 95.0, 0.5, 25.1, 0.3, 4.4, 5000.0),
        ]),
    ];
}

/// Case-insensitive lookup by meal name.
pub fn find_meal(name: &str) -> Result<&'static Meal, AppError> {
    MEALS
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| AppError::UnknownMeal(name.to_string()))
}

/// Cooking method lookup within a meal, case-insensitive.
pub fn find_method<'a>(meal: &'a Meal, method: &str) -> Option<&'a CookingMethod> {
    meal.cooking_methods
        .iter()
        .find(|m| m.method.eq_ignore_ascii_case(method))
}

/// Catalog grouped by component type, in a stable order.
pub fn by_category() -> BTreeMap<String, Vec<&'static Meal>> {
    let mut grouped: BTreeMap<String, Vec<&'static Meal>> = BTreeMap::new();
    for meal in MEALS.iter() {
        let key = match meal.component_type {
            ComponentType::Carb => "carb",
            ComponentType::Protein => "protein",
            ComponentType::GoodFat => "good_fat",
            ComponentType::Fiber => "fiber",
        };
        grouped.entry(key.to_string()).or_default().push(meal);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(find_meal("chicken BREAST").unwrap().name, "Chicken breast");
    }

    #[test]
    fn unknown_meal_is_an_error() {
        assert!(matches!(
            find_meal("pizza"),
            Err(AppError::UnknownMeal(name)) if name == "pizza"
        ));
    }

    #[test]
    fn every_component_type_is_represented() {
        let grouped = by_category();
        for key in ["carb", "protein", "good_fat", "fiber"] {
            assert!(!grouped[key].is_empty(), "missing {key}");
        }
    }

    #[test]
    fn method_lookup_falls_through_to_none() {
        let salmon = find_meal("Salmon").unwrap();
        assert!(find_method(salmon, "grilled").is_some());
        assert!(find_method(salmon, "deep fried").is_none());
    }
}
