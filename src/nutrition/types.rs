use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Multiplier applied to BMR to estimate total daily energy expenditure.
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1, max = 120))]
    pub age: u32,
    pub sex: Sex,
    #[validate(range(min = 50.0, max = 280.0))]
    pub height_cm: f64,
    #[validate(range(min = 20.0, max = 400.0))]
    pub weight_kg: f64,
    pub activity: ActivityLevel,
    pub goal: Goal,
}

/// Daily macro targets in grams, derived from the calorie target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

/// Per-100g nutrition figures for a single preparation of a catalog meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookingMethod {
    pub method: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Carb,
    Protein,
    GoodFat,
    Fiber,
}

/// A catalog meal. All nutrition figures and the price are per 100g.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub price: f64,
    pub component_type: ComponentType,
    pub food_type: String,
    pub cooking_methods: Vec<CookingMethod>,
}

/// One meal picked by the user, with its portion in grams and an optional
/// cooking method (falls back to the meal's base figures when absent).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SelectedMeal {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1.0, max = 2000.0))]
    pub grams: f64,
    pub cooking_method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub cost: f64,
}

/// Portion-adjustment result returned by the recommendation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub meals: Vec<SelectedMeal>,
    pub adjusted_grams: Vec<f64>,
    pub totals: NutritionTotals,
    pub explanation: String,
}

/// One entry of an optimized menu. Nutrition and price are for the stated
/// gram amount, not per 100g.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub method: Option<String>,
    pub grams: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub breakfast: Vec<MenuItem>,
    pub lunch: Vec<MenuItem>,
    pub dinner: Vec<MenuItem>,
    pub total_cost: f64,
    pub total_calories: f64,
    pub explanation: String,
}

impl Menu {
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.breakfast
            .iter()
            .chain(self.lunch.iter())
            .chain(self.dinner.iter())
    }
}
