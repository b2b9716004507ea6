pub mod calculator;
pub mod catalog;
pub mod types;

pub use types::{
    ActivityLevel, ComponentType, CookingMethod, Goal, MacroTargets, Meal, Menu, MenuItem,
    NutritionTotals, Recommendation, SelectedMeal, Sex, UserProfile,
};
