use std::fmt::Write;

use crate::nutrition::catalog::MEALS;
use crate::nutrition::types::{Goal, MacroTargets, NutritionTotals, UserProfile};

/// A selected meal resolved against the catalog, ready for prompting.
pub struct MealLine {
    pub name: String,
    pub method: Option<String>,
    pub grams: f64,
}

fn goal_guidance(profile: &UserProfile) -> &'static str {
    match profile.goal {
        Goal::Lose => {
            "The goal is \"lose\": keep total calories below the daily target and protect protein intake."
        }
        Goal::Gain => {
            "The goal is \"gain\": push total calories above the daily target and emphasize protein."
        }
        Goal::Maintain => {
            "The goal is \"maintain\": keep calories steady and the macros balanced."
        }
    }
}

fn profile_block(profile: &UserProfile, daily_calories: f64, targets: &MacroTargets) -> String {
    format!(
        "User profile:\n\
         - Age: {}, Sex: {:?}\n\
         - Height: {}cm, Weight: {}kg\n\
         - Activity level: {:?}, Goal: {:?}\n\
         - Daily calorie target: {:.0}\n\
         - Protein target: {:.1}g\n\
         - Carb target: {:.1}g\n\
         - Fat target: {:.1}g\n\
         - Fiber target: {:.1}g",
        profile.age,
        profile.sex,
        profile.height_cm,
        profile.weight_kg,
        profile.activity,
        profile.goal,
        daily_calories,
        targets.protein_g,
        targets.carbs_g,
        targets.fat_g,
        targets.fiber_g,
    )
}

/// Portion-adjustment prompt. Pure formatting; identical inputs always
/// produce an identical string.
pub fn recommendation_prompt(
    profile: &UserProfile,
    daily_calories: f64,
    targets: &MacroTargets,
    lines: &[MealLine],
    current: &NutritionTotals,
) -> String {
    let meal_descriptions: Vec<String> = lines
        .iter()
        .map(|l| match &l.method {
            Some(m) => format!("{} ({}, {}g)", l.name, m, l.grams),
            None => format!("{} ({}g)", l.name, l.grams),
        })
        .collect();

    format!(
        "You are a professional nutrition coach. Analyze the current meal plan \
         and suggest portion adjustments matching the user's goal and targets.\n\n\
         {}\n\n\
         Current meal plan:\n{}\n\n\
         Current totals:\n\
         - Calories: {:.1} (target: {:.0})\n\
         - Protein: {:.1}g (target: {:.1}g)\n\
         - Carbs: {:.1}g (target: {:.1}g)\n\
         - Fat: {:.1}g (target: {:.1}g)\n\
         - Fiber: {:.1}g (target: {:.1}g)\n\n\
         Note: protein and carbs carry 4 kcal per gram, fat 9 kcal per gram.\n\n\
         {}\n\n\
         Rules:\n\
         1. Return exactly {} adjusted amounts, one per meal, in order.\n\
         2. Every amount is in GRAMS, between 25 and 400.\n\
         3. Every amount must be a multiple of 25 (25g, 50g, 75g, ...).\n\
         4. Make meaningful adjustments (at least 25g) when the totals are far from target.\n\
         5. If the current plan is already within 10% of target, adjust by at most 25-50g.\n\
         6. All nutrition figures above are per 100g of the listed preparation.\n\n\
         Reply with valid JSON only:\n\
         {{\n\
             \"adjusted_grams\": [list of {} gram values, each a multiple of 25],\n\
             \"explanation\": \"why the portions changed, tied to the nutrition gaps and the goal\"\n\
         }}",
        profile_block(profile, daily_calories, targets),
        meal_descriptions.join(", "),
        current.calories,
        daily_calories,
        current.protein,
        targets.protein_g,
        current.carbs,
        targets.carbs_g,
        current.fat,
        targets.fat_g,
        current.fiber,
        targets.fiber_g,
        goal_guidance(profile),
        lines.len(),
        lines.len(),
    )
}

/// Budget-menu prompt embedding the full catalog with per-method figures.
pub fn menu_prompt(
    profile: &UserProfile,
    daily_calories: f64,
    targets: &MacroTargets,
    budget: f64,
) -> String {
    let mut catalog = String::new();
    for meal in MEALS.iter() {
        let methods: Vec<String> = meal
            .cooking_methods
            .iter()
            .map(|m| {
                format!(
                    "{} ({} cal, {}g protein, {}g carbs, {}g fat, {}g fiber, {} per 100g)",
                    m.method, m.calories, m.protein, m.carbs, m.fat, m.fiber, m.price
                )
            })
            .collect();
        let _ = writeln!(catalog, "- {}\n  Cooking methods: {}", meal.name, methods.join(", "));
    }

    format!(
        "You are a professional nutrition coach designing a full day of meals.\n\n\
         {}\n\
         - Daily budget: {:.0}\n\n\
         Available meals:\n{}\n\
         Build an optimized menu (breakfast, lunch, dinner) such that:\n\
         1. The total cost stays within the budget of {:.0}.\n\
         2. The day lands near the calorie target of {:.0}.\n\
         3. {}\n\
         4. Every amount is in grams, a multiple of 25, minimum 25g.\n\
         5. Only use meals and cooking methods from the list above.\n\n\
         Price arithmetic: all prices are per 100g, so cost = price * grams / 100. \
         Check that the summed cost does not exceed {:.0}.\n\n\
         Reply with valid JSON only:\n\
         {{\n\
             \"breakfast\": [{{\"name\": \"meal name\", \"method\": \"cooking method\", \"grams\": 100}}],\n\
             \"lunch\": [...],\n\
             \"dinner\": [...],\n\
             \"explanation\": \"how the menu fits the goal and the budget\"\n\
         }}",
        profile_block(profile, daily_calories, targets),
        budget,
        catalog,
        budget,
        daily_calories,
        goal_guidance(profile),
        budget,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::calculator;
    use crate::nutrition::types::{ActivityLevel, Goal, Sex};

    fn profile() -> UserProfile {
        UserProfile {
            name: "Luan".to_string(),
            age: 30,
            sex: Sex::Male,
            height_cm: 175.0,
            weight_kg: 70.0,
            activity: ActivityLevel::Moderate,
            goal: Goal::Maintain,
        }
    }

    #[test]
    fn recommendation_prompt_is_deterministic() {
        let p = profile();
        let kcal = calculator::daily_calories(&p).unwrap();
        let targets = calculator::macro_targets(&p, kcal);
        let lines = vec![MealLine {
            name: "Oats".to_string(),
            method: Some("boiled".to_string()),
            grams: 100.0,
        }];
        let current = NutritionTotals {
            calories: 307.0,
            protein: 10.7,
            carbs: 54.1,
            fat: 5.6,
            fiber: 8.2,
            cost: 10000.0,
        };
        let a = recommendation_prompt(&p, kcal, &targets, &lines, &current);
        let b = recommendation_prompt(&p, kcal, &targets, &lines, &current);
        assert_eq!(a, b);
        assert!(a.contains("Oats (boiled, 100g)"));
        assert!(a.contains("adjusted_grams"));
    }

    #[test]
    fn menu_prompt_embeds_budget_and_catalog() {
        let p = profile();
        let kcal = calculator::daily_calories(&p).unwrap();
        let targets = calculator::macro_targets(&p, kcal);
        let prompt = menu_prompt(&p, kcal, &targets, 100000.0);
        assert!(prompt.contains("Daily budget: 100000"));
        assert!(prompt.contains("Chicken breast"));
        assert_eq!(prompt, menu_prompt(&p, kcal, &targets, 100000.0));
    }
}
