use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use validator::Validate;

use crate::error::AppError;
use crate::nutrition::calculator;
use crate::nutrition::catalog;
use crate::nutrition::types::{
    Menu, MenuItem, NutritionTotals, Recommendation, SelectedMeal, UserProfile,
};
use crate::planner::prompt::{self, MealLine};
use crate::providers::traits::CompletionProvider;

const GRAM_STEP: f64 = 25.0;

/// Per-100g figures for one selected meal after catalog resolution.
struct Per100 {
    method: Option<String>,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
    price: f64,
}

/// Snaps a gram amount to the 25g grid, never below one step.
fn round_grams(grams: f64) -> f64 {
    let rounded = (grams / GRAM_STEP).round() * GRAM_STEP;
    rounded.max(GRAM_STEP)
}

fn resolve(selected: &SelectedMeal) -> Result<Per100, AppError> {
    let meal = catalog::find_meal(&selected.name)?;
    match &selected.cooking_method {
        Some(method) => {
            let m = catalog::find_method(meal, method).ok_or_else(|| {
                AppError::Validation(format!(
                    "Meal '{}' has no cooking method '{}'",
                    meal.name, method
                ))
            })?;
            Ok(Per100 {
                method: Some(m.method.clone()),
                calories: m.calories,
                protein: m.protein,
                carbs: m.carbs,
                fat: m.fat,
                fiber: m.fiber,
                price: m.price,
            })
        }
        None => Ok(Per100 {
            method: None,
            calories: meal.calories,
            protein: meal.protein,
            carbs: meal.carbs,
            fat: meal.fat,
            fiber: meal.fiber,
            price: meal.price,
        }),
    }
}

fn totals(figures: &[Per100], grams: &[f64]) -> NutritionTotals {
    let mut t = NutritionTotals {
        calories: 0.0,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
        fiber: 0.0,
        cost: 0.0,
    };
    for (f, g) in figures.iter().zip(grams) {
        let scale = g / 100.0;
        t.calories += f.calories * scale;
        t.protein += f.protein * scale;
        t.carbs += f.carbs * scale;
        t.fat += f.fat * scale;
        t.fiber += f.fiber * scale;
        t.cost += f.price * scale;
    }
    t
}

/// Extracts adjusted gram amounts and the explanation from the model's
/// JSON answer. Anything off-shape becomes a tagged parse failure carrying
/// the raw text.
fn parse_recommendation(raw: &str, expected: usize) -> Result<(Vec<f64>, String), AppError> {
    let value: Value = serde_json::from_str(raw).map_err(|_| AppError::Parse {
        raw: raw.to_string(),
    })?;

    // Older model revisions answered with "adjusted_quantities".
    let grams = value
        .get("adjusted_grams")
        .or_else(|| value.get("adjusted_quantities"))
        .and_then(|g| g.as_array())
        .ok_or_else(|| AppError::Parse {
            raw: raw.to_string(),
        })?;

    if grams.len() != expected {
        return Err(AppError::Parse {
            raw: raw.to_string(),
        });
    }

    let mut adjusted = Vec::with_capacity(expected);
    for g in grams {
        let g = g.as_f64().ok_or_else(|| AppError::Parse {
            raw: raw.to_string(),
        })?;
        adjusted.push(round_grams(g));
    }

    let explanation = value
        .get("explanation")
        .and_then(|e| e.as_str())
        .unwrap_or("AI recommendation generated")
        .to_string();

    Ok((adjusted, explanation))
}

fn parse_menu_section(section: Option<&Value>, raw: &str) -> Result<Vec<MenuItem>, AppError> {
    // A missing section is an empty meal slot; a present section that is
    // not an array is a mis-shaped answer.
    let Some(section) = section else {
        return Ok(Vec::new());
    };
    let items = section.as_array().ok_or_else(|| AppError::Parse {
        raw: raw.to_string(),
    })?;

    let mut resolved = Vec::with_capacity(items.len());
    for item in items {
        let name = item
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| AppError::Parse {
                raw: raw.to_string(),
            })?;
        let grams = round_grams(item.get("grams").and_then(|g| g.as_f64()).unwrap_or(100.0));
        let method = item.get("method").and_then(|m| m.as_str());

        // A menu that references food we cannot price is not a usable
        // answer, so a hallucinated name fails the whole parse.
        let meal = catalog::find_meal(name).map_err(|_| AppError::Parse {
            raw: raw.to_string(),
        })?;

        let figures = method.and_then(|m| catalog::find_method(meal, m));
        let (calories, protein, carbs, fat, fiber, price) = match figures {
            Some(m) => (m.calories, m.protein, m.carbs, m.fat, m.fiber, m.price),
            None => (
                meal.calories,
                meal.protein,
                meal.carbs,
                meal.fat,
                meal.fiber,
                meal.price,
            ),
        };

        let scale = grams / 100.0;
        resolved.push(MenuItem {
            name: meal.name.clone(),
            method: figures.map(|m| m.method.clone()),
            grams,
            calories: calories * scale,
            protein: protein * scale,
            carbs: carbs * scale,
            fat: fat * scale,
            fiber: fiber * scale,
            price: price * scale,
        });
    }
    Ok(resolved)
}

/// Parses the budget-menu answer and reprices every item from catalog data.
/// Model-supplied nutrition figures are never trusted.
fn parse_menu(raw: &str) -> Result<Menu, AppError> {
    let value: Value = serde_json::from_str(raw).map_err(|_| AppError::Parse {
        raw: raw.to_string(),
    })?;

    let breakfast = parse_menu_section(value.get("breakfast"), raw)?;
    let lunch = parse_menu_section(value.get("lunch"), raw)?;
    let dinner = parse_menu_section(value.get("dinner"), raw)?;

    if breakfast.is_empty() && lunch.is_empty() && dinner.is_empty() {
        return Err(AppError::Parse {
            raw: raw.to_string(),
        });
    }

    let explanation = value
        .get("explanation")
        .and_then(|e| e.as_str())
        .unwrap_or("AI-generated optimized menu")
        .to_string();

    let menu = Menu {
        total_cost: breakfast.iter().chain(&lunch).chain(&dinner).map(|i| i.price).sum(),
        total_calories: breakfast
            .iter()
            .chain(&lunch)
            .chain(&dinner)
            .map(|i| i.calories)
            .sum(),
        breakfast,
        lunch,
        dinner,
        explanation,
    };
    Ok(menu)
}

/// Request pipeline from user inputs to a structured plan: calorie math,
/// prompt construction, one provider call, and a best-effort parse.
pub struct Planner {
    provider: Arc<dyn CompletionProvider>,
}

impl Planner {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Portion adjustment for an explicit meal selection.
    pub async fn recommend(
        &self,
        profile: &UserProfile,
        selection: &[SelectedMeal],
    ) -> Result<Recommendation, AppError> {
        if selection.is_empty() {
            return Err(AppError::Validation("No meals selected".to_string()));
        }
        for meal in selection {
            meal.validate()
                .map_err(|e| AppError::Validation(e.to_string()))?;
        }

        let daily_calories = calculator::daily_calories(profile)?;
        let targets = calculator::macro_targets(profile, daily_calories);

        let figures: Vec<Per100> = selection
            .iter()
            .map(resolve)
            .collect::<Result<_, _>>()?;
        let current_grams: Vec<f64> = selection.iter().map(|m| m.grams).collect();
        let current = totals(&figures, &current_grams);

        let lines: Vec<MealLine> = selection
            .iter()
            .zip(&figures)
            .map(|(m, f)| MealLine {
                name: m.name.clone(),
                method: f.method.clone(),
                grams: m.grams,
            })
            .collect();

        let prompt =
            prompt::recommendation_prompt(profile, daily_calories, &targets, &lines, &current);
        debug!(meals = selection.len(), "requesting portion adjustment");

        let raw = self
            .provider
            .complete(&prompt)
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let (adjusted_grams, explanation) = parse_recommendation(&raw, selection.len())?;
        let recalculated = totals(&figures, &adjusted_grams);
        info!(
            calories = recalculated.calories,
            target = daily_calories,
            "portion adjustment complete"
        );

        Ok(Recommendation {
            meals: selection.to_vec(),
            adjusted_grams,
            totals: recalculated,
            explanation,
        })
    }

    /// Full-day menu optimized for a daily budget.
    pub async fn optimize_menu(
        &self,
        profile: &UserProfile,
        budget: f64,
    ) -> Result<Menu, AppError> {
        if budget <= 0.0 {
            return Err(AppError::Validation("Budget must be positive".to_string()));
        }

        let daily_calories = calculator::daily_calories(profile)?;
        let targets = calculator::macro_targets(profile, daily_calories);

        let prompt = prompt::menu_prompt(profile, daily_calories, &targets, budget);
        debug!(budget, "requesting budget menu");

        let raw = self
            .provider
            .complete(&prompt)
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let menu = parse_menu(&raw)?;
        info!(
            cost = menu.total_cost,
            budget, "budget menu complete"
        );
        Ok(menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::types::{ActivityLevel, Goal, Sex};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    struct FakeProvider {
        answer: Result<String, String>,
    }

    impl FakeProvider {
        fn answering(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(answer.to_string()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Err(message.to_string()),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for FakeProvider {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.answer.clone().map_err(|e| anyhow!(e))
        }

        fn model_name(&self) -> String {
            "fake".to_string()
        }
    }

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

    fn selection() -> Vec<SelectedMeal> {
        vec![
            SelectedMeal {
                name: "Oats".to_string(),
                grams: 100.0,
                cooking_method: Some("boiled".to_string()),
            },
            SelectedMeal {
                name: "Chicken breast".to_string(),
                grams: 150.0,
                cooking_method: None,
            },
        ]
    }

    #[test]
    fn grams_snap_to_the_25g_grid() {
        assert_eq!(round_grams(0.0), 25.0);
        assert_eq!(round_grams(10.0), 25.0);
        assert_eq!(round_grams(112.0), 100.0);
        assert_eq!(round_grams(113.0), 125.0);
        assert_eq!(round_grams(400.0), 400.0);
    }

    #[test]
    fn recommendation_parse_rejects_non_json() {
        let err = parse_recommendation("I think you should eat more", 2).unwrap_err();
        assert!(matches!(err, AppError::Parse { raw } if raw.contains("eat more")));
    }

    #[test]
    fn recommendation_parse_rejects_wrong_length() {
        let raw = r#"{"adjusted_grams": [100, 200, 300], "explanation": "x"}"#;
        assert!(matches!(
            parse_recommendation(raw, 2),
            Err(AppError::Parse { .. })
        ));
    }

    #[test]
    fn recommendation_parse_accepts_legacy_key() {
        let raw = r#"{"adjusted_quantities": [110, 210], "explanation": "x"}"#;
        let (grams, _) = parse_recommendation(raw, 2).unwrap();
        assert_eq!(grams, vec![100.0, 200.0]);
    }

    #[test]
    fn menu_parse_rejects_unknown_meals() {
        let raw = r#"{"breakfast": [{"name": "Unicorn steak", "grams": 100}], "lunch": [], "dinner": []}"#;
        assert!(matches!(parse_menu(raw), Err(AppError::Parse { .. })));
    }

    #[test]
    fn menu_parse_rejects_a_non_array_section() {
        let raw = r#"{
            "breakfast": {"name": "Oats", "grams": 100},
            "lunch": [{"name": "Chicken breast", "grams": 200}],
            "dinner": []
        }"#;
        assert!(matches!(parse_menu(raw), Err(AppError::Parse { .. })));
    }

    #[test]
    fn menu_parse_reprices_from_catalog() {
        let raw = r#"{
            "breakfast": [{"name": "Oats", "method": "boiled", "grams": 100, "calories": 9999}],
            "lunch": [{"name": "Chicken breast", "method": "grilled", "grams": 200}],
            "dinner": [{"name": "Broccoli", "method": "steamed", "grams": 150}],
            "explanation": "balanced day"
        }"#;
        let menu = parse_menu(raw).unwrap();
        assert_eq!(menu.breakfast[0].calories, 307.0);
        assert_eq!(menu.lunch[0].price, 40000.0);
        assert_eq!(menu.dinner[0].grams, 150.0);
        assert!(menu.items().all(|i| i.price >= 0.0));
        assert!((menu.total_cost - (10000.0 + 40000.0 + 11250.0 * 1.5)).abs() < 1e-6);
    }

    #[tokio::test]
    async fn recommend_returns_recalculated_totals() {
        let provider =
            FakeProvider::answering(r#"{"adjusted_grams": [150, 200], "explanation": "more protein"}"#);
        let planner = Planner::new(provider);
        let rec = planner.recommend(&profile(), &selection()).await.unwrap();

        assert_eq!(rec.adjusted_grams, vec![150.0, 200.0]);
        // boiled oats 307 kcal/100g at 150g + chicken base 165 kcal/100g at 200g
        assert!((rec.totals.calories - (307.0 * 1.5 + 165.0 * 2.0)).abs() < 1e-6);
        assert_eq!(rec.explanation, "more protein");
    }

    #[tokio::test]
    async fn recommend_requires_a_selection() {
        let planner = Planner::new(FakeProvider::answering("{}"));
        let err = planner.recommend(&profile(), &[]).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn recommend_rejects_unknown_cooking_method() {
        let planner = Planner::new(FakeProvider::answering("{}"));
        let meals = vec![SelectedMeal {
            name: "Apple".to_string(),
            grams: 100.0,
            cooking_method: Some("flambeed".to_string()),
        }];
        let err = planner.recommend(&profile(), &meals).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn malformed_profile_never_reaches_the_provider() {
        let planner = Planner::new(FakeProvider::failing("should not be called"));
        let mut bad = profile();
        bad.height_cm = 0.0;
        let err = planner.recommend(&bad, &selection()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_network_error() {
        let planner = Planner::new(FakeProvider::failing("connection refused"));
        let err = planner.recommend(&profile(), &selection()).await.unwrap_err();
        assert!(matches!(err, AppError::Network(msg) if msg.contains("connection refused")));
    }

    #[tokio::test]
    async fn unparseable_menu_carries_the_raw_text() {
        let planner = Planner::new(FakeProvider::answering("sorry, I cannot help with that"));
        let err = planner.optimize_menu(&profile(), 100000.0).await.unwrap_err();
        assert!(matches!(err, AppError::Parse { raw } if raw.contains("sorry")));
    }

    #[tokio::test]
    async fn negative_budget_never_reaches_the_provider() {
        let planner = Planner::new(FakeProvider::failing("should not be called"));
        let err = planner.optimize_menu(&profile(), -5.0).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
