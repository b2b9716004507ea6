use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::error::AppError;
use crate::nutrition::calculator;
use crate::nutrition::catalog;
use crate::nutrition::types::{Meal, Menu, Recommendation, SelectedMeal, UserProfile};
use crate::planner::Planner;
use crate::providers::traits::CompletionProvider;

#[derive(Clone)]
pub struct AppState {
    planner: Arc<Planner>,
}

#[derive(Deserialize)]
pub struct RecommendRequest {
    user: UserProfile,
    meals: Vec<SelectedMeal>,
}

/// A full day of selections. The three slots are flattened into one
/// portion-adjustment request; empty slots are fine as long as the day
/// holds at least one meal.
#[derive(Deserialize)]
pub struct DailyRecommendRequest {
    user: UserProfile,
    #[serde(default)]
    breakfast: Vec<SelectedMeal>,
    #[serde(default)]
    lunch: Vec<SelectedMeal>,
    #[serde(default)]
    dinner: Vec<SelectedMeal>,
}

#[derive(Deserialize)]
pub struct BudgetRequest {
    user: UserProfile,
    budget: f64,
}

#[derive(Serialize)]
pub struct CalculateResponse {
    daily_calories: f64,
    protein_target: f64,
    carb_target: f64,
    fat_target: f64,
    fiber_target: f64,
    user: UserProfile,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct MealsResponse {
    meals: Vec<Meal>,
}

type ApiResult<T> = Result<Json<T>, AppError>;

/// Create and configure the API router.
pub fn create_api(provider: Arc<dyn CompletionProvider>) -> Router {
    let state = AppState {
        planner: Arc::new(Planner::new(provider)),
    };

    // Front ends run on their own dev servers, so CORS stays permissive.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_check))
        .route("/meals", get(meals_handler))
        .route("/meals/categories", get(categories_handler))
        .route("/user/calculate", post(calculate_handler))
        .route("/meals/recommend", post(recommend_handler))
        .route("/daily/recommend", post(daily_recommend_handler))
        .route("/budget/optimize", post(budget_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

async fn meals_handler() -> Json<MealsResponse> {
    Json(MealsResponse {
        meals: catalog::MEALS.clone(),
    })
}

async fn categories_handler() -> Json<serde_json::Value> {
    let categories: serde_json::Map<String, serde_json::Value> = catalog::by_category()
        .into_iter()
        .map(|(key, meals)| {
            (
                key,
                serde_json::json!({ "meals": meals.into_iter().cloned().collect::<Vec<_>>() }),
            )
        })
        .collect();
    Json(serde_json::json!({ "categories": categories }))
}

async fn calculate_handler(Json(user): Json<UserProfile>) -> ApiResult<CalculateResponse> {
    let daily_calories = calculator::daily_calories(&user)?;
    let targets = calculator::macro_targets(&user, daily_calories);

    Ok(Json(CalculateResponse {
        daily_calories,
        protein_target: targets.protein_g,
        carb_target: targets.carbs_g,
        fat_target: targets.fat_g,
        fiber_target: targets.fiber_g,
        user,
    }))
}

async fn recommend_handler(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> ApiResult<Recommendation> {
    info!(user = %request.user.name, meals = request.meals.len(), "recommendation requested");
    let recommendation = state
        .planner
        .recommend(&request.user, &request.meals)
        .await?;
    Ok(Json(recommendation))
}

async fn daily_recommend_handler(
    State(state): State<AppState>,
    Json(request): Json<DailyRecommendRequest>,
) -> ApiResult<Recommendation> {
    let meals: Vec<SelectedMeal> = request
        .breakfast
        .into_iter()
        .chain(request.lunch)
        .chain(request.dinner)
        .collect();
    info!(user = %request.user.name, meals = meals.len(), "daily plan recommendation requested");
    let recommendation = state.planner.recommend(&request.user, &meals).await?;
    Ok(Json(recommendation))
}

async fn budget_handler(
    State(state): State<AppState>,
    Json(request): Json<BudgetRequest>,
) -> ApiResult<Menu> {
    info!(user = %request.user.name, budget = request.budget, "budget menu requested");
    let menu = state
        .planner
        .optimize_menu(&request.user, request.budget)
        .await?;
    Ok(Json(menu))
}
