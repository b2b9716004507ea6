use validator::Validate;

use crate::error::AppError;
use crate::nutrition::types::{Goal, MacroTargets, Sex, UserProfile};

/// Basal Metabolic Rate via the Mifflin-St Jeor equation.
pub fn bmr(profile: &UserProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * profile.age as f64;
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Total Daily Energy Expenditure: BMR scaled by the activity multiplier.
pub fn tdee(profile: &UserProfile) -> f64 {
    bmr(profile) * profile.activity.multiplier()
}

/// Recommended daily calories: TDEE adjusted for the user's goal.
/// Fails with a validation error before any figure is computed when the
/// profile is out of bounds.
pub fn daily_calories(profile: &UserProfile) -> Result<f64, AppError> {
    profile
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tdee = tdee(profile);
    Ok(match profile.goal {
        Goal::Lose => tdee - 500.0,
        Goal::Gain => tdee + 500.0,
        Goal::Maintain => tdee,
    })
}

/// Macro targets in grams for the given calorie budget. Ratios shift with
/// the goal: more protein when cutting, more carbs when bulking.
pub fn macro_targets(profile: &UserProfile, daily_calories: f64) -> MacroTargets {
    let (protein_ratio, carb_ratio, fat_ratio) = match profile.goal {
        Goal::Lose => (0.35, 0.35, 0.30),
        Goal::Gain => (0.30, 0.45, 0.25),
        Goal::Maintain => (0.30, 0.40, 0.30),
    };

    MacroTargets {
        // 4 kcal per gram of protein and carbs, 9 per gram of fat
        protein_g: (daily_calories * protein_ratio) / 4.0,
        carbs_g: (daily_calories * carb_ratio) / 4.0,
        fat_g: (daily_calories * fat_ratio) / 9.0,
        fiber_g: fiber_target(profile),
    }
}

// 14g per 1000 kcal is the usual guideline; a flat age/sex split keeps the
// figure stable across goal adjustments.
fn fiber_target(profile: &UserProfile) -> f64 {
    match profile.sex {
        Sex::Male => {
            if profile.age > 50 {
                30.0
            } else {
                38.0
            }
        }
        Sex::Female => {
            if profile.age > 50 {
                21.0
            } else {
                25.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::types::ActivityLevel;

    fn profile(weight_kg: f64, activity: ActivityLevel, goal: Goal) -> UserProfile {
        UserProfile {
            name: "Luan".to_string(),
            age: 30,
            sex: Sex::Male,
            height_cm: 175.0,
            weight_kg,
            activity,
            goal,
        }
    }

    #[test]
    fn reference_profile_lands_near_2500_kcal() {
        let p = profile(70.0, ActivityLevel::Moderate, Goal::Maintain);
        let kcal = daily_calories(&p).unwrap();
        assert!(kcal > 2300.0 && kcal < 2700.0, "got {kcal}");
    }

    #[test]
    fn calories_increase_with_weight() {
        let light = profile(60.0, ActivityLevel::Moderate, Goal::Maintain);
        let heavy = profile(90.0, ActivityLevel::Moderate, Goal::Maintain);
        assert!(daily_calories(&heavy).unwrap() > daily_calories(&light).unwrap());
    }

    #[test]
    fn calories_increase_with_activity() {
        let levels = [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Active,
            ActivityLevel::VeryActive,
        ];
        let estimates: Vec<f64> = levels
            .iter()
            .map(|a| daily_calories(&profile(70.0, *a, Goal::Maintain)).unwrap())
            .collect();
        assert!(estimates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn goal_shifts_the_target_by_500() {
        let maintain = daily_calories(&profile(70.0, ActivityLevel::Moderate, Goal::Maintain)).unwrap();
        let lose = daily_calories(&profile(70.0, ActivityLevel::Moderate, Goal::Lose)).unwrap();
        let gain = daily_calories(&profile(70.0, ActivityLevel::Moderate, Goal::Gain)).unwrap();
        assert_eq!(lose, maintain - 500.0);
        assert_eq!(gain, maintain + 500.0);
    }

    #[test]
    fn female_bmr_is_lower_than_male() {
        let male = profile(70.0, ActivityLevel::Moderate, Goal::Maintain);
        let female = UserProfile {
            sex: Sex::Female,
            ..male.clone()
        };
        assert!(bmr(&female) < bmr(&male));
    }

    #[test]
    fn out_of_range_profile_is_rejected() {
        let mut p = profile(70.0, ActivityLevel::Moderate, Goal::Maintain);
        p.weight_kg = -10.0;
        assert!(matches!(daily_calories(&p), Err(AppError::Validation(_))));

        let mut p = profile(70.0, ActivityLevel::Moderate, Goal::Maintain);
        p.age = 0;
        assert!(matches!(daily_calories(&p), Err(AppError::Validation(_))));
    }

    #[test]
    fn macro_targets_account_for_all_calories() {
        let p = profile(70.0, ActivityLevel::Moderate, Goal::Maintain);
        let kcal = daily_calories(&p).unwrap();
        let macros = macro_targets(&p, kcal);
        let total = macros.protein_g * 4.0 + macros.carbs_g * 4.0 + macros.fat_g * 9.0;
        assert!((total - kcal).abs() < 1.0);
    }
}
