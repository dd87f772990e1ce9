//! Onboarding goal calculator.
//!
//! BMR uses the Mifflin-St Jeor equation (Mifflin et al., 1990):
//! `10 x weight_kg + 6.25 x height_cm - 5 x age + s`, with `s = +5` for men
//! and `-161` otherwise. TDEE multiplies BMR by an activity factor. The
//! calorie target applies a goal modifier and a flat weekly-rate adjustment,
//! and is floored so the result is never an unsafe intake.

use crate::errors::NutritionError;
use crate::models::NutritionGoals;
use serde::{Deserialize, Serialize};

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// 1-3 days/week
    Light,
    /// 3-5 days/week
    Moderate,
    /// 6-7 days/week
    Active,
    /// Hard training or a physical job
    VeryActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    LoseWeight,
    Maintain,
    GainWeight,
    GainMuscle,
}

/// How fast the user wants weight to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyRate {
    Slow,
    #[default]
    Moderate,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal_type: GoalType,
    #[serde(default)]
    pub weekly_rate: WeeklyRate,
}

impl UserProfile {
    /// Rejects measurements the formulas cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`NutritionError::InvalidProfile`] for non-positive or non-finite
    /// weight or height, or an age outside 1..=120.
    pub fn validate(&self) -> Result<(), NutritionError> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(NutritionError::InvalidProfile(
                "weight must be a positive number of kilograms".into(),
            ));
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(NutritionError::InvalidProfile(
                "height must be a positive number of centimeters".into(),
            ));
        }
        if !(1..=120).contains(&self.age) {
            return Err(NutritionError::InvalidProfile(
                "age must be between 1 and 120".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityFactors {
    pub sedentary: f64,
    pub light: f64,
    pub moderate: f64,
    pub active: f64,
    pub very_active: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalModifiers {
    pub lose_weight: f64,
    pub maintain: f64,
    pub gain_weight: f64,
    pub gain_muscle: f64,
}

/// Daily kcal removed (losing) or added (gaining) per weekly rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateAdjustments {
    pub slow: f64,
    pub moderate: f64,
    pub fast: f64,
}

/// Share of calories per macronutrient; the three fields sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub activity: ActivityFactors,
    pub goal_modifiers: GoalModifiers,
    pub rate_adjustments: RateAdjustments,
    pub calorie_floor: f64,
    pub default_split: MacroSplit,
    pub gain_muscle_split: MacroSplit,
    pub lose_weight_split: MacroSplit,
    pub fiber_g_per_1000_kcal: f64,
    pub sugar_g_per_1000_kcal: f64,
    pub sodium_mg: f64,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            activity: ActivityFactors {
                sedentary: 1.2,
                light: 1.375,
                moderate: 1.55,
                active: 1.725,
                very_active: 1.9,
            },
            goal_modifiers: GoalModifiers {
                lose_weight: 1.0,
                maintain: 1.0,
                gain_weight: 1.0,
                gain_muscle: 1.0,
            },
            rate_adjustments: RateAdjustments {
                slow: 250.0,
                moderate: 500.0,
                fast: 750.0,
            },
            calorie_floor: 1200.0,
            default_split: MacroSplit {
                protein: 0.25,
                carbs: 0.45,
                fat: 0.30,
            },
            gain_muscle_split: MacroSplit {
                protein: 0.30,
                carbs: 0.40,
                fat: 0.30,
            },
            lose_weight_split: MacroSplit {
                protein: 0.30,
                carbs: 0.35,
                fat: 0.35,
            },
            fiber_g_per_1000_kcal: 14.0,
            sugar_g_per_1000_kcal: 25.0,
            sodium_mg: 2300.0,
        }
    }
}

/// Basal Metabolic Rate in kcal/day (Mifflin-St Jeor).
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female | Gender::Other => base - 161.0,
    }
}

/// Total Daily Energy Expenditure: BMR scaled by the activity factor.
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel, factors: &ActivityFactors) -> f64 {
    let factor = match activity_level {
        ActivityLevel::Sedentary => factors.sedentary,
        ActivityLevel::Light => factors.light,
        ActivityLevel::Moderate => factors.moderate,
        ActivityLevel::Active => factors.active,
        ActivityLevel::VeryActive => factors.very_active,
    };
    bmr * factor
}

/// Calorie target before rounding, never below `config.calorie_floor`.
pub fn target_calories(
    tdee: f64,
    goal_type: GoalType,
    rate: WeeklyRate,
    config: &GoalConfig,
) -> f64 {
    let modifiers = &config.goal_modifiers;
    let adjustment = match rate {
        WeeklyRate::Slow => config.rate_adjustments.slow,
        WeeklyRate::Moderate => config.rate_adjustments.moderate,
        WeeklyRate::Fast => config.rate_adjustments.fast,
    };

    let target = match goal_type {
        GoalType::LoseWeight => tdee * modifiers.lose_weight - adjustment,
        GoalType::Maintain => tdee * modifiers.maintain,
        GoalType::GainWeight => tdee * modifiers.gain_weight + adjustment,
        GoalType::GainMuscle => tdee * modifiers.gain_muscle + adjustment,
    };

    target.max(config.calorie_floor)
}

fn macro_split(goal_type: GoalType, config: &GoalConfig) -> MacroSplit {
    match goal_type {
        GoalType::GainMuscle => config.gain_muscle_split,
        GoalType::LoseWeight => config.lose_weight_split,
        GoalType::Maintain | GoalType::GainWeight => config.default_split,
    }
}

pub fn compute_goals(profile: &UserProfile) -> NutritionGoals {
    compute_goals_with(profile, &GoalConfig::default())
}

pub fn compute_goals_with(profile: &UserProfile, config: &GoalConfig) -> NutritionGoals {
    let bmr = calculate_bmr(profile.weight_kg, profile.height_cm, profile.age, profile.gender);
    let tdee = calculate_tdee(bmr, profile.activity_level, &config.activity);
    let calories = target_calories(tdee, profile.goal_type, profile.weekly_rate, config)
        .round()
        .max(config.calorie_floor);
    let split = macro_split(profile.goal_type, config);

    NutritionGoals {
        calories,
        protein: (calories * split.protein / KCAL_PER_G_PROTEIN).round(),
        carbs: (calories * split.carbs / KCAL_PER_G_CARBS).round(),
        fat: (calories * split.fat / KCAL_PER_G_FAT).round(),
        fiber: (calories / 1000.0 * config.fiber_g_per_1000_kcal).round(),
        sugar: (calories / 1000.0 * config.sugar_g_per_1000_kcal).round(),
        sodium: config.sodium_mg,
    }
}
