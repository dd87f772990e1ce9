use crate::models::NutritionGoals;
use crate::nutrition::NutritionData;
use serde::{Deserialize, Serialize};

const UNDER_RATIO: f64 = 0.9;
const OVER_RATIO: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStatus {
    Under,
    OnTrack,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressData {
    pub current: f64,
    pub goal: f64,
    pub percentage: u32,
    pub status: ProgressStatus,
}

/// Progress for the nutrients the daily view classifies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub calories: ProgressData,
    pub protein: ProgressData,
    pub carbs: ProgressData,
    pub fat: ProgressData,
    pub fiber: ProgressData,
}

/// Compares one summed value with its goal.
///
/// Values inside `[0.9 * goal, 1.1 * goal]` are on track, both ends included.
/// A goal that is zero, negative or not finite reports 0 percent.
pub fn classify(current: f64, goal: f64) -> ProgressData {
    let percentage = if goal.is_finite() && goal > 0.0 {
        (current / goal * 100.0).round() as u32
    } else {
        0
    };

    let status = if current < goal * UNDER_RATIO {
        ProgressStatus::Under
    } else if current > goal * OVER_RATIO {
        ProgressStatus::Over
    } else {
        ProgressStatus::OnTrack
    };

    ProgressData {
        current,
        goal,
        percentage,
        status,
    }
}

pub fn daily_progress(totals: &NutritionData, goals: &NutritionGoals) -> DailyProgress {
    DailyProgress {
        calories: classify(totals.calories, goals.calories),
        protein: classify(totals.protein, goals.protein),
        carbs: classify(totals.carbs, goals.carbs),
        fat: classify(totals.fat, goals.fat),
        fiber: classify(totals.fiber, goals.fiber),
    }
}
