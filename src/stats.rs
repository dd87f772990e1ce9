use crate::filters::{local_day, select_entries, week_start, MealFilter, ReportWindow};
use crate::models::{FoodEntry, NutritionGoals};
use crate::nutrition::{accumulate, NutritionData};
use crate::progress::{daily_progress, DailyProgress};
use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: String,
    pub window: ReportWindow,
    pub nutrition: NutritionData,
    pub goals: NutritionGoals,
    pub progress: DailyProgress,
    pub meals: Vec<FoodEntry>,
    /// Filled in by the store; the composer always leaves it at 0.
    pub water_intake: u32,
}

/// Totals and goal progress for the entries in `window`.
///
/// Returns `None` when nothing was logged in the window, so "no meals" stays
/// distinguishable from "meals with zero nutrition".
pub fn compute_daily_stats<Tz: TimeZone>(
    entries: &[FoodEntry],
    window: ReportWindow,
    meal: MealFilter,
    goals: &NutritionGoals,
    now: &DateTime<Tz>,
) -> Option<DailyStats> {
    let selected = select_entries(entries, window, meal, now);
    if selected.is_empty() {
        return None;
    }

    let nutrition = accumulate(selected.iter().copied());
    Some(DailyStats {
        date: now.date_naive().to_string(),
        window,
        progress: daily_progress(&nutrition, goals),
        nutrition,
        goals: *goals,
        meals: selected.into_iter().cloned().collect(),
        water_intake: 0,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub days_counted: u8,
    pub avg_calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub last_7_days: Vec<DailyPoint>,
    pub weekly_totals: Vec<WeeklyPoint>,
}

#[derive(Debug, Clone, Copy, Default)]
struct DayTotals {
    nutrition: NutritionData,
    entries: usize,
}

/// Per-day series for the last 7 days and per-week totals for the last
/// 8 Sunday-start weeks, ending at the local day of `now`.
pub fn build_history<Tz: TimeZone>(
    entries: &[FoodEntry],
    now: &DateTime<Tz>,
) -> HistoryResponse {
    const WEEK_COUNT: usize = 8;

    let today = now.date_naive();
    let tz = now.timezone();
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
    for entry in entries {
        let day = days.entry(local_day(entry.date, &tz)).or_default();
        day.nutrition += entry.nutrition;
        day.entries += 1;
    }
    let totals_on = |date: NaiveDate| days.get(&date).copied().unwrap_or_default();

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let day = totals_on(date);
        last_7_days.push(DailyPoint {
            date: date.to_string(),
            calories: day.nutrition.calories,
            protein: day.nutrition.protein,
            carbs: day.nutrition.carbs,
            fat: day.nutrition.fat,
            entries: day.entries,
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_totals = Vec::with_capacity(WEEK_COUNT);
    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let week: NutritionData = (0..7)
            .map(|day_offset| totals_on(start + Duration::days(day_offset)).nutrition)
            .sum();

        let days_counted = if today < start {
            0
        } else if today > end {
            7
        } else {
            (today - start).num_days() as u8 + 1
        };
        let denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };

        weekly_totals.push(WeeklyPoint {
            week: week_label(start),
            start_date: start.to_string(),
            end_date: end.to_string(),
            calories: week.calories,
            protein: week.protein,
            carbs: week.carbs,
            fat: week.fat,
            days_counted,
            avg_calories: week.calories / denom,
        });
    }

    HistoryResponse {
        last_7_days,
        weekly_totals,
    }
}

fn week_label(start: NaiveDate) -> String {
    start.format("%Y-W%U").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodItem, MealType, ServingSize};
    use crate::progress::ProgressStatus;
    use chrono::{FixedOffset, Utc};
    use chrono_tz::America::New_York;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn meal(rfc3339: &str, calories: f64, protein: f64, meal_type: MealType) -> FoodEntry {
        let food = FoodItem {
            id: format!("food-{calories}"),
            name: "Plate".into(),
            brand: None,
            nutrition_per_100g: NutritionData {
                calories,
                protein,
                ..NutritionData::default()
            },
        };
        FoodEntry::new(
            "user",
            food,
            ServingSize::grams(100.0),
            meal_type,
            at(rfc3339).with_timezone(&Utc),
        )
    }

    #[test]
    fn empty_window_is_none() {
        let now = at("2026-01-07T12:00:00+00:00");
        let goals = NutritionGoals::default();
        for window in [ReportWindow::Daily, ReportWindow::Weekly, ReportWindow::Monthly] {
            assert!(compute_daily_stats(&[], window, MealFilter::All, &goals, &now).is_none());
        }
    }

    #[test]
    fn zero_nutrition_meals_still_produce_stats() {
        let now = at("2026-01-07T12:00:00+00:00");
        let entries = vec![meal("2026-01-07T09:00:00+00:00", 0.0, 0.0, MealType::Snack)];
        let stats = compute_daily_stats(
            &entries,
            ReportWindow::Daily,
            MealFilter::All,
            &NutritionGoals::default(),
            &now,
        )
        .expect("stats for a logged day");
        assert_eq!(stats.nutrition, NutritionData::default());
        assert_eq!(stats.progress.calories.status, ProgressStatus::Under);
    }

    #[test]
    fn daily_stats_sum_and_classify_todays_meals() {
        let now = at("2026-01-07T21:00:00+00:00");
        let entries = vec![
            meal("2026-01-07T08:00:00+00:00", 600.0, 40.0, MealType::Breakfast),
            meal("2026-01-07T13:00:00+00:00", 700.0, 50.0, MealType::Lunch),
            meal("2026-01-07T19:00:00+00:00", 500.0, 45.0, MealType::Dinner),
            meal("2026-01-06T19:00:00+00:00", 900.0, 10.0, MealType::Dinner),
        ];
        let goals = NutritionGoals::default();

        let stats =
            compute_daily_stats(&entries, ReportWindow::Daily, MealFilter::All, &goals, &now)
                .expect("stats for today");
        assert_eq!(stats.date, "2026-01-07");
        assert_eq!(stats.meals.len(), 3);
        assert_eq!(stats.nutrition.calories, 1800.0);
        assert_eq!(stats.progress.calories.percentage, 90);
        assert_eq!(stats.progress.calories.status, ProgressStatus::OnTrack);
        assert_eq!(stats.progress.protein.current, 135.0);
        assert_eq!(stats.progress.protein.status, ProgressStatus::OnTrack);
        assert_eq!(stats.water_intake, 0);

        let dinners = compute_daily_stats(
            &entries,
            ReportWindow::Weekly,
            MealFilter::Only(MealType::Dinner),
            &goals,
            &now,
        )
        .expect("dinners this week");
        assert_eq!(dinners.nutrition.calories, 1400.0);
        assert_eq!(dinners.progress.calories.status, ProgressStatus::Under);
    }

    #[test]
    fn history_groups_by_day_in_the_clock_zone() {
        let now = New_York.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap();
        // 03:30 UTC on March 8 is still March 7 in New York.
        let entries = vec![meal("2026-03-08T03:30:00+00:00", 450.0, 0.0, MealType::Dinner)];

        let history = build_history(&entries, &now);
        let day = |date: &str| {
            history
                .last_7_days
                .iter()
                .find(|point| point.date == date)
                .map(|point| point.calories)
        };
        assert_eq!(day("2026-03-07"), Some(450.0));
        assert_eq!(day("2026-03-08"), Some(0.0));
    }

    #[test]
    fn history_last_7_days_includes_each_day() {
        let now = at("2026-01-05T10:00:00+00:00");
        let entries = vec![
            meal("2026-01-03T12:00:00+00:00", 400.0, 20.0, MealType::Lunch),
            meal("2026-01-03T18:00:00+00:00", 300.0, 10.0, MealType::Dinner),
        ];

        let history = build_history(&entries, &now);
        assert_eq!(history.last_7_days.len(), 7);
        let point = history
            .last_7_days
            .iter()
            .find(|day| day.date == "2026-01-03")
            .expect("missing day");
        assert_eq!(point.calories, 700.0);
        assert_eq!(point.protein, 30.0);
        assert_eq!(point.entries, 2);
    }

    #[test]
    fn history_weekly_series_start_on_sunday() {
        let now = at("2026-01-06T10:00:00+00:00");
        let entries = vec![meal("2026-01-04T12:00:00+00:00", 1400.0, 0.0, MealType::Lunch)];

        let history = build_history(&entries, &now);
        assert_eq!(history.weekly_totals.len(), 8);
        let current = history.weekly_totals.last().expect("current week");
        assert_eq!(current.start_date, "2026-01-04");
        assert_eq!(current.end_date, "2026-01-10");
        assert_eq!(current.days_counted, 3);
        assert_eq!(current.calories, 1400.0);
        assert!((current.avg_calories - 466.666).abs() < 0.01);
    }
}
