use crate::errors::NutritionError;
use crate::models::{FoodEntry, MealType};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Calendar reporting window, anchored at local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportWindow {
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for ReportWindow {
    type Err = NutritionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "today" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            _ => Err(NutritionError::UnsupportedWindow(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MealFilter {
    #[default]
    All,
    Only(MealType),
}

impl MealFilter {
    pub fn matches(self, meal_type: MealType) -> bool {
        match self {
            MealFilter::All => true,
            MealFilter::Only(wanted) => wanted == meal_type,
        }
    }
}

impl FromStr for MealFilter {
    type Err = NutritionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Calendar day of `instant` in `tz`.
pub fn local_day<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// First instant of the window containing `now`, resolved with the offset
/// in force on the window's first day.
pub fn window_start<Tz: TimeZone>(window: ReportWindow, now: &DateTime<Tz>) -> DateTime<Utc> {
    let today = now.date_naive();
    let first_day = match window {
        ReportWindow::Daily => today,
        ReportWindow::Weekly => week_start(today),
        ReportWindow::Monthly => month_start(today),
    };
    local_midnight(first_day, &now.timezone())
}

// Where a DST gap swallows midnight, the day starts when the gap ends.
fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=24 * 4)
        .map(|quarter| midnight + Duration::minutes(15 * quarter))
        .find_map(|local: NaiveDateTime| tz.from_local_datetime(&local).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

pub fn in_window<Tz: TimeZone>(
    entry: &FoodEntry,
    window: ReportWindow,
    now: &DateTime<Tz>,
) -> bool {
    match window {
        ReportWindow::Daily => local_day(entry.date, &now.timezone()) == now.date_naive(),
        ReportWindow::Weekly | ReportWindow::Monthly => entry.date >= window_start(window, now),
    }
}

/// Entries inside `window` that pass `meal`, newest first.
pub fn select_entries<'a, Tz: TimeZone>(
    entries: &'a [FoodEntry],
    window: ReportWindow,
    meal: MealFilter,
    now: &DateTime<Tz>,
) -> Vec<&'a FoodEntry> {
    let mut selected: Vec<&FoodEntry> = entries
        .iter()
        .filter(|entry| meal.matches(entry.meal_type) && in_window(entry, window, now))
        .collect();
    selected.sort_by(|a, b| b.date.cmp(&a.date));
    selected
}
