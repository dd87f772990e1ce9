use crate::clock::{Clock, SystemClock};
use crate::errors::NutritionError;
use crate::filters::{month_start, select_entries, week_start, MealFilter, ReportWindow};
use crate::goals::{compute_goals, GoalConfig, UserProfile};
use crate::models::{
    EntryPatch, FoodEntry, NewEntryRequest, NutritionGoals, NutritionLog, WaterResponse,
};
use crate::stats::{build_history, compute_daily_stats, DailyStats, HistoryResponse};
use chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterAction {
    Add,
    Sub,
}

impl FromStr for WaterAction {
    type Err = NutritionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "add" => Ok(Self::Add),
            "sub" => Ok(Self::Sub),
            other => Err(NutritionError::UnsupportedAction(other.to_string())),
        }
    }
}

/// Session state: the entry collection, goals and water log for one user.
///
/// Every mutation recomputes today's stats from the full collection.
pub struct FoodStore<C: Clock = SystemClock> {
    log: NutritionLog,
    user_id: String,
    clock: C,
    today: Option<DailyStats>,
    computed_for: NaiveDate,
}

impl<C: Clock> FoodStore<C> {
    /// Wraps a loaded log. Stored goals go through the same calorie floor as edits.
    pub fn new(mut log: NutritionLog, user_id: impl Into<String>, clock: C) -> Self {
        let floored = floor_goals(log.goals);
        if floored != log.goals {
            warn!(
                stored = log.goals.calories,
                floor = floored.calories,
                "stored calorie goal below floor"
            );
            log.goals = floored;
        }
        let computed_for = clock.now().date_naive();
        let mut store = Self {
            log,
            user_id: user_id.into(),
            clock,
            today: None,
            computed_for,
        };
        store.recompute();
        store
    }

    pub fn log(&self) -> &NutritionLog {
        &self.log
    }

    pub fn entries(&self) -> &[FoodEntry] {
        &self.log.entries
    }

    pub fn goals(&self) -> &NutritionGoals {
        &self.log.goals
    }

    pub fn now(&self) -> DateTime<C::Tz> {
        self.clock.now()
    }

    /// Builds an entry from a confirmed meal, stamped with the session user.
    pub fn create_entry(&mut self, request: NewEntryRequest) -> FoodEntry {
        let date = request
            .date
            .unwrap_or_else(|| self.clock.now().with_timezone(&Utc));
        let mut entry = FoodEntry::new(
            self.user_id.clone(),
            request.food,
            request.serving_size,
            request.meal_type,
            date,
        );
        entry.notes = request.notes;
        entry.image_uri = request.image_uri;
        self.add_entry(entry.clone());
        entry
    }

    pub fn add_entry(&mut self, entry: FoodEntry) {
        info!(id = %entry.id, meal = %entry.meal_type, "entry added");
        self.log.entries.push(entry);
        self.recompute();
    }

    pub fn update_entry(
        &mut self,
        id: Uuid,
        patch: EntryPatch,
    ) -> Result<FoodEntry, NutritionError> {
        let entry = self
            .log
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(NutritionError::EntryNotFound(id))?;
        patch.apply(entry);
        let updated = entry.clone();
        info!(%id, "entry updated");
        self.recompute();
        Ok(updated)
    }

    pub fn delete_entry(&mut self, id: Uuid) -> Result<FoodEntry, NutritionError> {
        let index = self
            .log
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(NutritionError::EntryNotFound(id))?;
        let removed = self.log.entries.remove(index);
        info!(%id, "entry deleted");
        self.recompute();
        Ok(removed)
    }

    /// Replaces the goals, lifting calories to the safety floor if needed.
    pub fn set_goals(&mut self, goals: NutritionGoals) -> NutritionGoals {
        let goals = floor_goals(goals);
        self.log.goals = goals;
        info!(calories = goals.calories, "goals updated");
        self.recompute();
        goals
    }

    pub fn apply_profile(
        &mut self,
        profile: &UserProfile,
    ) -> Result<NutritionGoals, NutritionError> {
        profile.validate()?;
        Ok(self.set_goals(compute_goals(profile)))
    }

    /// Today's stats, refreshed first if the local day rolled over.
    pub fn today_stats(&mut self) -> Option<&DailyStats> {
        if self.clock.now().date_naive() != self.computed_for {
            self.recompute();
        }
        self.today.as_ref()
    }

    /// Stats for `window`, with the water glasses logged on the window's days
    /// (today only for the daily window) merged in.
    pub fn stats(&self, window: ReportWindow, meal: MealFilter) -> Option<DailyStats> {
        let now = self.clock.now();
        let mut stats =
            compute_daily_stats(&self.log.entries, window, meal, &self.log.goals, &now)?;
        stats.water_intake = self.water_in(window, now.date_naive());
        Some(stats)
    }

    pub fn entries_in(&self, window: ReportWindow, meal: MealFilter) -> Vec<&FoodEntry> {
        select_entries(&self.log.entries, window, meal, &self.clock.now())
    }

    pub fn history(&self) -> HistoryResponse {
        build_history(&self.log.entries, &self.clock.now())
    }

    pub fn water_today(&self) -> WaterResponse {
        let date = self.clock.now().date_naive().to_string();
        let glasses = self.log.water.get(&date).copied().unwrap_or_default();
        WaterResponse { date, glasses }
    }

    pub fn apply_water(&mut self, action: WaterAction) -> WaterResponse {
        let date = self.clock.now().date_naive().to_string();
        let glasses = {
            let count = self.log.water.entry(date.clone()).or_default();
            *count = match action {
                WaterAction::Add => count.saturating_add(1),
                WaterAction::Sub => count.saturating_sub(1),
            };
            *count
        };
        if let Some(today) = self.today.as_mut() {
            today.water_intake = glasses;
        }
        WaterResponse { date, glasses }
    }

    fn water_in(&self, window: ReportWindow, today: NaiveDate) -> u32 {
        let first = match window {
            ReportWindow::Daily => today,
            ReportWindow::Weekly => week_start(today),
            ReportWindow::Monthly => month_start(today),
        };
        // YYYY-MM-DD keys sort chronologically.
        self.log
            .water
            .range(first.to_string()..=today.to_string())
            .map(|(_, glasses)| *glasses)
            .fold(0u32, u32::saturating_add)
    }

    fn recompute(&mut self) {
        self.computed_for = self.clock.now().date_naive();
        self.today = self.stats(ReportWindow::Daily, MealFilter::All);
        debug!(
            day = %self.computed_for,
            meals = self.today.as_ref().map_or(0, |stats| stats.meals.len()),
            "daily stats recomputed"
        );
    }
}

fn floor_goals(mut goals: NutritionGoals) -> NutritionGoals {
    let floor = GoalConfig::default().calorie_floor;
    if !goals.calories.is_finite() || goals.calories < floor {
        goals.calories = floor;
    }
    goals
}
