use crate::errors::NutritionError;
use crate::nutrition::NutritionData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Supplement,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
        MealType::Supplement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Supplement => "supplement",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = NutritionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        MealType::ALL
            .into_iter()
            .find(|meal| meal.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| NutritionError::UnsupportedMealType(value.to_string()))
    }
}

/// A catalog food with its nutrition per 100 g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub nutrition_per_100g: NutritionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServingSize {
    pub amount: f64,
    pub unit: String,
    pub grams: f64,
}

impl ServingSize {
    pub fn grams(grams: f64) -> Self {
        Self {
            amount: grams,
            unit: "g".to_string(),
            grams,
        }
    }
}

/// One logged meal or snack. `nutrition` is already scaled to `serving_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: String,
    pub food: FoodItem,
    #[serde(default)]
    pub nutrition: NutritionData,
    pub serving_size: ServingSize,
    pub meal_type: MealType,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
}

impl FoodEntry {
    pub fn new(
        user_id: impl Into<String>,
        food: FoodItem,
        serving_size: ServingSize,
        meal_type: MealType,
        date: DateTime<Utc>,
    ) -> Self {
        let nutrition = portion_nutrition(&food, &serving_size);
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            food,
            nutrition,
            serving_size,
            meal_type,
            date,
            notes: None,
            image_uri: None,
        }
    }
}

fn portion_nutrition(food: &FoodItem, serving: &ServingSize) -> NutritionData {
    food.nutrition_per_100g.scaled(serving.grams / 100.0)
}

/// Partial update for an existing entry. A new food or serving size rescales the snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryPatch {
    pub food: Option<FoodItem>,
    pub serving_size: Option<ServingSize>,
    pub meal_type: Option<MealType>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub image_uri: Option<String>,
}

impl EntryPatch {
    pub fn apply(self, entry: &mut FoodEntry) {
        let rescale = self.food.is_some() || self.serving_size.is_some();
        if let Some(food) = self.food {
            entry.food = food;
        }
        if let Some(serving_size) = self.serving_size {
            entry.serving_size = serving_size;
        }
        if rescale {
            entry.nutrition = portion_nutrition(&entry.food, &entry.serving_size);
        }
        if let Some(meal_type) = self.meal_type {
            entry.meal_type = meal_type;
        }
        if let Some(date) = self.date {
            entry.date = date;
        }
        if self.notes.is_some() {
            entry.notes = self.notes;
        }
        if self.image_uri.is_some() {
            entry.image_uri = self.image_uri;
        }
    }
}

/// Daily targets. Calories never drop below the goal calculator's floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub sodium: f64,
}

impl Default for NutritionGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 250.0,
            fat: 65.0,
            fiber: 25.0,
            sugar: 50.0,
            sodium: 2300.0,
        }
    }
}

/// Everything the service persists between restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NutritionLog {
    pub entries: Vec<FoodEntry>,
    pub goals: NutritionGoals,
    /// Glasses of water per local calendar day, keyed `YYYY-MM-DD`.
    pub water: BTreeMap<String, u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntryRequest {
    pub food: FoodItem,
    pub serving_size: ServingSize,
    pub meal_type: MealType,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub window: Option<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WaterRequest {
    pub action: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WaterResponse {
    pub date: String,
    pub glasses: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub image_uri: String,
}
