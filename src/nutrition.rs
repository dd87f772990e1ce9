use serde::{Deserialize, Deserializer, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Per-nutrient amounts. Calories are kcal; sodium, cholesterol, potassium,
/// calcium, iron and the vitamins are mg; everything else is grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NutritionData {
    #[serde(deserialize_with = "nutrient")]
    pub calories: f64,
    #[serde(deserialize_with = "nutrient")]
    pub protein: f64,
    #[serde(deserialize_with = "nutrient")]
    pub carbs: f64,
    #[serde(deserialize_with = "nutrient")]
    pub fat: f64,
    #[serde(deserialize_with = "nutrient")]
    pub fiber: f64,
    #[serde(deserialize_with = "nutrient")]
    pub sugar: f64,
    #[serde(deserialize_with = "nutrient")]
    pub sodium: f64,
    #[serde(deserialize_with = "nutrient")]
    pub cholesterol: f64,
    #[serde(deserialize_with = "nutrient")]
    pub saturated_fat: f64,
    #[serde(deserialize_with = "nutrient")]
    pub trans_fat: f64,
    #[serde(deserialize_with = "nutrient")]
    pub potassium: f64,
    #[serde(deserialize_with = "nutrient")]
    pub calcium: f64,
    #[serde(deserialize_with = "nutrient")]
    pub iron: f64,
    #[serde(deserialize_with = "nutrient")]
    pub vitamin_a: f64,
    #[serde(deserialize_with = "nutrient")]
    pub vitamin_c: f64,
}

impl NutritionData {
    /// Multiplies every field by `factor`. A negative or non-finite factor yields zeros.
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = sanitize(factor);
        self.map(|value| value * factor)
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            calories: f(self.calories),
            protein: f(self.protein),
            carbs: f(self.carbs),
            fat: f(self.fat),
            fiber: f(self.fiber),
            sugar: f(self.sugar),
            sodium: f(self.sodium),
            cholesterol: f(self.cholesterol),
            saturated_fat: f(self.saturated_fat),
            trans_fat: f(self.trans_fat),
            potassium: f(self.potassium),
            calcium: f(self.calcium),
            iron: f(self.iron),
            vitamin_a: f(self.vitamin_a),
            vitamin_c: f(self.vitamin_c),
        }
    }
}

impl Add for NutritionData {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for NutritionData {
    fn add_assign(&mut self, rhs: Self) {
        self.calories += rhs.calories;
        self.protein += rhs.protein;
        self.carbs += rhs.carbs;
        self.fat += rhs.fat;
        self.fiber += rhs.fiber;
        self.sugar += rhs.sugar;
        self.sodium += rhs.sodium;
        self.cholesterol += rhs.cholesterol;
        self.saturated_fat += rhs.saturated_fat;
        self.trans_fat += rhs.trans_fat;
        self.potassium += rhs.potassium;
        self.calcium += rhs.calcium;
        self.iron += rhs.iron;
        self.vitamin_a += rhs.vitamin_a;
        self.vitamin_c += rhs.vitamin_c;
    }
}

impl Sum for NutritionData {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a NutritionData> for NutritionData {
    fn sum<I: Iterator<Item = &'a NutritionData>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Sums the nutrition snapshots of `entries` field by field. No rounding happens here.
pub fn accumulate<'a, I>(entries: I) -> NutritionData
where
    I: IntoIterator<Item = &'a crate::models::FoodEntry>,
{
    entries.into_iter().map(|entry| &entry.nutrition).sum()
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// Missing, null, negative and non-finite values all collapse to 0.
fn nutrient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(sanitize).unwrap_or_default())
}
