use crate::models::{FoodItem, ServingSize};
use crate::nutrition::NutritionData;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedFood {
    pub food: FoodItem,
    pub suggested_serving: ServingSize,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub image_uri: String,
    /// Highest confidence first.
    pub candidates: Vec<RecognizedFood>,
}

/// Turns a meal photo into candidate foods. The user picks one and confirms
/// portion and meal type before anything is logged.
pub trait FoodRecognizer: Send + Sync {
    fn recognize(&self, image_uri: &str) -> RecognitionResult;
}

/// Offline recognizer over a small built-in catalog. The same image
/// reference always yields the same candidates.
#[derive(Debug, Clone)]
pub struct CannedRecognizer {
    catalog: Vec<(FoodItem, f64)>,
}

impl Default for CannedRecognizer {
    fn default() -> Self {
        Self {
            catalog: vec![
                (
                    catalog_food(
                        "grilled-chicken-salad",
                        "Grilled chicken salad",
                        [120.0, 14.0, 5.0, 6.0, 1.8],
                    ),
                    320.0,
                ),
                (
                    catalog_food(
                        "salmon-rice-bowl",
                        "Salmon rice bowl",
                        [165.0, 9.0, 18.0, 6.0, 1.0],
                    ),
                    400.0,
                ),
                (
                    catalog_food("avocado-toast", "Avocado toast", [230.0, 6.0, 22.0, 13.0, 6.0]),
                    150.0,
                ),
                (
                    catalog_food(
                        "greek-yogurt-berries",
                        "Greek yogurt with berries",
                        [85.0, 8.0, 10.0, 1.5, 1.2],
                    ),
                    200.0,
                ),
                (
                    catalog_food(
                        "margherita-pizza",
                        "Margherita pizza",
                        [250.0, 11.0, 30.0, 9.5, 2.0],
                    ),
                    250.0,
                ),
            ],
        }
    }
}

impl CannedRecognizer {
    pub fn new(catalog: Vec<(FoodItem, f64)>) -> Self {
        Self { catalog }
    }
}

impl FoodRecognizer for CannedRecognizer {
    fn recognize(&self, image_uri: &str) -> RecognitionResult {
        let len = self.catalog.len();
        let start = if len == 0 { 0 } else { fingerprint(image_uri) % len };
        let candidates = (0..len.min(3))
            .filter_map(|rank| self.catalog.get((start + rank) % len).map(|item| (rank, item)))
            .map(|(rank, (food, grams))| RecognizedFood {
                food: food.clone(),
                suggested_serving: ServingSize {
                    amount: 1.0,
                    unit: "serving".to_string(),
                    grams: *grams,
                },
                confidence: 0.92 - 0.2 * rank as f64,
            })
            .collect();

        RecognitionResult {
            image_uri: image_uri.to_string(),
            candidates,
        }
    }
}

// FNV-1a; stable across runs and platforms.
fn fingerprint(value: &str) -> usize {
    let hash = value.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    });
    (hash % (usize::MAX as u64)) as usize
}

/// `macros` is calories, protein, carbs, fat and fiber per 100 g.
fn catalog_food(id: &str, name: &str, macros: [f64; 5]) -> FoodItem {
    let [calories, protein, carbs, fat, fiber] = macros;
    FoodItem {
        id: id.to_string(),
        name: name.to_string(),
        brand: None,
        nutrition_per_100g: NutritionData {
            calories,
            protein,
            carbs,
            fat,
            fiber,
            ..NutritionData::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_image_same_candidates() {
        let recognizer = CannedRecognizer::default();
        let first = recognizer.recognize("file:///photos/lunch.jpg");
        let second = recognizer.recognize("file:///photos/lunch.jpg");
        assert_eq!(first, second);
        assert_eq!(first.candidates.len(), 3);
    }

    #[test]
    fn candidates_ranked_by_confidence() {
        let result = CannedRecognizer::default().recognize("file:///photos/dinner.jpg");
        let confidences: Vec<f64> = result.candidates.iter().map(|c| c.confidence).collect();
        assert!(confidences.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn empty_catalog_yields_no_candidates() {
        let result = CannedRecognizer::new(Vec::new()).recognize("anything");
        assert!(result.candidates.is_empty());
    }
}
