//! Typed views over raw and derived documents
//!
//! Collections are schemaless; these structs only name the fields the
//! analytics layer reads or writes. Unknown fields are ignored and missing
//! optional fields deserialize as `None`.

use serde::{Deserialize, Serialize};

/// Nutrition facts attached to a fruit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutritions {
    #[allow(missing_docs)]
    #[serde(default)]
    pub calories: Option<f64>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub fat: Option<f64>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub sugar: Option<f64>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub carbohydrates: Option<f64>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub protein: Option<f64>,
}

/// A raw fruit document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FruitRecord {
    /// Common name
    #[serde(default)]
    pub name: String,
    /// Botanical family
    #[serde(default)]
    pub family: String,
    /// Botanical order
    #[serde(default)]
    pub order: String,
    /// Nutrition facts
    #[serde(default)]
    pub nutritions: Nutritions,
}

/// A raw snack document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnackRecord {
    #[allow(missing_docs)]
    #[serde(default)]
    pub product_name: Option<String>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub nutriscore_grade: Option<String>,
    /// Fat per 100 g
    #[serde(default)]
    pub fat_100g: Option<f64>,
    /// Number of additives
    #[serde(default)]
    pub additives_n: Option<u64>,
}

/// The single row of `fruit-nutrition-summary`
///
/// Averages are `None` when no fruit carried a numeric value for that field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    #[allow(missing_docs)]
    pub avg_calories: Option<f64>,
    #[allow(missing_docs)]
    pub avg_fat: Option<f64>,
    #[allow(missing_docs)]
    pub avg_sugar: Option<f64>,
    #[allow(missing_docs)]
    pub avg_carbs: Option<f64>,
    #[allow(missing_docs)]
    pub avg_protein: Option<f64>,
    /// Number of fruits in the source collection
    pub total_fruits: u64,
}

/// One row of `fruit-family-aggregates`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyAggregate {
    /// Family name; `None` groups fruits without a family
    #[serde(rename = "_id")]
    pub family: Option<String>,
    /// Number of fruits in the family
    pub count: u64,
    /// Fruit names in encounter order
    #[serde(default)]
    pub fruits: Vec<String>,
    /// Distinct botanical orders seen in the family
    #[serde(default)]
    pub orders: Vec<String>,
}
