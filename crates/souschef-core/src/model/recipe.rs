use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::profile::UserId;

/// Structured result of one generation call. All three sections are
/// mandatory; a reply without any of them fails to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDocument {
    pub recipe: RecipeSection,
    pub nutritional_info: NutritionSection,
    pub recipe_facts: FactsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSection {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub prep_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cook_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub total_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub servings: String,
    #[serde(deserialize_with = "lenient_list")]
    pub ingredients: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub instructions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub health_tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSection {
    #[serde(
        rename = "calories_per_serving",
        default,
        deserialize_with = "lenient_string"
    )]
    pub calories: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub protein: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub carbs: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fat: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fiber: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sodium: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub health_benefits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactsSection {
    #[serde(default, deserialize_with = "lenient_string")]
    pub cuisine_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub meal_type: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub dietary_tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub fun_facts: Vec<String>,
}

/// Store-assigned identity of a saved recipe (ObjectId hex or UUID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recipe document persisted by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub id: RecipeId,
    pub user_id: UserId,
    pub saved_at: DateTime<Utc>,
    pub document: RecipeDocument,
}

// -- Lenient scalar handling --
//
// Models regularly answer `"servings": 4` or `"calories_per_serving": 350`
// despite the schema asking for strings.

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(Scalar::into_string).unwrap_or_default())
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Scalar>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(Scalar::into_string)
        .collect())
}
