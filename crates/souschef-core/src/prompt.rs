use crate::model::UserProfile;

/// System instruction sent alongside every recipe prompt.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a professional nutritionist and chef. You answer with a single JSON object only.";

const RESPONSE_SCHEMA: &str = r#"IMPORTANT: Please respond ONLY with valid JSON format. No additional text, explanations, or formatting outside the JSON structure.

Provide the response in this exact JSON structure:
{
    "recipe": {
        "name": "Recipe Name",
        "prep_time": "X minutes",
        "cook_time": "X minutes",
        "total_time": "X minutes",
        "servings": "X servings",
        "ingredients": [
            "ingredient 1 with measurement",
            "ingredient 2 with measurement"
        ],
        "instructions": [
            "Step 1 detailed instruction",
            "Step 2 detailed instruction"
        ],
        "health_tips": [
            "Health tip 1",
            "Health tip 2"
        ],
        "storage": "Storage instructions"
    },
    "nutritional_info": {
        "calories_per_serving": "X calories",
        "protein": "X grams",
        "carbs": "X grams",
        "fat": "X grams",
        "fiber": "X grams",
        "sodium": "X mg",
        "health_benefits": [
            "Health benefit 1",
            "Health benefit 2"
        ]
    },
    "recipe_facts": {
        "cuisine_type": "Cuisine type",
        "difficulty": "Easy/Medium/Hard",
        "meal_type": "Breakfast/Lunch/Dinner/Snack",
        "dietary_tags": ["tag1", "tag2"],
        "fun_facts": [
            "Interesting fact 1 about ingredients or cooking method",
            "Interesting fact 2 about nutritional benefits"
        ]
    }
}

Make sure the recipe is tailored to the health conditions and dietary needs mentioned above.
"#;

/// Build the generation prompt for a free-text request and the user's profile.
///
/// Only attributes that are present (and, for text fields, non-empty) get a
/// line under `HEALTH CONSIDERATIONS:`.
pub fn build_recipe_prompt(ingredients: &str, profile: &UserProfile) -> String {
    let mut prompt = String::from(
        "You are a professional nutritionist and chef. Create a detailed, healthy recipe using the following information:\n\n",
    );
    prompt.push_str(&format!("AVAILABLE INGREDIENTS: {}\n\n", ingredients.trim()));
    prompt.push_str("HEALTH CONSIDERATIONS:\n");

    if let Some(bp) = profile.blood_pressure {
        prompt.push_str(&format!(
            "- Blood Pressure: {} (recommend low-sodium options)\n",
            bp.key()
        ));
    }
    if let Some(bs) = profile.blood_sugar {
        prompt.push_str(&format!(
            "- Blood Sugar Level: {} (recommend low-glycemic options)\n",
            bs.key()
        ));
    }
    if let Some(chol) = profile.cholesterol {
        prompt.push_str(&format!(
            "- Cholesterol Level: {} (recommend heart-healthy options)\n",
            chol.key()
        ));
    }
    if let Some(restrictions) = profile.restrictions() {
        prompt.push_str(&format!("- Dietary Restrictions: {restrictions}\n"));
    }
    if let Some(allergies) = profile.allergy_list() {
        prompt.push_str(&format!("- Allergies: {allergies}\n"));
    }

    prompt.push('\n');
    prompt.push_str(RESPONSE_SCHEMA);
    prompt
}
