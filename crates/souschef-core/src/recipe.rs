use rand::seq::SliceRandom;

use crate::error::{Result, SousChefError};
use crate::model::RecipeDocument;

/// Interstitial messages shown while a recipe is being generated.
pub const LOADING_MESSAGES: [&str; 6] = [
    "🍳 Prepping the kitchen...",
    "🥕 Sharpening my knives...",
    "🔥 Preheating the oven...",
    "🤖 Consulting with the master chefs...",
    "📚 Skimming through my cookbook...",
    "🌿 Gathering fresh herbs...",
];

pub fn random_loading_phrase() -> &'static str {
    LOADING_MESSAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(LOADING_MESSAGES[0])
}

/// Parse a model reply into a recipe document.
///
/// The whole reply is tried first; if that fails, the first balanced
/// top-level `{...}` object inside it is tried. Anything else, including a
/// reply missing one of the three sections, is a `RecipeGeneration` error.
pub fn parse_recipe_response(raw: &str) -> Result<RecipeDocument> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SousChefError::RecipeGeneration("empty model reply".into()));
    }

    let first_err = match serde_json::from_str::<RecipeDocument>(trimmed) {
        Ok(doc) => return Ok(doc),
        Err(e) => e,
    };

    let Some(candidate) = first_json_object(trimmed) else {
        return Err(SousChefError::RecipeGeneration(format!(
            "no JSON object in model reply: {first_err}"
        )));
    };

    serde_json::from_str(candidate)
        .map_err(|e| SousChefError::RecipeGeneration(format!("invalid recipe JSON: {e}")))
}

/// The first balanced `{...}` in `text`, ignoring braces inside strings.
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
