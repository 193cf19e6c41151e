#![allow(unused_imports, dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use souschef_core::dialogue::Dialogue;
use souschef_core::error::{Result, SousChefError};
use souschef_core::llm::TextGenerator;
use souschef_core::model::RecipeDocument;
use souschef_core::storage::MemoryStorage;

pub const SAMPLE: &str = include_str!("../fixtures/recipe.json");

pub fn sample() -> RecipeDocument {
    serde_json::from_str(SAMPLE).expect("fixture should parse")
}

/// Sample recipe JSON with a different name.
pub fn sample_named(name: &str) -> String {
    let mut doc = sample();
    doc.recipe.name = name.to_string();
    serde_json::to_string(&doc).expect("fixture should serialize")
}

/// Replays canned replies in order and records every prompt it was given.
/// Falls back to the fixture once the script runs out.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: impl IntoIterator<Item = Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _system: Option<&str>) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(SAMPLE.to_string()))
    }
}

/// Names the recipe after the requested ingredients, after a short delay,
/// so concurrent users can be told apart.
pub struct EchoGenerator;

impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str, _system: Option<&str>) -> Result<String> {
        let ingredients = prompt
            .lines()
            .find_map(|l| l.strip_prefix("AVAILABLE INGREDIENTS: "))
            .ok_or_else(|| SousChefError::Llm("no ingredients line".into()))?
            .to_string();
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(sample_named(&ingredients))
    }
}

pub fn scripted_dialogue(
    replies: impl IntoIterator<Item = Result<String>>,
) -> Dialogue<MemoryStorage, ScriptedGenerator> {
    Dialogue::new(MemoryStorage::new(), ScriptedGenerator::new(replies))
}

pub async fn no_interstitial(_: &'static str) {}

/// Connection string for the MongoDB tests: `MONGO_URI` or localhost:27017.
pub fn mongo_uri() -> String {
    std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}
