use std::fmt::Write;

use crate::model::{FactsSection, NutritionSection, RecipeDocument, RecipeSection};

use super::escape::{bold, escape_markdown};

/// One page of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeView {
    Main,
    Nutrition,
    Facts,
}

impl RecipeView {
    pub const ALL: [RecipeView; 3] = [Self::Main, Self::Nutrition, Self::Facts];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Nutrition => "nutrition",
            Self::Facts => "facts",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.code() == code)
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            Self::Main => "🍽️ Recipe",
            Self::Nutrition => "📊 Nutrition",
            Self::Facts => "🧠 Facts",
        }
    }
}

/// Render one view of a recipe as MarkdownV2. All document text is escaped.
pub fn render_view(view: RecipeView, document: &RecipeDocument) -> String {
    match view {
        RecipeView::Main => render_main(&document.recipe),
        RecipeView::Nutrition => render_nutrition(&document.nutritional_info),
        RecipeView::Facts => render_facts(&document.recipe_facts),
    }
}

// `writeln!` into a String cannot fail; results are ignored below.

fn field(out: &mut String, icon: &str, label: &str, value: &str) {
    if !value.trim().is_empty() {
        let _ = writeln!(out, "{icon} {} {}", bold(label), escape_markdown(value));
    }
}

fn bullets(out: &mut String, marker: &str, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "{marker} {}", escape_markdown(item));
    }
}

fn render_main(recipe: &RecipeSection) -> String {
    let mut out = format!("🍳 {}\n\n", bold(&recipe.name));

    field(&mut out, "⏱️", "Prep:", &recipe.prep_time);
    field(&mut out, "🔥", "Cook:", &recipe.cook_time);
    field(&mut out, "⏰", "Total:", &recipe.total_time);
    field(&mut out, "🍽️", "Serves:", &recipe.servings);
    out.push('\n');

    let _ = writeln!(out, "🥘 {}", bold("Ingredients:"));
    bullets(&mut out, "•", &recipe.ingredients);
    out.push('\n');

    let _ = writeln!(out, "👨‍🍳 {}", bold("Instructions:"));
    for (i, step) in recipe.instructions.iter().enumerate() {
        let _ = writeln!(out, "{}\\. {}", i + 1, escape_markdown(step));
    }
    out.push('\n');

    if !recipe.health_tips.is_empty() {
        let _ = writeln!(out, "💡 {}", bold("Health Tips:"));
        bullets(&mut out, "•", &recipe.health_tips);
        out.push('\n');
    }

    if let Some(storage) = recipe.storage.as_deref() {
        field(&mut out, "🗄️", "Storage:", storage);
    }

    out
}

fn render_nutrition(nutrition: &NutritionSection) -> String {
    let mut out = format!("📊 {}\n", bold("Nutritional Information"));
    out.push_str("Per serving breakdown:\n\n");

    field(&mut out, "🔥", "Calories:", &nutrition.calories);
    field(&mut out, "🥩", "Protein:", &nutrition.protein);
    field(&mut out, "🍞", "Carbs:", &nutrition.carbs);
    field(&mut out, "🥑", "Fat:", &nutrition.fat);
    field(&mut out, "🌾", "Fiber:", &nutrition.fiber);
    field(&mut out, "🧂", "Sodium:", &nutrition.sodium);

    if !nutrition.health_benefits.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "🌟 {}", bold("Health Benefits:"));
        bullets(&mut out, "•", &nutrition.health_benefits);
    }

    out
}

fn render_facts(facts: &FactsSection) -> String {
    let mut out = format!("🧠 {}\n\n", bold("Recipe Facts"));

    field(&mut out, "🌍", "Cuisine:", &facts.cuisine_type);
    field(&mut out, "📈", "Difficulty:", &facts.difficulty);
    field(&mut out, "🍽️", "Meal Type:", &facts.meal_type);

    if !facts.dietary_tags.is_empty() {
        field(&mut out, "🏷️", "Tags:", &facts.dietary_tags.join(", "));
    }

    if !facts.fun_facts.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "🎯 {}", bold("Did You Know?"));
        bullets(&mut out, "💡", &facts.fun_facts);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::strip_markup;

    fn sample() -> RecipeDocument {
        serde_json::from_str(include_str!("../../tests/fixtures/recipe.json")).unwrap()
    }

    #[test]
    fn main_view_escapes_and_numbers() {
        let text = render_view(RecipeView::Main, &sample());
        assert!(text.starts_with(r"🍳 *Chickpea & Spinach Stew \(Low\-GI\)*"));
        assert!(text.contains(r"*Prep:* 10 minutes"));
        assert!(text.contains(r"• 1/2 tsp smoked paprika"));
        assert!(text.contains(r"2\. Add the chickpeas and paprika; stir for 2\-3 minutes\."));
        assert!(text.contains(r"3\. Fold in the spinach until wilted\. Serve warm\!"));
        assert!(text.contains(r"*Storage:* Refrigerate up to 3 days\."));
    }

    #[test]
    fn nutrition_view() {
        let text = render_view(RecipeView::Nutrition, &sample());
        assert!(text.contains("*Calories:* 310 calories"));
        assert!(text.contains("*Sodium:* 240 mg"));
        assert!(text.contains("• High fiber slows glucose absorption"));
    }

    #[test]
    fn facts_view_joins_tags() {
        let text = render_view(RecipeView::Facts, &sample());
        assert!(text.contains(r"*Tags:* vegetarian, vegan, gluten\-free"));
        assert!(text.contains("*Did You Know?*"));
        assert!(text.contains(r"💡 Popeye's favourite vegetable is 91% water\."));
    }

    #[test]
    fn empty_optional_fields_are_skipped() {
        let mut doc = sample();
        doc.recipe.prep_time.clear();
        doc.recipe.health_tips.clear();
        doc.recipe.storage = None;
        let text = render_view(RecipeView::Main, &doc);
        assert!(!text.contains("Prep:"));
        assert!(!text.contains("Health Tips"));
        assert!(!text.contains("Storage"));
    }

    #[test]
    fn stripped_view_is_readable() {
        let plain = strip_markup(&render_view(RecipeView::Main, &sample()));
        assert!(plain.starts_with("🍳 Chickpea & Spinach Stew (Low-GI)"));
        assert!(plain.contains("1. Heat the oil in a large pot over medium heat."));
        assert!(!plain.contains('\\'));
    }

    #[test]
    fn reserved_chars_in_steps_survive_strip_once() {
        let step = "\\_*[]()~`>#+-=|{}.!";
        let mut doc = sample();
        doc.recipe.instructions = vec![step.into()];

        let text = render_view(RecipeView::Main, &doc);
        assert!(text.contains(r"1\. \\\_\*\[\]\(\)\~\`\>\#\+\-\=\|\{\}\.\!"));

        let plain = strip_markup(&text);
        let line = plain
            .lines()
            .find(|l| l.starts_with("1. "))
            .expect("numbered step");
        assert_eq!(line, format!("1. {step}"));
    }

    #[test]
    fn view_codes() {
        for view in RecipeView::ALL {
            assert_eq!(RecipeView::from_code(view.code()), Some(view));
        }
        assert_eq!(RecipeView::from_code("dessert"), None);
    }
}
