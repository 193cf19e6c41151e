//! Fixed bot texts. Anything interpolated from users or the model is escaped
//! before it reaches a MarkdownV2 reply.

use crate::model::{ActiveRecipe, HealthMetric, HealthSetting, SavedRecipe, UserProfile};

use super::escape::{bold, escape_markdown};
use super::menus::{health_menu, level_picker, recipe_menu, saved_recipes_menu};
use super::views::{render_view, RecipeView};
use super::Reply;

pub const NO_RECIPE_DATA: &str = "❌ No recipe data found. Please create a new recipe.";
pub const RECIPE_NOT_FOUND: &str = "❌ Recipe not found. It might have been deleted.";
pub const RECIPE_FETCH_FAILED: &str = "❌ An error occurred while fetching the recipe.";
pub const RECIPE_DELETED: &str = "🗑️ Recipe successfully deleted.";
pub const GENERATION_FAILED: &str = "❌ Sorry, I couldn't generate a recipe right now. Please try again with different ingredients or check if your message is clear.";
pub const HEALTH_DONE: &str = "✅ Health information setup complete!";

// Callback alerts.
pub const RECIPE_SAVED: &str = "Recipe saved successfully!";
pub const NOTHING_TO_SAVE: &str = "Error: Couldn't find the recipe to save.";
pub const SAVE_FAILED: &str = "Error: Could not save the recipe. Please try again later.";
pub const DELETE_FAILED: &str = "Error: Could not delete the recipe.";
pub const PREFERENCES_NOT_SAVED: &str =
    "⚠️ Your choice applies to this session but could not be saved.";
pub const UNKNOWN_ACTION: &str = "Unknown action.";

fn line(out: &mut String, text: &str) {
    out.push_str(&escape_markdown(text));
    out.push('\n');
}

pub fn welcome(first_name: &str) -> Reply {
    let mut out = format!(
        "🍳 {}\n\n",
        bold(&format!("Welcome to Sous-Chef AI, {first_name}!"))
    );
    line(
        &mut out,
        "I'm your personal AI nutritionist and chef! I can help you create healthy, personalized recipes based on:",
    );
    out.push('\n');
    for (icon, item) in [
        ("🥕", "Your ingredients"),
        ("🏥", "Your health conditions"),
        ("🌱", "Your dietary preferences"),
        ("🚫", "Your allergies"),
    ] {
        out.push_str(&format!("{icon} {}\n", bold(item)));
    }
    out.push('\n');

    out.push_str(&format!("{}\n", bold("How to use me:")));
    line(&mut out, "• Just send me your ingredients or describe your situation");
    line(&mut out, "• Use /health to set your health information");
    line(&mut out, "• Use /diet to set dietary preferences");
    line(&mut out, "• Use /help for more options");
    out.push('\n');

    out.push_str(&format!("{}\n", bold("Example messages:")));
    for example in [
        "chicken, broccoli, quinoa",
        "just finished workout, need protein",
        "feeling sick, what should I eat?",
        "need quick healthy lunch",
    ] {
        line(&mut out, &format!("• \"{example}\""));
    }
    out.push('\n');
    line(&mut out, "Let's start cooking! 🎉");

    Reply::markdown(out)
}

pub fn help() -> Reply {
    let mut out = format!("🆘 {}\n\n", bold("Sous-Chef AI Help"));

    out.push_str(&format!("{}\n", bold("Commands:")));
    for (command, about) in [
        ("/start", "Start the bot"),
        ("/help", "Show this help message"),
        ("/health", "Set your health information"),
        ("/diet", "Set dietary preferences and allergies"),
        ("/myrecipes", "View your saved recipes"),
        ("/clear", "Clear all your saved preferences"),
        ("/status", "View your current preferences"),
    ] {
        line(&mut out, &format!("{command} - {about}"));
    }
    out.push('\n');

    out.push_str(&format!("{}\n", bold("How to create recipes:")));
    line(&mut out, "Just send me a message with:");
    line(&mut out, "• Ingredients you have");
    line(&mut out, "• Your cooking situation");
    line(&mut out, "• What you're feeling like eating");
    out.push('\n');

    out.push_str(&format!("{}\n", bold("Examples:")));
    for example in [
        "salmon, asparagus, lemon",
        "need energy boost breakfast",
        "quick dinner for weight loss",
        "comfort food for cold day",
    ] {
        line(&mut out, &format!("\"{example}\""));
    }
    out.push('\n');
    line(&mut out, "I'll create a personalized recipe just for you! 🍽️");

    Reply::markdown(out)
}

pub fn health_setup() -> Reply {
    let text = format!(
        "🏥 {}\n\n{}",
        bold("Health Information Setup"),
        escape_markdown("Select which health information you'd like to set:")
    );
    Reply::markdown(text).with_menu(health_menu())
}

pub fn level_prompt(metric: HealthMetric) -> Reply {
    let text = match metric {
        HealthMetric::BloodPressure => "🩺 Select your blood pressure level:",
        HealthMetric::BloodSugar => "🩸 Select your blood sugar level:",
        HealthMetric::Cholesterol => "🫀 Select your cholesterol level:",
    };
    Reply::plain(text).with_menu(level_picker(metric))
}

pub fn health_set(setting: HealthSetting) -> Reply {
    let metric = match setting.metric() {
        HealthMetric::BloodPressure => "Blood pressure",
        HealthMetric::BloodSugar => "Blood sugar",
        HealthMetric::Cholesterol => "Cholesterol",
    };
    Reply::plain(format!("✅ {metric} set to: {}", setting.label()))
}

pub fn restrictions_prompt() -> Reply {
    let text = format!(
        "🌱 {}\n\n{}\n{}",
        bold("Dietary Preferences Setup"),
        escape_markdown(
            "Please send me your dietary restrictions (e.g., vegetarian, vegan, keto, paleo, gluten-free)"
        ),
        escape_markdown("Or type 'none' if you don't have any restrictions.")
    );
    Reply::markdown(text)
}

pub fn allergies_prompt() -> Reply {
    Reply::plain(
        "Great! Now please send me your allergies (e.g., nuts, dairy, shellfish, eggs)\n\
         Or type 'none' if you don't have any allergies.",
    )
}

pub fn diet_saved() -> Reply {
    Reply::plain(
        "✅ Dietary preferences saved!\n\
         Now you can send me ingredients or describe what you want to cook!",
    )
}

pub fn cleared() -> Reply {
    Reply::plain(
        "✅ All your preferences have been cleared!\n\
         You can set them again using /health and /diet commands.",
    )
}

pub fn status(profile: &UserProfile) -> Reply {
    if profile.is_empty() {
        return Reply::plain(
            "📋 You haven't set any preferences yet.\n\
             Use /health and /diet to set your preferences.",
        );
    }

    let mut out = format!("📋 {}\n\n", bold("Your Current Preferences:"));

    if profile.has_health() {
        out.push_str(&format!("🏥 {}\n", bold("Health Information:")));
        if let Some(bp) = profile.blood_pressure {
            line(&mut out, &format!("• Blood Pressure: {}", bp.label()));
        }
        if let Some(bs) = profile.blood_sugar {
            line(&mut out, &format!("• Blood Sugar: {}", bs.label()));
        }
        if let Some(chol) = profile.cholesterol {
            line(&mut out, &format!("• Cholesterol: {}", chol.label()));
        }
        out.push('\n');
    }

    if profile.has_diet() {
        out.push_str(&format!("🌱 {}\n", bold("Dietary Information:")));
        if let Some(restrictions) = profile.restrictions() {
            line(&mut out, &format!("• Restrictions: {restrictions}"));
        }
        if let Some(allergies) = profile.allergy_list() {
            line(&mut out, &format!("• Allergies: {allergies}"));
        }
    }

    Reply::markdown(out)
}

pub fn saved_recipes(recipes: &[SavedRecipe]) -> Reply {
    if recipes.is_empty() {
        return Reply::plain(
            "You have no saved recipes yet. Start creating one by sending me ingredients!",
        );
    }
    let text = format!(
        "📚 {}\n\n{}",
        bold("Your Saved Recipes:"),
        escape_markdown("Select a recipe to view its details.")
    );
    Reply::markdown(text).with_menu(saved_recipes_menu(recipes))
}

/// A recipe view with the navigation menu matching its origin.
pub fn recipe(view: RecipeView, active: &ActiveRecipe) -> Reply {
    Reply::markdown(render_view(view, &active.document))
        .with_menu(recipe_menu(view, &active.origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BloodPressure, BloodSugar};
    use crate::render::{strip_markup, TextFormat};

    #[test]
    fn welcome_escapes_first_name() {
        let reply = welcome("Ann-Marie");
        assert_eq!(reply.format, TextFormat::MarkdownV2);
        assert!(reply
            .text
            .starts_with(r"🍳 *Welcome to Sous\-Chef AI, Ann\-Marie\!*"));
        assert!(strip_markup(&reply.text).contains("• Use /health to set your health information"));
    }

    #[test]
    fn help_lists_every_command() {
        let plain = strip_markup(&help().text);
        for command in ["/start", "/help", "/health", "/diet", "/myrecipes", "/clear", "/status"] {
            assert!(plain.contains(command), "{command}");
        }
    }

    #[test]
    fn empty_status() {
        let reply = status(&UserProfile::default());
        assert_eq!(reply.format, TextFormat::Plain);
        assert!(reply.text.contains("haven't set any preferences"));
    }

    #[test]
    fn explicit_none_only_counts_as_empty() {
        let profile = UserProfile {
            dietary_restrictions: Some(String::new()),
            allergies: Some(String::new()),
            ..Default::default()
        };
        assert!(status(&profile).text.contains("haven't set any preferences"));
    }

    #[test]
    fn status_lists_labels_and_diet() {
        let profile = UserProfile {
            blood_pressure: Some(BloodPressure::HighStage1),
            blood_sugar: Some(BloodSugar::Diabetic),
            dietary_restrictions: Some("low-carb".into()),
            allergies: Some(String::new()),
            ..Default::default()
        };
        let reply = status(&profile);
        assert_eq!(reply.format, TextFormat::MarkdownV2);
        assert!(reply
            .text
            .contains(r"• Blood Pressure: High Stage 1 \(130\-139/80\-89\)"));
        assert!(reply.text.contains(r"• Restrictions: low\-carb"));
        assert!(!reply.text.contains("Allergies"));
        assert!(!reply.text.contains("Cholesterol"));
    }

    #[test]
    fn health_set_uses_full_label() {
        let reply = health_set(HealthSetting::BloodSugar(BloodSugar::Prediabetic));
        assert_eq!(reply.text, "✅ Blood sugar set to: Prediabetic (100-125 mg/dL)");
    }

    #[test]
    fn no_saved_recipes_has_no_menu() {
        let reply = saved_recipes(&[]);
        assert!(reply.menu.is_none());
        assert!(reply.text.starts_with("You have no saved recipes yet"));
    }
}
