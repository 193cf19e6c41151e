use crate::action::Action;
use crate::model::{HealthMetric, HealthSetting, RecipeOrigin, SavedRecipe};

use super::views::RecipeView;
use super::{Button, Menu};

const LABEL_LIMIT: usize = 28;
const LABEL_KEEP: usize = 25;

fn button(label: &str, action: Action) -> Button {
    Button::new(label, action.encode())
}

/// Navigation for a displayed recipe: the two other views, plus Save for an
/// unsaved recipe on its main view or Delete for a saved one.
pub fn recipe_menu(view: RecipeView, origin: &RecipeOrigin) -> Menu {
    let mut rows = Vec::new();

    if view == RecipeView::Main && *origin == RecipeOrigin::Fresh {
        rows.push(vec![button("💾 Save Recipe", Action::SaveLastRecipe)]);
    }

    rows.push(
        RecipeView::ALL
            .into_iter()
            .filter(|v| *v != view)
            .map(|v| button(v.button_label(), Action::ShowView(v)))
            .collect(),
    );

    if let RecipeOrigin::Saved(id) = origin {
        rows.push(vec![button(
            "🗑️ Delete Recipe",
            Action::DeleteSaved(id.clone()),
        )]);
    }

    Menu::new(rows)
}

/// Top-level `/health` menu: one row per metric and a Done row.
pub fn health_menu() -> Menu {
    let mut rows: Vec<Vec<Button>> = HealthMetric::ALL
        .into_iter()
        .map(|m| vec![button(m.title(), Action::HealthMetric(m))])
        .collect();
    rows.push(vec![button("Done", Action::HealthDone)]);
    Menu::new(rows)
}

/// Level choices for one metric, then Back.
pub fn level_picker(metric: HealthMetric) -> Menu {
    let mut rows: Vec<Vec<Button>> = metric
        .levels()
        .into_iter()
        .filter_map(|(key, label)| {
            HealthSetting::parse(metric, key).map(|s| vec![button(label, Action::SetHealth(s))])
        })
        .collect();
    rows.push(vec![button("Back", Action::HealthBack)]);
    Menu::new(rows)
}

/// One row per saved recipe, labelled with its (possibly shortened) name.
pub fn saved_recipes_menu(recipes: &[SavedRecipe]) -> Menu {
    Menu::new(
        recipes
            .iter()
            .map(|r| {
                vec![button(
                    &short_label(&r.document.recipe.name),
                    Action::ViewSaved(r.id.clone()),
                )]
            })
            .collect(),
    )
}

fn short_label(name: &str) -> String {
    if name.chars().count() > LABEL_LIMIT {
        let head: String = name.chars().take(LABEL_KEEP).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}
