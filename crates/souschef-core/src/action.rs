use crate::model::{HealthMetric, HealthSetting, RecipeId};
use crate::render::RecipeView;

/// Menu actions carried in inline-button payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open the level picker for a metric.
    HealthMetric(HealthMetric),
    HealthBack,
    HealthDone,
    SetHealth(HealthSetting),
    ShowView(RecipeView),
    SaveLastRecipe,
    ViewSaved(RecipeId),
    DeleteSaved(RecipeId),
}

const VIEW_PREFIX: &str = "view_recipe_";
const DELETE_PREFIX: &str = "delete_recipe_";

impl Action {
    pub fn encode(&self) -> String {
        match self {
            Self::HealthMetric(metric) => format!("health_{}", metric.code()),
            Self::HealthBack => "health_back".into(),
            Self::HealthDone => "health_done".into(),
            Self::SetHealth(setting) => format!("{}_{}", setting.metric().code(), setting.key()),
            Self::ShowView(view) => format!("recipe_{}", view.code()),
            Self::SaveLastRecipe => "save_last_recipe".into(),
            Self::ViewSaved(id) => format!("{VIEW_PREFIX}{id}"),
            Self::DeleteSaved(id) => format!("{DELETE_PREFIX}{id}"),
        }
    }

    /// Parse a payload. Returns `None` for anything this bot never emits.
    pub fn decode(payload: &str) -> Option<Self> {
        match payload {
            "health_back" => return Some(Self::HealthBack),
            "health_done" => return Some(Self::HealthDone),
            "save_last_recipe" => return Some(Self::SaveLastRecipe),
            _ => {}
        }

        if let Some(id) = payload.strip_prefix(VIEW_PREFIX) {
            return saved_id(id).map(Self::ViewSaved);
        }
        if let Some(id) = payload.strip_prefix(DELETE_PREFIX) {
            return saved_id(id).map(Self::DeleteSaved);
        }
        if let Some(code) = payload.strip_prefix("health_") {
            return HealthMetric::from_code(code).map(Self::HealthMetric);
        }
        if let Some(code) = payload.strip_prefix("recipe_") {
            return RecipeView::from_code(code).map(Self::ShowView);
        }

        let (code, key) = payload.split_once('_')?;
        let metric = HealthMetric::from_code(code)?;
        HealthSetting::parse(metric, key).map(Self::SetHealth)
    }
}

fn saved_id(id: &str) -> Option<RecipeId> {
    (!id.is_empty()).then(|| RecipeId::new(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BloodPressure, BloodSugar, Cholesterol};

    #[test]
    fn decodes_fixed_payloads() {
        assert_eq!(
            Action::decode("health_bp"),
            Some(Action::HealthMetric(HealthMetric::BloodPressure))
        );
        assert_eq!(
            Action::decode("health_chol"),
            Some(Action::HealthMetric(HealthMetric::Cholesterol))
        );
        assert_eq!(Action::decode("health_back"), Some(Action::HealthBack));
        assert_eq!(Action::decode("health_done"), Some(Action::HealthDone));
        assert_eq!(
            Action::decode("recipe_nutrition"),
            Some(Action::ShowView(RecipeView::Nutrition))
        );
        assert_eq!(Action::decode("save_last_recipe"), Some(Action::SaveLastRecipe));
    }

    #[test]
    fn decodes_levels_with_underscores() {
        assert_eq!(
            Action::decode("bp_high_stage2"),
            Some(Action::SetHealth(HealthSetting::BloodPressure(
                BloodPressure::HighStage2
            )))
        );
        assert_eq!(
            Action::decode("bs_prediabetic"),
            Some(Action::SetHealth(HealthSetting::BloodSugar(
                BloodSugar::Prediabetic
            )))
        );
        assert_eq!(
            Action::decode("chol_high"),
            Some(Action::SetHealth(HealthSetting::Cholesterol(Cholesterol::High)))
        );
    }

    #[test]
    fn decodes_saved_recipe_ids() {
        assert_eq!(
            Action::decode("view_recipe_65f1a2b3c4d5e6f708192a3b"),
            Some(Action::ViewSaved(RecipeId::new("65f1a2b3c4d5e6f708192a3b")))
        );
        assert_eq!(
            Action::decode("delete_recipe_abc"),
            Some(Action::DeleteSaved(RecipeId::new("abc")))
        );
        assert_eq!(Action::decode("view_recipe_"), None);
    }

    #[test]
    fn rejects_unknown() {
        let unknown = [
            "",
            "health_",
            "health_weight",
            "bp_low",
            "recipe_dessert",
            "xyz_1",
            "nope",
        ];
        for payload in unknown {
            assert_eq!(Action::decode(payload), None, "{payload}");
        }
    }

    #[test]
    fn encode_matches_decode() {
        let actions = [
            Action::HealthMetric(HealthMetric::BloodSugar),
            Action::SetHealth(HealthSetting::BloodPressure(BloodPressure::HighStage1)),
            Action::ShowView(RecipeView::Facts),
            Action::DeleteSaved(RecipeId::new("0191e4a0-7c1d-7b3e-9f00-000000000000")),
        ];
        for action in actions {
            assert_eq!(Action::decode(&action.encode()), Some(action));
        }
        let setting = HealthSetting::BloodPressure(BloodPressure::HighStage1);
        assert_eq!(Action::SetHealth(setting).encode(), "bp_high_stage1");
    }
}
