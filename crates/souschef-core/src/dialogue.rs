use std::future::Future;

use tokio::sync::OwnedMutexGuard;

use crate::action::Action;
use crate::error::SousChefError;
use crate::llm::TextGenerator;
use crate::model::*;
use crate::prompt::{build_recipe_prompt, SYSTEM_INSTRUCTION};
use crate::recipe::{parse_recipe_response, random_loading_phrase};
use crate::render::{messages, recipe_menu, Menu, RecipeView, Reply};
use crate::session::SessionCache;
use crate::storage::StorageBackend;

/// Short callback answer; `alert` asks for a modal instead of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub alert: bool,
}

impl Notice {
    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alert: true,
        }
    }
}

/// Change to the message that carried the pressed button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEdit {
    /// Replace text and keyboard.
    Replace(Reply),
    /// Keep the text, swap the keyboard.
    Markup(Menu),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionResponse {
    pub notice: Option<Notice>,
    pub edit: Option<MessageEdit>,
}

impl ActionResponse {
    fn replace(reply: Reply) -> Self {
        Self {
            notice: None,
            edit: Some(MessageEdit::Replace(reply)),
        }
    }

    fn alert(text: &str) -> Self {
        Self {
            notice: Some(Notice::alert(text)),
            edit: None,
        }
    }
}

/// Conversation engine: one instance serves every user.
///
/// Each operation holds the user's session lock for its whole duration,
/// including the model round trip, so events of one user never interleave.
pub struct Dialogue<S, G> {
    store: S,
    generator: G,
    sessions: SessionCache,
}

impl<S: StorageBackend, G: TextGenerator> Dialogue<S, G> {
    pub fn new(store: S, generator: G) -> Self {
        Self {
            store,
            generator,
            sessions: SessionCache::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Lock the user's session and pull the stored profile on first use.
    /// A store failure leaves the default profile in place.
    async fn session(&self, user: UserId) -> OwnedMutexGuard<SessionState> {
        let mut state = self.sessions.lock(user).await;
        if !state.loaded {
            match self.store.get_profile(user).await {
                Ok(Some(profile)) => {
                    tracing::debug!(user, "loaded preferences");
                    state.profile = profile;
                }
                Ok(None) => tracing::debug!(user, "no stored preferences"),
                Err(e) => tracing::warn!(user, "could not load preferences: {e}"),
            }
            state.loaded = true;
        }
        state
    }

    async fn persist_profile(&self, user: UserId, profile: &UserProfile) -> bool {
        match self.store.upsert_profile(user, profile).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(user, "could not save preferences: {e}");
                false
            }
        }
    }

    // -- Commands --

    pub async fn start(&self, user: UserId, first_name: &str) -> Reply {
        let _state = self.session(user).await;
        messages::welcome(first_name)
    }

    pub fn help(&self) -> Reply {
        messages::help()
    }

    pub async fn health_menu(&self, user: UserId) -> Reply {
        let _state = self.session(user).await;
        messages::health_setup()
    }

    /// Start (or restart) the two-question diet wizard.
    pub async fn begin_diet_wizard(&self, user: UserId) -> Reply {
        let mut state = self.session(user).await;
        state.wizard = WizardStep::AwaitingDietaryRestrictions;
        messages::restrictions_prompt()
    }

    /// Forget the session and the stored profile. Saved recipes stay.
    pub async fn clear(&self, user: UserId) -> Reply {
        let mut state = self.sessions.lock(user).await;
        *state = SessionState::new();

        match self.store.delete_profile(user).await {
            Ok(removed) => {
                tracing::info!(user, removed, "cleared preferences");
                drop(state);
                self.sessions.remove(user);
            }
            Err(e) => {
                // Keep an empty, already-loaded session so the stale stored
                // profile is not read back in.
                tracing::warn!(user, "could not delete stored preferences: {e}");
                state.loaded = true;
            }
        }
        messages::cleared()
    }

    pub async fn status(&self, user: UserId) -> Reply {
        let state = self.session(user).await;
        messages::status(&state.profile)
    }

    pub async fn my_recipes(&self, user: UserId) -> Reply {
        let _state = self.session(user).await;
        let recipes = match self.store.list_recipes(user).await {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::warn!(user, "could not list recipes: {e}");
                Vec::new()
            }
        };
        tracing::debug!(user, count = recipes.len(), "listing saved recipes");
        messages::saved_recipes(&recipes)
    }

    // -- Free text --

    /// Answer a wizard question, or treat the text as a recipe request.
    ///
    /// `on_generate` is awaited with the interstitial phrase right before the
    /// model is called.
    pub async fn handle_text<F, Fut>(&self, user: UserId, text: &str, on_generate: F) -> Reply
    where
        F: FnOnce(&'static str) -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        let mut state = self.session(user).await;

        match state.wizard {
            WizardStep::AwaitingDietaryRestrictions => {
                state.profile.dietary_restrictions = Some(wizard_answer(text));
                state.wizard = WizardStep::AwaitingAllergies;
                messages::allergies_prompt()
            }
            WizardStep::AwaitingAllergies => {
                state.profile.allergies = Some(wizard_answer(text));
                state.wizard = WizardStep::None;
                if self.persist_profile(user, &state.profile).await {
                    tracing::info!(user, "dietary preferences saved");
                    messages::diet_saved()
                } else {
                    Reply::plain(messages::PREFERENCES_NOT_SAVED)
                }
            }
            WizardStep::None => {
                on_generate(random_loading_phrase()).await;
                let prompt = build_recipe_prompt(text, &state.profile);

                let document = match self.generate(&prompt).await {
                    Ok(document) => document,
                    Err(e) => {
                        if e.is_unavailable() {
                            tracing::error!(user, "model unavailable: {e}");
                        } else {
                            tracing::warn!(user, "recipe generation failed: {e}");
                        }
                        return Reply::plain(messages::GENERATION_FAILED);
                    }
                };

                tracing::info!(user, recipe = %document.recipe.name, "generated recipe");
                state.show_recipe(document, RecipeOrigin::Fresh);
                match &state.last_recipe {
                    Some(active) => messages::recipe(RecipeView::Main, active),
                    None => Reply::plain(messages::NO_RECIPE_DATA),
                }
            }
        }
    }

    async fn generate(&self, prompt: &str) -> crate::error::Result<RecipeDocument> {
        let raw = self.generator.generate(prompt, Some(SYSTEM_INSTRUCTION)).await?;
        parse_recipe_response(&raw)
    }

    // -- Menu actions --

    pub async fn handle_action(&self, user: UserId, payload: &str) -> ActionResponse {
        let Some(action) = Action::decode(payload) else {
            tracing::warn!(user, payload, "unknown callback payload");
            return ActionResponse::alert(messages::UNKNOWN_ACTION);
        };
        tracing::debug!(user, ?action, "menu action");

        let mut state = self.session(user).await;

        match action {
            Action::HealthMetric(metric) => {
                ActionResponse::replace(messages::level_prompt(metric))
            }
            Action::HealthBack => ActionResponse::replace(messages::health_setup()),
            Action::HealthDone => ActionResponse::replace(Reply::plain(messages::HEALTH_DONE)),
            Action::SetHealth(setting) => {
                state.profile.set_health(setting);
                let mut response = ActionResponse::replace(messages::health_set(setting));
                if !self.persist_profile(user, &state.profile).await {
                    response.notice = Some(Notice::alert(messages::PREFERENCES_NOT_SAVED));
                }
                response
            }
            Action::ShowView(view) => match &state.last_recipe {
                Some(active) => ActionResponse::replace(messages::recipe(view, active)),
                None => ActionResponse::replace(Reply::plain(messages::NO_RECIPE_DATA)),
            },
            Action::SaveLastRecipe => self.save_last_recipe(user, &mut state).await,
            Action::ViewSaved(id) => match self.store.get_recipe(user, &id).await {
                Ok(saved) => {
                    state.show_recipe(saved.document, RecipeOrigin::Saved(saved.id));
                    match &state.last_recipe {
                        Some(active) => {
                            ActionResponse::replace(messages::recipe(RecipeView::Main, active))
                        }
                        None => ActionResponse::replace(Reply::plain(messages::NO_RECIPE_DATA)),
                    }
                }
                Err(SousChefError::NotFound(_)) => {
                    ActionResponse::replace(Reply::plain(messages::RECIPE_NOT_FOUND))
                }
                Err(e) => {
                    tracing::warn!(user, recipe = %id, "could not fetch recipe: {e}");
                    ActionResponse::replace(Reply::plain(messages::RECIPE_FETCH_FAILED))
                }
            },
            Action::DeleteSaved(id) => match self.store.delete_recipe(user, &id).await {
                Ok(()) => {
                    // Still shown, and can be saved again.
                    if let Some(active) = state.last_recipe.as_mut() {
                        if active.origin == RecipeOrigin::Saved(id.clone()) {
                            active.origin = RecipeOrigin::Fresh;
                        }
                    }
                    ActionResponse::replace(Reply::plain(messages::RECIPE_DELETED))
                }
                Err(SousChefError::NotFound(_)) => ActionResponse::alert(messages::DELETE_FAILED),
                Err(e) => {
                    tracing::warn!(user, recipe = %id, "could not delete recipe: {e}");
                    ActionResponse::alert(messages::DELETE_FAILED)
                }
            },
        }
    }

    async fn save_last_recipe(&self, user: UserId, state: &mut SessionState) -> ActionResponse {
        let Some(active) = state.last_recipe.as_mut() else {
            return ActionResponse::alert(messages::NOTHING_TO_SAVE);
        };

        let id = match &active.origin {
            // Already stored: a repeated tap must not create a duplicate.
            RecipeOrigin::Saved(id) => id.clone(),
            RecipeOrigin::Fresh => match self.store.append_recipe(user, &active.document).await {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(user, "could not save recipe: {e}");
                    return ActionResponse::alert(messages::SAVE_FAILED);
                }
            },
        };

        active.origin = RecipeOrigin::Saved(id);
        ActionResponse {
            notice: Some(Notice::alert(messages::RECIPE_SAVED)),
            edit: Some(MessageEdit::Markup(recipe_menu(
                RecipeView::Main,
                &active.origin,
            ))),
        }
    }

    // -- Inspection --

    pub async fn wizard_step(&self, user: UserId) -> WizardStep {
        self.sessions.lock(user).await.wizard
    }

    pub async fn profile(&self, user: UserId) -> UserProfile {
        self.session(user).await.profile.clone()
    }

    pub async fn last_recipe(&self, user: UserId) -> Option<ActiveRecipe> {
        self.sessions.lock(user).await.last_recipe.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::render::TextFormat;
    use crate::storage::MemoryStorage;

    /// Every call fails as if the database were down.
    struct DownStore;

    fn down<T>() -> Result<T> {
        Err(SousChefError::StoreUnavailable("connection refused".into()))
    }

    impl StorageBackend for DownStore {
        async fn upsert_profile(&self, _: UserId, _: &UserProfile) -> Result<()> {
            down()
        }
        async fn get_profile(&self, _: UserId) -> Result<Option<UserProfile>> {
            down()
        }
        async fn delete_profile(&self, _: UserId) -> Result<bool> {
            down()
        }
        async fn append_recipe(&self, _: UserId, _: &RecipeDocument) -> Result<RecipeId> {
            down()
        }
        async fn list_recipes(&self, _: UserId) -> Result<Vec<SavedRecipe>> {
            down()
        }
        async fn get_recipe(&self, _: UserId, _: &RecipeId) -> Result<SavedRecipe> {
            down()
        }
        async fn delete_recipe(&self, _: UserId, _: &RecipeId) -> Result<()> {
            down()
        }
    }

    struct FixedReply(&'static str);

    impl TextGenerator for FixedReply {
        async fn generate(&self, _: &str, _: Option<&str>) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    const SAMPLE: &str = include_str!("../tests/fixtures/recipe.json");

    async fn noop(_: &'static str) {}

    #[tokio::test]
    async fn unknown_payload_alerts() {
        let dialogue = Dialogue::new(MemoryStorage::new(), FixedReply(SAMPLE));
        let response = dialogue.handle_action(1, "launch_rockets").await;
        assert_eq!(response.notice, Some(Notice::alert(messages::UNKNOWN_ACTION)));
        assert!(response.edit.is_none());
    }

    #[tokio::test]
    async fn down_store_degrades_profile_and_list() {
        let dialogue = Dialogue::new(DownStore, FixedReply(SAMPLE));
        assert!(dialogue.profile(1).await.is_empty());
        let reply = dialogue.my_recipes(1).await;
        assert!(reply.text.starts_with("You have no saved recipes yet"));
    }

    #[tokio::test]
    async fn down_store_keeps_health_choice_in_session() {
        let dialogue = Dialogue::new(DownStore, FixedReply(SAMPLE));
        let response = dialogue.handle_action(1, "bs_diabetic").await;
        assert_eq!(
            response.notice,
            Some(Notice::alert(messages::PREFERENCES_NOT_SAVED))
        );
        assert_eq!(dialogue.profile(1).await.blood_sugar, Some(BloodSugar::Diabetic));
    }

    #[tokio::test]
    async fn down_store_clear_still_empties_status() {
        let dialogue = Dialogue::new(DownStore, FixedReply(SAMPLE));
        dialogue.handle_action(1, "chol_high").await;
        dialogue.clear(1).await;
        assert!(dialogue.status(1).await.text.contains("haven't set any preferences"));
    }

    #[tokio::test]
    async fn down_store_save_alerts_and_keeps_fresh() {
        let dialogue = Dialogue::new(DownStore, FixedReply(SAMPLE));
        dialogue.handle_text(1, "chickpeas", noop).await;
        let response = dialogue.handle_action(1, "save_last_recipe").await;
        assert_eq!(response.notice, Some(Notice::alert(messages::SAVE_FAILED)));
        assert!(response.edit.is_none());
        let active = dialogue.last_recipe(1).await.unwrap();
        assert_eq!(active.origin, RecipeOrigin::Fresh);
    }

    #[tokio::test]
    async fn down_store_view_reports_fetch_error() {
        let dialogue = Dialogue::new(DownStore, FixedReply(SAMPLE));
        let response = dialogue.handle_action(1, "view_recipe_abc").await;
        assert_eq!(
            response.edit,
            Some(MessageEdit::Replace(Reply::plain(messages::RECIPE_FETCH_FAILED)))
        );
    }

    #[tokio::test]
    async fn generated_recipe_is_markdown_with_save() {
        let dialogue = Dialogue::new(MemoryStorage::new(), FixedReply(SAMPLE));
        let reply = dialogue.handle_text(1, "chickpeas", noop).await;
        assert_eq!(reply.format, TextFormat::MarkdownV2);
        assert!(reply.menu.unwrap().has_payload("save_last_recipe"));
    }

    #[tokio::test]
    async fn save_twice_stores_once() {
        let dialogue = Dialogue::new(MemoryStorage::new(), FixedReply(SAMPLE));
        dialogue.handle_text(1, "chickpeas", noop).await;
        dialogue.handle_action(1, "save_last_recipe").await;
        let again = dialogue.handle_action(1, "save_last_recipe").await;
        assert_eq!(again.notice, Some(Notice::alert(messages::RECIPE_SAVED)));
        assert_eq!(dialogue.store().list_recipes(1).await.unwrap().len(), 1);
    }
}
