use super::profile::UserProfile;
use super::recipe::{RecipeDocument, RecipeId};

/// Which wizard question the next free-text message answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WizardStep {
    #[default]
    None,
    AwaitingDietaryRestrictions,
    AwaitingAllergies,
}

/// Where the recipe currently shown to the user came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeOrigin {
    /// Generated in this session and not saved yet.
    Fresh,
    /// Persisted under this id.
    Saved(RecipeId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRecipe {
    pub document: RecipeDocument,
    pub origin: RecipeOrigin,
}

/// In-memory working state of one user. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub profile: UserProfile,
    pub wizard: WizardStep,
    pub last_recipe: Option<ActiveRecipe>,
    /// Set once the profile has been pulled from the store (or the attempt failed).
    pub loaded: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the recipe shown to the user.
    pub fn show_recipe(&mut self, document: RecipeDocument, origin: RecipeOrigin) {
        self.last_recipe = Some(ActiveRecipe { document, origin });
    }
}
