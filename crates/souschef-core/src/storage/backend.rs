use crate::error::Result;
use crate::model::*;

/// Persistence of user profiles and saved recipes, keyed by user identity.
///
/// Errors are returned, never swallowed: callers decide whether to degrade.
pub trait StorageBackend: Send + Sync {
    // -- Profiles --

    fn upsert_profile(
        &self,
        user: UserId,
        profile: &UserProfile,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn get_profile(
        &self,
        user: UserId,
    ) -> impl std::future::Future<Output = Result<Option<UserProfile>>> + Send;

    /// Returns `true` when a stored profile was removed.
    fn delete_profile(&self, user: UserId)
        -> impl std::future::Future<Output = Result<bool>> + Send;

    // -- Recipes --

    /// Persist a recipe for `user` and return its store-assigned id.
    fn append_recipe(
        &self,
        user: UserId,
        document: &RecipeDocument,
    ) -> impl std::future::Future<Output = Result<RecipeId>> + Send;

    /// All recipes saved by `user`, oldest first.
    fn list_recipes(
        &self,
        user: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<SavedRecipe>>> + Send;

    /// Fails with `NotFound` when no recipe with this id belongs to `user`.
    fn get_recipe(
        &self,
        user: UserId,
        id: &RecipeId,
    ) -> impl std::future::Future<Output = Result<SavedRecipe>> + Send;

    /// Fails with `NotFound` when no recipe with this id belongs to `user`.
    fn delete_recipe(
        &self,
        user: UserId,
        id: &RecipeId,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
