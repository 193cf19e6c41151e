use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, SousChefError};
use crate::model::*;

use super::StorageBackend;

/// Process-local storage. Used when no database is configured or reachable;
/// everything is lost on restart.
#[derive(Default)]
pub struct MemoryStorage {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
    recipes: RwLock<Vec<SavedRecipe>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err<E: std::fmt::Display>(e: E) -> SousChefError {
    SousChefError::StoreUnavailable(format!("failed to acquire memory store lock: {e}"))
}

fn not_found(id: &RecipeId) -> SousChefError {
    SousChefError::NotFound(format!("recipe {id}"))
}

impl StorageBackend for MemoryStorage {
    async fn upsert_profile(&self, user: UserId, profile: &UserProfile) -> Result<()> {
        self.profiles
            .write()
            .map_err(lock_err)?
            .insert(user, profile.clone());
        Ok(())
    }

    async fn get_profile(&self, user: UserId) -> Result<Option<UserProfile>> {
        Ok(self.profiles.read().map_err(lock_err)?.get(&user).cloned())
    }

    async fn delete_profile(&self, user: UserId) -> Result<bool> {
        Ok(self
            .profiles
            .write()
            .map_err(lock_err)?
            .remove(&user)
            .is_some())
    }

    async fn append_recipe(&self, user: UserId, document: &RecipeDocument) -> Result<RecipeId> {
        let id = RecipeId::new(Uuid::now_v7().to_string());
        self.recipes.write().map_err(lock_err)?.push(SavedRecipe {
            id: id.clone(),
            user_id: user,
            saved_at: Utc::now(),
            document: document.clone(),
        });
        Ok(id)
    }

    async fn list_recipes(&self, user: UserId) -> Result<Vec<SavedRecipe>> {
        Ok(self
            .recipes
            .read()
            .map_err(lock_err)?
            .iter()
            .filter(|r| r.user_id == user)
            .cloned()
            .collect())
    }

    async fn get_recipe(&self, user: UserId, id: &RecipeId) -> Result<SavedRecipe> {
        self.recipes
            .read()
            .map_err(lock_err)?
            .iter()
            .find(|r| r.user_id == user && &r.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn delete_recipe(&self, user: UserId, id: &RecipeId) -> Result<()> {
        let mut recipes = self.recipes.write().map_err(lock_err)?;
        let before = recipes.len();
        recipes.retain(|r| !(r.user_id == user && &r.id == id));
        if recipes.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}
