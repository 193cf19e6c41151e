use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::error::{Result, SousChefError};
use crate::model::*;

use super::StorageBackend;

/// `users` collection document: the profile keyed by the platform user id.
#[derive(Debug, Serialize, Deserialize)]
struct ProfileRecord {
    #[serde(rename = "_id")]
    user_id: UserId,
    #[serde(flatten)]
    profile: UserProfile,
}

/// `recipes` collection document: the three recipe sections at top level
/// plus the owner and save time.
#[derive(Debug, Serialize, Deserialize)]
struct RecipeRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_id: UserId,
    #[serde(default = "Utc::now")]
    saved_at: DateTime<Utc>,
    recipe: RecipeSection,
    nutritional_info: NutritionSection,
    recipe_facts: FactsSection,
}

impl RecipeRecord {
    fn new(user_id: UserId, document: &RecipeDocument) -> Self {
        let document = document.clone();
        Self {
            id: None,
            user_id,
            saved_at: Utc::now(),
            recipe: document.recipe,
            nutritional_info: document.nutritional_info,
            recipe_facts: document.recipe_facts,
        }
    }

    fn into_saved(self) -> Result<SavedRecipe> {
        let id = self
            .id
            .ok_or_else(|| SousChefError::StoreUnavailable("recipe record without _id".into()))?;
        Ok(SavedRecipe {
            id: RecipeId::new(id.to_hex()),
            user_id: self.user_id,
            saved_at: self.saved_at,
            document: RecipeDocument {
                recipe: self.recipe,
                nutritional_info: self.nutritional_info,
                recipe_facts: self.recipe_facts,
            },
        })
    }
}

/// MongoDB-backed storage (Atlas or self-hosted).
pub struct MongoStorage {
    users: Collection<ProfileRecord>,
    recipes: Collection<RecipeRecord>,
}

impl MongoStorage {
    /// Connect and `ping` so an unreachable cluster is detected at startup
    /// rather than on the first user message.
    pub async fn connect(uri: &str, config: &StorageConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(Duration::from_secs(10));
        options.app_name.get_or_insert_with(|| "souschef".to_string());

        let client = Client::with_options(options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| SousChefError::StoreUnavailable(format!("MongoDB ping failed: {e}")))?;

        let db = client.database(&config.database);
        tracing::info!(database = %config.database, "connected to MongoDB");

        Ok(Self {
            users: db.collection(&config.users_collection),
            recipes: db.collection(&config.recipes_collection),
        })
    }
}

/// Unparsable ids cannot name a stored recipe.
fn parse_id(id: &RecipeId) -> Result<ObjectId> {
    ObjectId::parse_str(id.as_str()).map_err(|_| SousChefError::NotFound(format!("recipe {id}")))
}

impl StorageBackend for MongoStorage {
    async fn upsert_profile(&self, user: UserId, profile: &UserProfile) -> Result<()> {
        let record = ProfileRecord {
            user_id: user,
            profile: profile.clone(),
        };
        self.users
            .replace_one(doc! { "_id": user }, &record)
            .upsert(true)
            .await?;
        tracing::info!(user, "saved preferences");
        Ok(())
    }

    async fn get_profile(&self, user: UserId) -> Result<Option<UserProfile>> {
        let record = self.users.find_one(doc! { "_id": user }).await?;
        Ok(record.map(|r| r.profile))
    }

    async fn delete_profile(&self, user: UserId) -> Result<bool> {
        let result = self.users.delete_one(doc! { "_id": user }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn append_recipe(&self, user: UserId, document: &RecipeDocument) -> Result<RecipeId> {
        let record = RecipeRecord::new(user, document);
        let result = self.recipes.insert_one(&record).await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            SousChefError::StoreUnavailable(format!(
                "unexpected inserted id: {}",
                result.inserted_id
            ))
        })?;
        tracing::info!(user, recipe = %id, "saved recipe");
        Ok(RecipeId::new(id.to_hex()))
    }

    async fn list_recipes(&self, user: UserId) -> Result<Vec<SavedRecipe>> {
        let records: Vec<RecipeRecord> = self
            .recipes
            .find(doc! { "user_id": user })
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        records.into_iter().map(RecipeRecord::into_saved).collect()
    }

    async fn get_recipe(&self, user: UserId, id: &RecipeId) -> Result<SavedRecipe> {
        let oid = parse_id(id)?;
        self.recipes
            .find_one(doc! { "_id": oid, "user_id": user })
            .await?
            .ok_or_else(|| SousChefError::NotFound(format!("recipe {id}")))?
            .into_saved()
    }

    async fn delete_recipe(&self, user: UserId, id: &RecipeId) -> Result<()> {
        let oid = parse_id(id)?;
        let result = self
            .recipes
            .delete_one(doc! { "_id": oid, "user_id": user })
            .await?;
        if result.deleted_count == 0 {
            return Err(SousChefError::NotFound(format!("recipe {id}")));
        }
        tracing::info!(user, recipe = %id, "deleted recipe");
        Ok(())
    }
}
