mod backend;
mod memory;
mod mongo;

pub use backend::StorageBackend;
pub use memory::MemoryStorage;
pub use mongo::MongoStorage;

use crate::config::SousChefConfig;
use crate::error::Result;
use crate::model::*;

/// Enum wrapper for storage backends. Dispatches to the concrete implementation.
/// Using an enum instead of `Box<dyn StorageBackend>` because the trait uses RPITIT.
pub enum Storage {
    Mongo(MongoStorage),
    Memory(MemoryStorage),
}

impl StorageBackend for Storage {
    async fn upsert_profile(&self, user: UserId, profile: &UserProfile) -> Result<()> {
        match self {
            Storage::Mongo(s) => s.upsert_profile(user, profile).await,
            Storage::Memory(s) => s.upsert_profile(user, profile).await,
        }
    }

    async fn get_profile(&self, user: UserId) -> Result<Option<UserProfile>> {
        match self {
            Storage::Mongo(s) => s.get_profile(user).await,
            Storage::Memory(s) => s.get_profile(user).await,
        }
    }

    async fn delete_profile(&self, user: UserId) -> Result<bool> {
        match self {
            Storage::Mongo(s) => s.delete_profile(user).await,
            Storage::Memory(s) => s.delete_profile(user).await,
        }
    }

    async fn append_recipe(&self, user: UserId, document: &RecipeDocument) -> Result<RecipeId> {
        match self {
            Storage::Mongo(s) => s.append_recipe(user, document).await,
            Storage::Memory(s) => s.append_recipe(user, document).await,
        }
    }

    async fn list_recipes(&self, user: UserId) -> Result<Vec<SavedRecipe>> {
        match self {
            Storage::Mongo(s) => s.list_recipes(user).await,
            Storage::Memory(s) => s.list_recipes(user).await,
        }
    }

    async fn get_recipe(&self, user: UserId, id: &RecipeId) -> Result<SavedRecipe> {
        match self {
            Storage::Mongo(s) => s.get_recipe(user, id).await,
            Storage::Memory(s) => s.get_recipe(user, id).await,
        }
    }

    async fn delete_recipe(&self, user: UserId, id: &RecipeId) -> Result<()> {
        match self {
            Storage::Mongo(s) => s.delete_recipe(user, id).await,
            Storage::Memory(s) => s.delete_recipe(user, id).await,
        }
    }
}

impl Storage {
    /// Short backend name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Storage::Mongo(_) => "mongo",
            Storage::Memory(_) => "memory",
        }
    }
}

/// Create a storage backend from the given configuration.
///
/// Never fails: a missing connection string or an unreachable cluster falls
/// back to process memory so the bot keeps working for the session.
pub async fn create_backend(config: &SousChefConfig) -> Storage {
    if config.storage.backend == "memory" {
        tracing::info!("using in-memory storage");
        return Storage::Memory(MemoryStorage::new());
    }

    let Some(uri) = config.mongo_uri() else {
        tracing::warn!(
            "no MongoDB connection string (set storage.uri, {} or {}); using in-memory storage",
            config.storage.uri_env_var,
            config.storage.password_env_var
        );
        return Storage::Memory(MemoryStorage::new());
    };

    match MongoStorage::connect(&uri, &config.storage).await {
        Ok(storage) => Storage::Mongo(storage),
        Err(e) => {
            tracing::error!("failed to connect to MongoDB: {e}; using in-memory storage");
            Storage::Memory(MemoryStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_when_configured() {
        let mut config = SousChefConfig::default();
        config.storage.backend = "memory".into();
        let storage = create_backend(&config).await;
        assert_eq!(storage.kind(), "memory");
    }

    #[tokio::test]
    async fn memory_backend_when_no_uri() {
        let mut config = SousChefConfig::default();
        config.storage.uri_env_var = "SOUSCHEF_TEST_NO_SUCH_URI".into();
        config.storage.password_env_var = "SOUSCHEF_TEST_NO_SUCH_PASSWORD".into();
        let storage = create_backend(&config).await;
        assert_eq!(storage.kind(), "memory");
    }

    #[tokio::test]
    async fn enum_dispatches_to_memory() {
        let storage = Storage::Memory(MemoryStorage::new());
        let profile = UserProfile {
            allergies: Some("shellfish".into()),
            ..Default::default()
        };
        storage.upsert_profile(5, &profile).await.unwrap();
        assert_eq!(storage.get_profile(5).await.unwrap(), Some(profile));
    }
}
