pub mod json_file;
pub mod memory;
pub mod seed;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::{Config, MEMORY_STORE};
use crate::entities::User;
use crate::error::AppResult;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Durable home of user records, bookings included.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn load_user(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// Replaces the stored record with the same id.
    async fn save_user(&self, user: &User) -> AppResult<()>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>>;

    /// Inserts a new record. Fails with `Conflict` when the name is taken.
    async fn create_user(&self, user: User) -> AppResult<User>;

    async fn list_users(&self) -> AppResult<Vec<User>>;
}

pub async fn connect(config: &Config) -> AppResult<Arc<dyn UserStore>> {
    if config.users_path == MEMORY_STORE {
        tracing::warn!("Using in-memory user store, accounts are lost on restart");
        return Ok(Arc::new(MemoryStore::default()));
    }

    let store = JsonFileStore::open(&config.users_path).await?;
    Ok(Arc::new(store))
}
