use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::UserStore;
use crate::entities::User;
use crate::error::{AppError, AppResult};

/// Keeps every user in one JSON array, rewritten in full on each change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store, creating the parent directory and an empty file if needed.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        };

        match fs::metadata(&store.path).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(dir) = store.path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    fs::create_dir_all(dir).await?;
                }
                store.write_all(&[]).await?;
                tracing::info!("Created user store at {}", store.path.display());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(store)
    }

    async fn read_all(&self) -> AppResult<Vec<User>> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, users: &[User]) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(users)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    async fn load_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let _guard = self.lock.lock().await;
        let users = self.read_all().await?;
        Ok(users.into_iter().find(|u| u.user_id == user_id))
    }

    async fn save_user(&self, user: &User) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut users = self.read_all().await?;
        let slot = users
            .iter_mut()
            .find(|u| u.user_id == user.user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        *slot = user.clone();
        self.write_all(&users).await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        let _guard = self.lock.lock().await;
        let users = self.read_all().await?;
        Ok(users.into_iter().find(|u| u.name == name))
    }

    async fn create_user(&self, user: User) -> AppResult<User> {
        let _guard = self.lock.lock().await;
        let mut users = self.read_all().await?;
        if users.iter().any(|u| u.name == user.name) {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        users.push(user.clone());
        self.write_all(&users).await?;
        Ok(user)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }
}
