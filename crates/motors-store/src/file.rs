//! File-backed session store
//!
//! Persists users and refresh tokens in a single JSON document. All writes
//! use atomic temp-file + rename to prevent corruption on crash. A tokio
//! Mutex serializes concurrent mutations from request handlers and the
//! background purge task; reads acquire the lock briefly to clone state.
//!
//! The file is the single source of truth. It contains password and
//! refresh-token hashes, so it is written with 0600 permissions.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::records::{NewUser, RefreshTokenRecord, UserRecord};
use crate::store::SessionStore;

/// On-disk document shape.
#[derive(Debug, Serialize, Deserialize)]
struct StoreData {
    #[serde(default = "first_user_id")]
    next_user_id: i64,
    #[serde(default)]
    users: Vec<UserRecord>,
    #[serde(default)]
    refresh_tokens: Vec<RefreshTokenRecord>,
}

fn first_user_id() -> i64 {
    1
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            next_user_id: first_user_id(),
            users: Vec::new(),
            refresh_tokens: Vec::new(),
        }
    }
}

/// Thread-safe JSON-file store.
pub struct FileStore {
    path: PathBuf,
    state: Mutex<StoreData>,
}

impl FileStore {
    /// Load the store from the given file path.
    ///
    /// If the file doesn't exist, creates it as an empty document (cold
    /// start with zero users).
    pub async fn load(path: PathBuf) -> Result<Self> {
        let state = if path.exists() {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| StoreError::Io(format!("reading store file: {e}")))?;
            let data: StoreData = serde_json::from_str(&contents)
                .map_err(|e| StoreError::Parse(format!("parsing store file: {e}")))?;
            info!(
                path = %path.display(),
                users = data.users.len(),
                refresh_tokens = data.refresh_tokens.len(),
                "loaded session store"
            );
            data
        } else {
            info!(path = %path.display(), "store file not found, starting empty");
            let data = StoreData::default();
            // Create the empty file so future loads don't need the cold-start path
            write_atomic(&path, &data).await?;
            data
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }
}

impl SessionStore for FileStore {
    fn find_user_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<UserRecord>>> + Send + 'a>>
    {
        Box::pin(async move {
            let state = self.state.lock().await;
            Ok(state.users.iter().find(|u| u.email == email).cloned())
        })
    }

    fn find_user_by_id(
        &self,
        id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Option<UserRecord>>> + Send + '_>>
    {
        Box::pin(async move {
            let state = self.state.lock().await;
            Ok(state.users.iter().find(|u| u.id == id).cloned())
        })
    }

    fn create_user(
        &self,
        new: NewUser,
    ) -> Pin<Box<dyn Future<Output = Result<UserRecord>> + Send + '_>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            if state.users.iter().any(|u| u.email == new.email) {
                return Err(StoreError::Conflict(format!(
                    "email {} already registered",
                    new.email
                )));
            }
            let record = UserRecord {
                id: state.next_user_id,
                email: new.email,
                password_hash: new.password_hash,
                role: new.role,
                created_at: Utc::now(),
            };
            state.next_user_id += 1;
            state.users.push(record.clone());
            debug!(user_id = record.id, "created user");
            write_atomic(&self.path, &state).await?;
            Ok(record)
        })
    }

    fn list_users(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<UserRecord>>> + Send + '_>>
    {
        Box::pin(async move {
            let state = self.state.lock().await;
            Ok(state.users.clone())
        })
    }

    fn insert_refresh_token(
        &self,
        record: RefreshTokenRecord,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            debug!(user_id = record.user_id, "stored refresh token");
            state.refresh_tokens.push(record);
            write_atomic(&self.path, &state).await
        })
    }

    fn refresh_tokens(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RefreshTokenRecord>>> + Send + '_>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            Ok(state.refresh_tokens.clone())
        })
    }

    fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Pin<Box<dyn Future<Output = Result<usize>> + Send + '_>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            let before = state.refresh_tokens.len();
            state.refresh_tokens.retain(|t| t.is_live(now));
            let removed = before - state.refresh_tokens.len();
            if removed > 0 {
                debug!(removed, "purged expired refresh tokens");
                write_atomic(&self.path, &state).await?;
            }
            Ok(removed)
        })
    }

    fn ping(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let _state = self.state.lock().await;
            Ok(())
        })
    }
}

/// Write the store document to a file atomically.
///
/// Writes to a temporary file in the same directory, then renames it over
/// the target. This prevents corruption if the process crashes mid-write.
/// Sets file permissions to 0600 (owner read/write only) since the file
/// contains credential hashes.
async fn write_atomic(path: &Path, data: &StoreData) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| StoreError::Parse(format!("serializing store: {e}")))?;

    let dir = path
        .parent()
        .ok_or_else(|| StoreError::Io("store path has no parent directory".into()))?;

    let tmp_path = dir.join(format!(".store.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| StoreError::Io(format!("writing temp store file: {e}")))?;

    // Set 0600 permissions (unix only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| StoreError::Io(format!("setting store file permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| StoreError::Io(format!("renaming temp store file: {e}")))?;

    debug!(path = %path.display(), "persisted session store");
    Ok(())
}
