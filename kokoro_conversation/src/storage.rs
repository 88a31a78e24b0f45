//! Local disk snapshots for the store and the auth flag.
//!
//! State is persisted replace-on-write as versioned JSON under fixed keys.
//! The version tag is future-proofing only; there is no migration logic.

use anyhow::Context;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::store::ConversationStore;

const CHAT_STORAGE_KEY: &str = "chat-storage.json";
const AUTH_STORAGE_KEY: &str = "auth-storage.json";
const STORAGE_VERSION: u32 = 1;

/// Versioned envelope around a persisted state blob.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<T> {
    version: u32,
    state: T,
}

/// Persisted authentication flag with the client's mock credential check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub username: Option<String>,
}

impl AuthState {
    /// Mock authentication; succeeds only for the built-in account.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        if username == "aipsycho" && password == "Test1234" {
            self.is_authenticated = true;
            self.username = Some(username.to_string());
            true
        } else {
            false
        }
    }

    pub fn logout(&mut self) {
        self.is_authenticated = false;
        self.username = None;
    }
}

/// File-backed storage for the conversation store and auth flag.
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Open storage under `~/kokoro`, creating the directory if needed.
    pub fn open_default() -> anyhow::Result<Self> {
        let dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("kokoro");
        std::fs::create_dir_all(&dir)?;
        Ok(Self::new(dir))
    }

    pub fn load_store(&self) -> anyhow::Result<ConversationStore> {
        self.load(CHAT_STORAGE_KEY)
    }

    pub fn save_store(&self, store: &ConversationStore) -> anyhow::Result<()> {
        self.save(CHAT_STORAGE_KEY, store)
    }

    pub fn load_auth(&self) -> anyhow::Result<AuthState> {
        self.load(AUTH_STORAGE_KEY)
    }

    pub fn save_auth(&self, auth: &AuthState) -> anyhow::Result<()> {
        self.save(AUTH_STORAGE_KEY, auth)
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a snapshot, defaulting when the file does not exist yet.
    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> anyhow::Result<T> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(T::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read state from {}", path.display()))?;
        let snapshot: Snapshot<T> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to deserialize {}", path.display()))?;

        Ok(snapshot.state)
    }

    fn save<T: Serialize>(&self, key: &str, state: &T) -> anyhow::Result<()> {
        let snapshot = Snapshot {
            version: STORAGE_VERSION,
            state,
        };
        let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize state")?;

        let path = self.path_for(key);
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write state to {}", path.display()))?;

        info!("Saved {key}");
        Ok(())
    }
}
