//! Persisted install state
//!
//! The whole table is read at the start of a resolve and written back in
//! full at the end, success or failure, so partial progress (dependencies
//! installed, target failed) survives a crash.

use crate::core::{catalog, PipelineError, ToolSpec};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The persisted `name -> ToolSpec` table. BTreeMap keeps iteration order
/// deterministic, which `resolve("all")` relies on.
pub type InstallState = BTreeMap<String, ToolSpec>;

/// Trait for install-state backends
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the full table, seeding from the built-in catalog on first use
    async fn load(&self) -> Result<InstallState, PipelineError>;

    /// Write the full table back
    async fn save(&self, state: &InstallState) -> Result<(), PipelineError>;
}

/// JSON-file store at a fixed per-user location
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Create a store at `<cache dir>/reconpipe/tools.json`
    pub fn with_default_path() -> Result<Self, PipelineError> {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reconpipe");

        std::fs::create_dir_all(&cache_dir).map_err(|e| PipelineError::Persistence {
            path: cache_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self::new(cache_dir.join("tools.json")))
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self) -> Result<InstallState, PipelineError> {
        if !self.path.exists() {
            debug!("no install state at {}, seeding from catalog", self.path.display());
            return Ok(catalog::bootstrap());
        }

        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            PipelineError::Persistence {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        // A corrupted table must fail the resolve rather than silently
        // continue with an empty one.
        let mut state: InstallState =
            serde_json::from_str(&content).map_err(|e| PipelineError::Persistence {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        // Tools added to the catalog since the state was last written still
        // show up; persisted entries win otherwise.
        for (name, spec) in catalog::bootstrap() {
            state.entry(name).or_insert(spec);
        }

        Ok(state)
    }

    async fn save(&self, state: &InstallState) -> Result<(), PipelineError> {
        let json = serde_json::to_string_pretty(state).map_err(|e| PipelineError::Persistence {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        tokio::fs::write(&self.path, json).await.map_err(|e| PipelineError::Persistence {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// In-memory store (for testing or ephemeral use)
pub struct InMemoryStateStore {
    state: tokio::sync::RwLock<InstallState>,
}

impl InMemoryStateStore {
    /// Start from the built-in catalog
    pub fn new() -> Self {
        Self::seeded(catalog::bootstrap())
    }

    /// Start from a caller-supplied table
    pub fn seeded(state: InstallState) -> Self {
        Self { state: tokio::sync::RwLock::new(state) }
    }

    /// Snapshot the current table
    pub async fn snapshot(&self) -> InstallState {
        self.state.read().await.clone()
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self) -> Result<InstallState, PipelineError> {
        Ok(self.state.read().await.clone())
    }

    async fn save(&self, state: &InstallState) -> Result<(), PipelineError> {
        *self.state.write().await = state.clone();
        Ok(())
    }
}
