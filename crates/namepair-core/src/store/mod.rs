//! Transactional persistence for names, combinations, decisions and settings.
//!
//! A [`Store`] owns the authoritative [`StoreState`] and a [`Backend`] that
//! durably records it. Every mutation goes through [`Store::transaction`],
//! which works on a copy and only swaps it in after the backend accepted it,
//! so a failed operation leaves nothing behind.

mod json;
mod state;

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{NameId, ScoringGroup};

pub use json::JsonFileBackend;
pub use state::StoreState;

/// Durable home for a [`StoreState`] snapshot.
pub trait Backend: Send {
    /// Returns the persisted state, or `None` when nothing has been stored yet.
    fn load(&mut self) -> Result<Option<StoreState>, StoreError>;

    fn save(&mut self, state: &StoreState) -> Result<(), StoreError>;
}

/// Keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend;

impl Backend for MemoryBackend {
    fn load(&mut self) -> Result<Option<StoreState>, StoreError> {
        Ok(None)
    }

    fn save(&mut self, _state: &StoreState) -> Result<(), StoreError> {
        Ok(())
    }
}

pub struct Store {
    state: StoreState,
    backend: Box<dyn Backend>,
}

impl Store {
    /// Opens a store over `backend`, seeding defaults when it is empty.
    pub fn open(mut backend: Box<dyn Backend>) -> Result<Self, StoreError> {
        let state = match backend.load()? {
            Some(mut state) => {
                state.reindex()?;
                state
            }
            None => {
                let state = StoreState::seeded();
                backend.save(&state)?;
                state
            }
        };
        Ok(Self { state, backend })
    }

    pub fn in_memory() -> Self {
        Self {
            state: StoreState::seeded(),
            backend: Box::new(MemoryBackend),
        }
    }

    pub fn open_json(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open(Box::new(JsonFileBackend::new(path)))
    }

    /// Read-only view of the committed state.
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Runs `op` against a working copy; commits only if `op` succeeds and the
    /// backend saves the result.
    pub fn transaction<T, E>(
        &mut self,
        op: impl FnOnce(&mut StoreState) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut working = self.state.clone();
        let value = op(&mut working)?;
        self.backend.save(&working)?;
        self.state = working;
        Ok(value)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode or decode store snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to replace store file {path:?}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store snapshot is inconsistent: {0}")]
    Corrupt(String),
    #[error("name '{text}' already exists")]
    DuplicateName { text: String },
    #[error("combination {first}/{middle} already exists in group {group}")]
    DuplicateCombination {
        group: ScoringGroup,
        first: NameId,
        middle: NameId,
    },
    #[error("name {name} cannot be paired with itself")]
    SelfPairing { name: NameId },
    #[error("unknown name id {id}")]
    UnknownName { id: NameId },
    #[error("name text must not be empty")]
    EmptyName,
    #[error("invalid value '{value}' for {key}: {message}")]
    InvalidSetting {
        key: String,
        value: String,
        message: String,
    },
}
