// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Session record and persistence
//!
//! The authenticated user and bearer token are the only state that
//! survives a restart. Persistence sits behind [`SessionStorage`] so
//! tests can swap the config-dir JSON file for an in-memory slot.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

use tf_api_contract::User;

/// Authenticated identity plus its bearer credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Session persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored session is not readable: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

/// Pluggable persistence for the session record
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Session>, StoreError>;
    fn save(&self, session: &Session) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Session record stored as JSON under the platform config directory
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<config-dir>/taskflow/session.json`
    pub fn in_default_location() -> Result<Self, StoreError> {
        let base = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::new(base.join("taskflow").join("session.json")))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&raw)?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<Session>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.slot.lock().expect("session slot poisoned").clone())
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        *self.slot.lock().expect("session slot poisoned") = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().expect("session slot poisoned") = None;
        Ok(())
    }
}
