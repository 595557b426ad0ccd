// src/identity.rs

//! A one-key persistent store for the client's opaque user identifier.
//!
//! The file is a small JSON object so unrelated keys written by other tools
//! survive a rewrite. The identifier is a random UUID v4 and is not a
//! credential.

use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use stockroom_core::USER_ID_KEY;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum IdentityError {
  #[error("Could not access identity file {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Identity file {} is not a JSON object: {source}", .path.display())]
  Corrupt {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Debug, Clone)]
pub struct IdentityStore {
  path: PathBuf,
}

impl IdentityStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// `$XDG_CONFIG_HOME/stockroom/identity.json`, falling back to
  /// `$HOME/.config/stockroom/identity.json`.
  pub fn default_path() -> Option<PathBuf> {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
      .filter(|v| !v.is_empty())
      .map(PathBuf::from)
      .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config_dir.join("stockroom").join("identity.json"))
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// The stored identifier, if one has been saved.
  pub fn load(&self) -> Result<Option<String>, IdentityError> {
    let entries = self.read_entries()?;
    Ok(match entries.get(USER_ID_KEY) {
      Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
      _ => None,
    })
  }

  /// Returns the stored identifier, generating and saving one first if needed.
  pub fn load_or_create(&self) -> Result<String, IdentityError> {
    if let Some(id) = self.load()? {
      return Ok(id);
    }
    let id = Uuid::new_v4().to_string();
    let mut entries = self.read_entries()?;
    entries.insert(USER_ID_KEY.to_string(), Value::String(id.clone()));
    self.write_entries(&entries)?;
    info!(path = %self.path.display(), "Generated a new client identifier.");
    Ok(id)
  }

  fn read_entries(&self) -> Result<Map<String, Value>, IdentityError> {
    let raw = match fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
      Err(source) => return Err(self.io_error(source)),
    };
    if raw.trim().is_empty() {
      return Ok(Map::new());
    }
    serde_json::from_str(&raw).map_err(|source| IdentityError::Corrupt {
      path: self.path.clone(),
      source,
    })
  }

  fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), IdentityError> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
    }
    let body = serde_json::to_string_pretty(entries).map_err(|source| IdentityError::Corrupt {
      path: self.path.clone(),
      source,
    })?;
    fs::write(&self.path, body).map_err(|e| self.io_error(e))
  }

  fn io_error(&self, source: io::Error) -> IdentityError {
    IdentityError::Io {
      path: self.path.clone(),
      source,
    }
  }
}
