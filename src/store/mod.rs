//! Persistence of mod metadata and settings.
//!
//! [`ModStore`] is the save/load collaborator used by
//! [`EditorSession`](crate::state::EditorSession); [`YamlModStore`] is the
//! on-disk implementation. [`ModReloader`] is the collaborator that recomputes
//! the active file mappings of an enabled mod.

pub mod reload;

pub use reload::{MappingReloader, ModReloader};

use crate::models::{ModMeta, ModSettings};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::{fs, io};
use thiserror::Error;

#[cfg(test)]
pub use reload::MockModReloader;

pub const META_FILE_NAME: &str = "meta.yaml";

pub const SETTINGS_FILE_NAME: &str = "settings.yaml";

/// Errors raised by persistence and reload collaborators
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid mod id: '{0}'")]
    InvalidModId(String),

    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Failed to serialize to YAML: {0}")]
    Serialize(#[from] serde_yaml_ng::Error),

    #[error("Failed to reload mod {mod_id}: {message}")]
    Reload { mod_id: String, message: String },
}

/// Loads and saves the meta and settings of a mod
#[cfg_attr(test, mockall::automock)]
pub trait ModStore {
    fn load_mod(&self, mod_id: &str) -> Result<(ModMeta, ModSettings), StoreError>;

    /// Write both stores of a mod. Must be safe to call repeatedly.
    fn save_mod(
        &mut self,
        mod_id: &str,
        meta: &ModMeta,
        settings: &ModSettings,
    ) -> Result<(), StoreError>;
}

/// YAML-backed store.
///
/// Each mod lives in its own directory below the root:
/// - `<root>/<mod_id>/meta.yaml`: groups, options, file swaps and mod info
/// - `<root>/<mod_id>/settings.yaml`: enabled flag, priority and selections
#[derive(Debug, Clone)]
pub struct YamlModStore {
    root: Utf8PathBuf,
}

impl YamlModStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub fn new<P: AsRef<Utf8Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();

        if !root.exists() {
            fs::create_dir_all(&root).map_err(|source| StoreError::Io {
                action: "create",
                path: root.clone(),
                source,
            })?;
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Directory of a mod. The id must be a single plain path component.
    pub fn mod_dir(&self, mod_id: &str) -> Result<Utf8PathBuf, StoreError> {
        let valid = !mod_id.trim().is_empty()
            && mod_id != "."
            && mod_id != ".."
            && !mod_id.contains(['/', '\\', ':']);
        if !valid {
            return Err(StoreError::InvalidModId(mod_id.to_string()));
        }
        Ok(self.root.join(mod_id))
    }

    /// Ids of all mod directories below the root, sorted
    pub fn list_mods(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            action: "list",
            path: self.root.clone(),
            source,
        })?;

        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        ids.sort();
        Ok(ids)
    }

    pub fn load_meta(&self, mod_id: &str) -> Result<ModMeta, StoreError> {
        let path = self.mod_dir(mod_id)?.join(META_FILE_NAME);
        read_yaml(&path)
    }

    pub fn load_settings(&self, mod_id: &str) -> Result<ModSettings, StoreError> {
        let path = self.mod_dir(mod_id)?.join(SETTINGS_FILE_NAME);
        read_yaml(&path)
    }

    pub fn save_meta(&self, mod_id: &str, meta: &ModMeta) -> Result<(), StoreError> {
        let path = self.ensure_mod_dir(mod_id)?.join(META_FILE_NAME);
        write_yaml(&path, meta)
    }

    pub fn save_settings(&self, mod_id: &str, settings: &ModSettings) -> Result<(), StoreError> {
        let path = self.ensure_mod_dir(mod_id)?.join(SETTINGS_FILE_NAME);
        write_yaml(&path, settings)
    }

    fn ensure_mod_dir(&self, mod_id: &str) -> Result<Utf8PathBuf, StoreError> {
        let dir = self.mod_dir(mod_id)?;
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
                action: "create",
                path: dir.clone(),
                source,
            })?;
        }
        Ok(dir)
    }
}

impl ModStore for YamlModStore {
    fn load_mod(&self, mod_id: &str) -> Result<(ModMeta, ModSettings), StoreError> {
        Ok((self.load_meta(mod_id)?, self.load_settings(mod_id)?))
    }

    fn save_mod(
        &mut self,
        mod_id: &str,
        meta: &ModMeta,
        settings: &ModSettings,
    ) -> Result<(), StoreError> {
        self.save_meta(mod_id, meta)?;
        self.save_settings(mod_id, settings)
    }
}

/// Read a YAML file, falling back to the type's default when it is missing
fn read_yaml<T: DeserializeOwned + Default>(path: &Utf8Path) -> Result<T, StoreError> {
    if !path.exists() {
        tracing::warn!("{} not found, using defaults", path);
        return Ok(T::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;

    let value = serde_yaml_ng::from_str(&contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Loaded {}", path);
    Ok(value)
}

fn write_yaml<T: Serialize>(path: &Utf8Path, value: &T) -> Result<(), StoreError> {
    let yaml = serde_yaml_ng::to_string(value)?;

    fs::write(path, yaml).map_err(|source| StoreError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Saved {}", path);
    Ok(())
}
