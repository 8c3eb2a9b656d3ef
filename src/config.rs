// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Workspace configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::query::{EntryFilter, SortOrder};
use crate::store::WriteDurability;

pub const DEFAULT_STORE_KEY: &str = "lorekeep.store";
pub const DEFAULT_VIEW_KEY: &str = "lorekeep.view";
pub const DEFAULT_DATA_DIR: &str = "lorekeep_data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    /// Key of the campaigns/sessions/entries document.
    pub store_key: String,
    /// Key of the persisted UI state.
    pub view_key: String,
    /// Directory used by the file-backed key-value store.
    pub data_dir: PathBuf,
    pub durability: WriteDurability,
    pub default_sort: SortOrder,
    pub default_filter: EntryFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_key: DEFAULT_STORE_KEY.to_owned(),
            view_key: DEFAULT_VIEW_KEY.to_owned(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            durability: WriteDurability::default(),
            default_sort: SortOrder::default(),
            default_filter: EntryFilter::default(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, key) in [("storeKey", &self.store_key), ("viewKey", &self.view_key)] {
            if key.trim().is_empty() {
                return Err(ConfigError::EmptyKey { field });
            }
        }
        if self.store_key == self.view_key {
            return Err(ConfigError::KeyCollision {
                key: self.store_key.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Json(serde_json::Error),
    EmptyKey { field: &'static str },
    KeyCollision { key: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read config at {path:?}: {source}"),
            Self::Json(source) => write!(f, "invalid config: {source}"),
            Self::EmptyKey { field } => write!(f, "config field {field} must not be empty"),
            Self::KeyCollision { key } => {
                write!(f, "storeKey and viewKey must differ (both are {key:?})")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(source) => Some(source),
            Self::EmptyKey { .. } | Self::KeyCollision { .. } => None,
        }
    }
}
