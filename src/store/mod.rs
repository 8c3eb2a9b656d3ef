// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for the entity store and view state.
//!
//! The durable medium is an opaque string-keyed [`KeyValueStore`]; the [`PersistenceBridge`]
//! translates between the in-memory model and the JSON documents kept under two keys.

use std::fmt;
use std::io;
use std::path::PathBuf;

pub mod bridge;
pub mod kv;

pub use bridge::{document_schema, view_schema, PersistenceBridge, Snapshot};
pub use kv::{FileKv, KeyValueStore, MemoryKv, WriteDurability};

#[derive(Debug)]
pub enum StoreError {
    /// A custom key-value backend failed.
    Kv {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        key: String,
        source: serde_json::Error,
    },
    /// The payload parsed but does not describe a consistent store.
    CorruptState {
        key: String,
        reason: String,
    },
    SymlinkRefused {
        path: PathBuf,
    },
}

impl StoreError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Json { .. } | Self::CorruptState { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kv { key, source } => write!(f, "key-value error for {key:?}: {source}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { key, source } => write!(f, "json error in {key:?}: {source}"),
            Self::CorruptState { key, reason } => {
                write!(f, "corrupt state in {key:?}: {reason}")
            }
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Kv { source, .. } => Some(source.as_ref()),
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::CorruptState { .. } | Self::SymlinkRefused { .. } => None,
        }
    }
}
