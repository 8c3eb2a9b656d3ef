// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lorekeep: campaign, session and entry store for tabletop RPG notes.
//!
//! The [`model`] holds the entity graph, [`ops`] mutates it in atomic batches, [`query`] derives
//! visible entry lists and statistics, and [`store`] persists it through a key-value medium.
//! [`workspace::Workspace`] ties these together behind a single dispatch entry point.

pub mod config;
pub mod model;
pub mod ops;
pub mod query;
pub mod store;
pub mod view;
pub mod workspace;

pub use config::{Config, ConfigError};
pub use workspace::{Clock, DispatchOutcome, Intent, SystemClock, Workspace, WorkspaceError};
