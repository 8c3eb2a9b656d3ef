// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Campaigns own sessions; sessions list entries. Entries carry their own membership set so that
//! global entries can be shared between sessions.

pub mod campaign;
pub mod entry;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod property;
pub mod session;
pub mod store;
pub mod tags;

pub use campaign::{Campaign, CampaignSettings};
pub use entry::{Entry, EntryType, ParseEntryTypeError};
pub use ids::{CampaignId, EntryId, Id, IdError, SessionId};
pub use property::{
    standard_module, template_for, validate_properties, Module, PropertyKind, PropertySpec,
    PropertyValue, PropertyValues, SchemaError, Template,
};
pub use session::Session;
pub use store::{InvariantViolation, Store};
pub use tags::Tags;
