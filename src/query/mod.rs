// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over the store.
//!
//! Queries provide derived views (visible entries, statistics) that power the UI; none of them
//! mutate the store or read the wall clock.

pub mod stats;
pub mod visibility;

pub use stats::{app_stats, campaign_stats, session_stats, AppStats, CampaignStats, SessionStats};
pub use visibility::{
    importable_entries, visible_entries, EntryFilter, ParseEntryFilterError, ParseSortOrderError,
    Scope, SortOrder, ViewContext,
};
