// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::model::{CampaignId, EntryId, EntryType, SessionId, Store};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CampaignStats {
    pub total_sessions: usize,
    /// Distinct entries across the campaign's sessions; an imported global entry counts once.
    pub total_entries: usize,
    pub entry_type_breakdown: BTreeMap<EntryType, usize>,
    /// Most recent session date at or before `now`.
    pub last_played: Option<DateTime<Utc>>,
    /// Earliest session date after `now`.
    pub next_session: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub total_entries: usize,
    pub entry_types: BTreeMap<EntryType, usize>,
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppStats {
    pub total_campaigns: usize,
    pub total_sessions: usize,
    pub total_entries: usize,
    pub global_entries: usize,
}

/// Returns `None` when the campaign does not exist.
pub fn campaign_stats(
    store: &Store,
    campaign_id: &CampaignId,
    now: DateTime<Utc>,
) -> Option<CampaignStats> {
    store.campaign(campaign_id)?;

    let mut stats = CampaignStats::default();
    let mut seen = BTreeSet::<&EntryId>::new();
    for session in store.campaign_sessions(campaign_id) {
        stats.total_sessions += 1;

        let date = session.date();
        if date <= now {
            stats.last_played = stats.last_played.max(Some(date));
        } else {
            stats.next_session = Some(stats.next_session.map_or(date, |next| next.min(date)));
        }

        for entry_id in session.entry_ids() {
            if !seen.insert(entry_id) {
                continue;
            }
            if let Some(entry) = store.entry(entry_id) {
                *stats
                    .entry_type_breakdown
                    .entry(entry.entry_type())
                    .or_default() += 1;
            }
        }
    }
    stats.total_entries = seen.len();
    Some(stats)
}

/// Returns `None` when the session does not exist.
pub fn session_stats(store: &Store, session_id: &SessionId) -> Option<SessionStats> {
    let session = store.session(session_id)?;

    let mut stats = SessionStats::default();
    for entry in session
        .entry_ids()
        .iter()
        .filter_map(|entry_id| store.entry(entry_id))
    {
        stats.total_entries += 1;
        *stats.entry_types.entry(entry.entry_type()).or_default() += 1;
        stats.last_modified = stats.last_modified.max(Some(entry.updated()));
    }
    Some(stats)
}

pub fn app_stats(store: &Store) -> AppStats {
    AppStats {
        total_campaigns: store.campaigns().len(),
        total_sessions: store.sessions().len(),
        total_entries: store.entries().len(),
        global_entries: store.entries().values().filter(|e| e.is_global()).count(),
    }
}
