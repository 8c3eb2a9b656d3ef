// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, Utc};

use super::campaign::{insert_unique, remove_all};
use super::ids::{CampaignId, EntryId, SessionId};
use super::tags::Tags;

/// A single play session inside a campaign.
///
/// `entry_ids` lists every entry considered "in" the session: the session's own local entries
/// plus any global entries imported into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    session_id: SessionId,
    campaign_id: CampaignId,
    title: String,
    date: DateTime<Utc>,
    description: String,
    tags: Tags,
    entry_ids: Vec<EntryId>,
}

impl Session {
    pub fn new(
        session_id: SessionId,
        campaign_id: CampaignId,
        title: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            campaign_id,
            title: title.into(),
            date,
            description: String::new(),
            tags: Tags::new(),
            entry_ids: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn campaign_id(&self) -> &CampaignId {
        &self.campaign_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.date = date;
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn set_tags(&mut self, tags: Tags) {
        self.tags = tags;
    }

    pub fn entry_ids(&self) -> &[EntryId] {
        &self.entry_ids
    }

    pub fn contains_entry(&self, entry_id: &EntryId) -> bool {
        self.entry_ids.contains(entry_id)
    }

    pub(crate) fn insert_entry_id(&mut self, entry_id: EntryId) -> bool {
        insert_unique(&mut self.entry_ids, entry_id)
    }

    pub(crate) fn remove_entry_id(&mut self, entry_id: &EntryId) -> bool {
        remove_all(&mut self.entry_ids, entry_id)
    }
}
