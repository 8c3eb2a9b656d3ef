// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, Utc};

use super::ids::{CampaignId, SessionId};
use super::tags::Tags;

/// Optional world settings shown on the campaign overview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignSettings {
    pub world_name: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub theme: Option<String>,
}

/// Top-level container; owns an ordered list of sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    campaign_id: CampaignId,
    title: String,
    description: String,
    tags: Tags,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    session_ids: Vec<SessionId>,
    settings: CampaignSettings,
}

impl Campaign {
    pub fn new(campaign_id: CampaignId, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            campaign_id,
            title: title.into(),
            description: String::new(),
            tags: Tags::new(),
            created: now,
            updated: now,
            session_ids: Vec::new(),
            settings: CampaignSettings::default(),
        }
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

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated = now;
    }

    pub(crate) fn set_timestamps(&mut self, created: DateTime<Utc>, updated: DateTime<Utc>) {
        self.created = created;
        self.updated = updated;
    }

    pub fn session_ids(&self) -> &[SessionId] {
        &self.session_ids
    }

    /// Appends `session_id` unless it is already listed.
    pub(crate) fn insert_session_id(&mut self, session_id: SessionId) -> bool {
        insert_unique(&mut self.session_ids, session_id)
    }

    pub(crate) fn remove_session_id(&mut self, session_id: &SessionId) -> bool {
        remove_all(&mut self.session_ids, session_id)
    }

    pub fn settings(&self) -> &CampaignSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: CampaignSettings) {
        self.settings = settings;
    }
}

/// Set-union insert into an ordered id list. Returns `true` if the list changed.
pub(crate) fn insert_unique<T: PartialEq>(list: &mut Vec<T>, value: T) -> bool {
    if list.contains(&value) {
        return false;
    }
    list.push(value);
    true
}

/// Removes every occurrence of `value`. Returns `true` if the list changed.
pub(crate) fn remove_all<T: PartialEq>(list: &mut Vec<T>, value: &T) -> bool {
    let before = list.len();
    list.retain(|v| v != value);
    list.len() != before
}
