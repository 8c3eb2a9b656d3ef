// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use indexmap::IndexMap;

use super::campaign::Campaign;
use super::entry::Entry;
use super::ids::{CampaignId, EntryId, SessionId};
use super::session::Session;

/// Single source of truth for campaigns, sessions and entries.
///
/// Collections keep insertion order so that the visibility resolver can break timestamp ties
/// deterministically. The store is only mutated through [`crate::ops::apply_ops`], which works
/// on a clone and swaps it in once the whole batch succeeded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    campaigns: IndexMap<CampaignId, Campaign>,
    sessions: IndexMap<SessionId, Session>,
    entries: IndexMap<EntryId, Entry>,
    active_campaign_id: Option<CampaignId>,
    active_session_id: Option<SessionId>,
    rev: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn campaigns(&self) -> &IndexMap<CampaignId, Campaign> {
        &self.campaigns
    }

    pub(crate) fn campaigns_mut(&mut self) -> &mut IndexMap<CampaignId, Campaign> {
        &mut self.campaigns
    }

    pub fn sessions(&self) -> &IndexMap<SessionId, Session> {
        &self.sessions
    }

    pub(crate) fn sessions_mut(&mut self) -> &mut IndexMap<SessionId, Session> {
        &mut self.sessions
    }

    pub fn entries(&self) -> &IndexMap<EntryId, Entry> {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut IndexMap<EntryId, Entry> {
        &mut self.entries
    }

    pub fn campaign(&self, campaign_id: &CampaignId) -> Option<&Campaign> {
        self.campaigns.get(campaign_id)
    }

    pub fn session(&self, session_id: &SessionId) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    pub fn entry(&self, entry_id: &EntryId) -> Option<&Entry> {
        self.entries.get(entry_id)
    }

    /// Sessions of `campaign_id` in the campaign's own order.
    pub fn campaign_sessions<'a>(
        &'a self,
        campaign_id: &CampaignId,
    ) -> impl Iterator<Item = &'a Session> + 'a {
        self.campaigns
            .get(campaign_id)
            .map(|c| c.session_ids())
            .unwrap_or_default()
            .iter()
            .filter_map(|session_id| self.sessions.get(session_id))
    }

    pub fn active_campaign_id(&self) -> Option<&CampaignId> {
        self.active_campaign_id.as_ref()
    }

    pub(crate) fn set_active_campaign_id(&mut self, campaign_id: Option<CampaignId>) {
        self.active_campaign_id = campaign_id;
    }

    pub fn active_session_id(&self) -> Option<&SessionId> {
        self.active_session_id.as_ref()
    }

    pub(crate) fn set_active_session_id(&mut self, session_id: Option<SessionId>) {
        self.active_session_id = session_id;
    }

    pub fn is_session_active(&self, session_id: &SessionId) -> bool {
        self.active_session_id.as_ref() == Some(session_id)
    }

    pub fn is_campaign_active(&self, campaign_id: &CampaignId) -> bool {
        self.active_campaign_id.as_ref() == Some(campaign_id)
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub(crate) fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }

    pub(crate) fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty() && self.sessions.is_empty() && self.entries.is_empty()
    }

    /// Verifies every cross-reference between campaigns, sessions and entries.
    ///
    /// Returns the first violation found. A store produced by `apply_ops` always passes; the
    /// persistence bridge runs this on every load.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for (campaign_id, campaign) in &self.campaigns {
            if campaign.campaign_id() != campaign_id {
                return Err(InvariantViolation::KeyMismatch {
                    key: campaign_id.to_string(),
                });
            }
            for (index, session_id) in campaign.session_ids().iter().enumerate() {
                if campaign.session_ids()[..index].contains(session_id) {
                    return Err(InvariantViolation::DuplicateSessionInCampaign {
                        campaign_id: campaign_id.clone(),
                        session_id: session_id.clone(),
                    });
                }
                match self.sessions.get(session_id) {
                    Some(session) if session.campaign_id() == campaign_id => {}
                    _ => {
                        return Err(InvariantViolation::DanglingSessionInCampaign {
                            campaign_id: campaign_id.clone(),
                            session_id: session_id.clone(),
                        });
                    }
                }
            }
        }

        for (session_id, session) in &self.sessions {
            if session.session_id() != session_id {
                return Err(InvariantViolation::KeyMismatch {
                    key: session_id.to_string(),
                });
            }
            let listed = self
                .campaigns
                .get(session.campaign_id())
                .is_some_and(|c| c.session_ids().contains(session_id));
            if !listed {
                return Err(InvariantViolation::UnlistedSession {
                    session_id: session_id.clone(),
                });
            }
            for (index, entry_id) in session.entry_ids().iter().enumerate() {
                if session.entry_ids()[..index].contains(entry_id) {
                    return Err(InvariantViolation::DuplicateEntryInSession {
                        session_id: session_id.clone(),
                        entry_id: entry_id.clone(),
                    });
                }
                let member = self
                    .entries
                    .get(entry_id)
                    .is_some_and(|e| e.in_session(session_id));
                if !member {
                    return Err(InvariantViolation::DanglingEntryInSession {
                        session_id: session_id.clone(),
                        entry_id: entry_id.clone(),
                    });
                }
            }
        }

        for (entry_id, entry) in &self.entries {
            if entry.entry_id() != entry_id {
                return Err(InvariantViolation::KeyMismatch {
                    key: entry_id.to_string(),
                });
            }
            if !entry.is_global() && entry.session_ids().len() != 1 {
                return Err(InvariantViolation::LocalEntryMembership {
                    entry_id: entry_id.clone(),
                    sessions: entry.session_ids().len(),
                });
            }
            for (index, session_id) in entry.session_ids().iter().enumerate() {
                if entry.session_ids()[..index].contains(session_id) {
                    return Err(InvariantViolation::DuplicateSessionInEntry {
                        entry_id: entry_id.clone(),
                        session_id: session_id.clone(),
                    });
                }
                let listed = self
                    .sessions
                    .get(session_id)
                    .is_some_and(|s| s.contains_entry(entry_id));
                if !listed {
                    return Err(InvariantViolation::UnlistedEntry {
                        entry_id: entry_id.clone(),
                        session_id: session_id.clone(),
                    });
                }
            }
        }

        if let Some(session_id) = &self.active_session_id {
            let Some(session) = self.sessions.get(session_id) else {
                return Err(InvariantViolation::DanglingActiveSession {
                    session_id: session_id.clone(),
                });
            };
            if self.active_campaign_id.as_ref() != Some(session.campaign_id()) {
                return Err(InvariantViolation::ActiveSessionOutsideActiveCampaign {
                    session_id: session_id.clone(),
                });
            }
        }
        if let Some(campaign_id) = &self.active_campaign_id {
            if !self.campaigns.contains_key(campaign_id) {
                return Err(InvariantViolation::DanglingActiveCampaign {
                    campaign_id: campaign_id.clone(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    KeyMismatch {
        key: String,
    },
    DuplicateSessionInCampaign {
        campaign_id: CampaignId,
        session_id: SessionId,
    },
    DanglingSessionInCampaign {
        campaign_id: CampaignId,
        session_id: SessionId,
    },
    UnlistedSession {
        session_id: SessionId,
    },
    DuplicateEntryInSession {
        session_id: SessionId,
        entry_id: EntryId,
    },
    DanglingEntryInSession {
        session_id: SessionId,
        entry_id: EntryId,
    },
    LocalEntryMembership {
        entry_id: EntryId,
        sessions: usize,
    },
    DuplicateSessionInEntry {
        entry_id: EntryId,
        session_id: SessionId,
    },
    UnlistedEntry {
        entry_id: EntryId,
        session_id: SessionId,
    },
    DanglingActiveSession {
        session_id: SessionId,
    },
    ActiveSessionOutsideActiveCampaign {
        session_id: SessionId,
    },
    DanglingActiveCampaign {
        campaign_id: CampaignId,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyMismatch { key } => write!(f, "entity stored under foreign key {key}"),
            Self::DuplicateSessionInCampaign {
                campaign_id,
                session_id,
            } => write!(f, "campaign {campaign_id} lists session {session_id} twice"),
            Self::DanglingSessionInCampaign {
                campaign_id,
                session_id,
            } => write!(
                f,
                "campaign {campaign_id} lists session {session_id}, which does not belong to it"
            ),
            Self::UnlistedSession { session_id } => {
                write!(f, "session {session_id} is not listed by its campaign")
            }
            Self::DuplicateEntryInSession {
                session_id,
                entry_id,
            } => write!(f, "session {session_id} lists entry {entry_id} twice"),
            Self::DanglingEntryInSession {
                session_id,
                entry_id,
            } => write!(
                f,
                "session {session_id} lists entry {entry_id}, which is not a member"
            ),
            Self::LocalEntryMembership { entry_id, sessions } => write!(
                f,
                "local entry {entry_id} belongs to {sessions} sessions (expected exactly 1)"
            ),
            Self::DuplicateSessionInEntry {
                entry_id,
                session_id,
            } => write!(f, "entry {entry_id} lists session {session_id} twice"),
            Self::UnlistedEntry {
                entry_id,
                session_id,
            } => write!(
                f,
                "entry {entry_id} claims session {session_id}, which does not list it"
            ),
            Self::DanglingActiveSession { session_id } => {
                write!(f, "active session {session_id} does not exist")
            }
            Self::ActiveSessionOutsideActiveCampaign { session_id } => write!(
                f,
                "active session {session_id} does not belong to the active campaign"
            ),
            Self::DanglingActiveCampaign { campaign_id } => {
                write!(f, "active campaign {campaign_id} does not exist")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}
