// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Explicit handle over the store, the view state and the durable medium.
//!
//! Every [`Intent`] is applied synchronously: ops run against a copy of the store, the result is
//! written through to the key-value medium, and only then does the handle swap in the new state.
//! A failed apply or a failed write leaves the handle exactly as it was.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::model::{CampaignId, Entry, EntryId, SessionId, Store};
use crate::ops::{
    apply_ops, ActiveOp, ApplyError, ApplyResult, CampaignDraft, CampaignOp, EntryDraft, EntryOp,
    Op, SessionDraft, SessionOp,
};
use crate::query::{
    campaign_stats, importable_entries, session_stats, visible_entries, CampaignStats,
    EntryFilter, SessionStats, SortOrder,
};
use crate::store::{FileKv, KeyValueStore, PersistenceBridge, Snapshot, StoreError};
use crate::view::{Theme, ViewState};

/// Source of the timestamps stamped onto created/updated entities.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Store mutations, applied as one all-or-nothing batch.
    Apply(Vec<Op>),
    SetFilter(EntryFilter),
    SetSort(SortOrder),
    SetSearch(String),
    SetTheme(Theme),
    ToggleGlobalView,
    SetActiveCampaign(Option<CampaignId>),
    SetActiveSession(Option<SessionId>),
}

impl From<Op> for Intent {
    fn from(op: Op) -> Self {
        Self::Apply(vec![op])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Present when the intent touched the store.
    pub applied: Option<ApplyResult>,
    pub view_changed: bool,
}

#[derive(Debug)]
pub enum WorkspaceError {
    Apply(ApplyError),
    Store(StoreError),
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apply(err) => write!(f, "rejected intent: {err}"),
            Self::Store(err) => write!(f, "persistence failed: {err}"),
        }
    }
}

impl std::error::Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Apply(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ApplyError> for WorkspaceError {
    fn from(err: ApplyError) -> Self {
        Self::Apply(err)
    }
}

impl From<StoreError> for WorkspaceError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[derive(Debug)]
pub struct Workspace<K, C = SystemClock> {
    kv: K,
    bridge: PersistenceBridge,
    clock: C,
    store: Store,
    view: ViewState,
}

impl Workspace<FileKv> {
    /// Opens the file-backed workspace under `config.data_dir`.
    pub fn open_dir(config: &Config) -> Result<Self, WorkspaceError> {
        let kv = FileKv::new(&config.data_dir).with_durability(config.durability);
        Self::open(kv, config)
    }
}

impl<K: KeyValueStore> Workspace<K> {
    pub fn open(kv: K, config: &Config) -> Result<Self, WorkspaceError> {
        Self::open_with_clock(kv, config, SystemClock)
    }
}

impl<K: KeyValueStore, C: Clock> Workspace<K, C> {
    /// Loads the persisted state; corrupt documents fall back to an empty store.
    pub fn open_with_clock(kv: K, config: &Config, clock: C) -> Result<Self, WorkspaceError> {
        let bridge = PersistenceBridge::from_config(config);
        let Snapshot { store, view } = bridge.load_or_empty(&kv)?;
        tracing::info!(
            "workspace: opened store rev={} (active campaign={:?}, session={:?})",
            store.rev(),
            store.active_campaign_id().map(CampaignId::as_str),
            store.active_session_id().map(SessionId::as_str)
        );
        Ok(Self {
            kv,
            bridge,
            clock,
            store,
            view,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn into_kv(self) -> K {
        self.kv
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<DispatchOutcome, WorkspaceError> {
        match intent {
            Intent::Apply(ops) => self.apply(&ops),
            Intent::SetActiveCampaign(campaign_id) => {
                self.apply(&[Op::Active(ActiveOp::SetCampaign(campaign_id))])
            }
            Intent::SetActiveSession(session_id) => {
                self.apply(&[Op::Active(ActiveOp::SetSession(session_id))])
            }
            Intent::SetFilter(filter) => self.update_view(|view| view.set_filter(filter)),
            Intent::SetSort(sort) => self.update_view(|view| view.set_sort(sort)),
            Intent::SetSearch(search) => self.update_view(|view| view.set_search(search)),
            Intent::SetTheme(theme) => self.update_view(|view| view.set_theme(theme)),
            Intent::ToggleGlobalView => {
                self.update_view(|view| view.set_global_view(!view.global_view()))
            }
        }
    }

    fn apply(&mut self, ops: &[Op]) -> Result<DispatchOutcome, WorkspaceError> {
        let (next, result) = apply_ops(&self.store, ops, self.clock.now())?;
        if result.new_rev == self.store.rev() {
            return Ok(DispatchOutcome {
                applied: Some(result),
                view_changed: false,
            });
        }

        // Active ids live in the view document, so both documents are rewritten.
        self.bridge.save(&mut self.kv, &next, &self.view)?;
        tracing::debug!(
            "workspace: applied {} ops, rev={} (+{} -{} ~{})",
            result.applied,
            result.new_rev,
            result.delta.added.len(),
            result.delta.removed.len(),
            result.delta.updated.len()
        );
        self.store = next;
        Ok(DispatchOutcome {
            applied: Some(result),
            view_changed: false,
        })
    }

    fn update_view(
        &mut self,
        change: impl FnOnce(&mut ViewState) -> bool,
    ) -> Result<DispatchOutcome, WorkspaceError> {
        let mut next = self.view.clone();
        if !change(&mut next) {
            return Ok(DispatchOutcome {
                applied: None,
                view_changed: false,
            });
        }
        self.bridge.save_view(&mut self.kv, &self.store, &next)?;
        self.view = next;
        Ok(DispatchOutcome {
            applied: None,
            view_changed: true,
        })
    }

    pub fn create_campaign(&mut self, draft: CampaignDraft) -> Result<CampaignId, WorkspaceError> {
        let campaign_id = CampaignId::generate();
        self.apply(&[Op::Campaign(CampaignOp::Create {
            campaign_id: campaign_id.clone(),
            draft,
        })])?;
        Ok(campaign_id)
    }

    pub fn create_session(
        &mut self,
        campaign_id: &CampaignId,
        draft: SessionDraft,
    ) -> Result<SessionId, WorkspaceError> {
        let session_id = SessionId::generate();
        self.apply(&[Op::Session(SessionOp::Create {
            session_id: session_id.clone(),
            campaign_id: campaign_id.clone(),
            draft,
        })])?;
        Ok(session_id)
    }

    pub fn create_entry(
        &mut self,
        session_id: &SessionId,
        draft: EntryDraft,
    ) -> Result<EntryId, WorkspaceError> {
        let entry_id = EntryId::generate();
        self.apply(&[Op::Entry(EntryOp::Create {
            entry_id: entry_id.clone(),
            session_id: session_id.clone(),
            draft,
        })])?;
        Ok(entry_id)
    }

    /// Entries shown for the active session, or every global entry in the global view.
    pub fn visible_entries(&self) -> Vec<&Entry> {
        match self.view.context(self.store.active_session_id()) {
            Some(context) => visible_entries(&self.store, &context),
            None => Vec::new(),
        }
    }

    /// Global entries the active session could import.
    pub fn importable_entries(&self) -> Vec<&Entry> {
        match self.store.active_session_id() {
            Some(session_id) => importable_entries(&self.store, session_id),
            None => Vec::new(),
        }
    }

    pub fn campaign_stats(&self, campaign_id: &CampaignId) -> Option<CampaignStats> {
        campaign_stats(&self.store, campaign_id, self.clock.now())
    }

    pub fn session_stats(&self, session_id: &SessionId) -> Option<SessionStats> {
        session_stats(&self.store, session_id)
    }
}
