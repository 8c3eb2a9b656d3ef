// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for campaigns, sessions and entries.
//!
//! A batch of ops is applied to a copy of the store; every op updates both sides of the
//! relationships it touches. The batch either succeeds as a whole and yields the new store plus a
//! minimal delta, or fails and leaves the caller's store untouched.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::model::{
    template_for, Campaign, CampaignId, CampaignSettings, Entry, EntryId, EntryType,
    PropertyValues, SchemaError, Session, SessionId, Store, Tags,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Campaign(CampaignOp),
    Session(SessionOp),
    Entry(EntryOp),
    Active(ActiveOp),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CampaignOp {
    Create {
        campaign_id: CampaignId,
        draft: CampaignDraft,
    },
    Update {
        campaign_id: CampaignId,
        patch: CampaignPatch,
    },
    /// Cascades through every session of the campaign.
    Delete {
        campaign_id: CampaignId,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignDraft {
    pub title: String,
    pub description: String,
    pub tags: Tags,
    pub settings: CampaignSettings,
}

impl CampaignDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Tags>,
    pub settings: Option<CampaignSettings>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOp {
    Create {
        session_id: SessionId,
        campaign_id: CampaignId,
        draft: SessionDraft,
    },
    Update {
        session_id: SessionId,
        patch: SessionPatch,
    },
    /// Deletes the session's local entries and strips it from global ones.
    Delete {
        session_id: SessionId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionDraft {
    pub title: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub tags: Tags,
}

impl SessionDraft {
    pub fn new(title: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            date,
            description: String::new(),
            tags: Tags::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub tags: Option<Tags>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryOp {
    Create {
        entry_id: EntryId,
        session_id: SessionId,
        draft: EntryDraft,
    },
    Update {
        entry_id: EntryId,
        patch: EntryPatch,
    },
    Delete {
        entry_id: EntryId,
    },
    ToggleStar {
        entry_id: EntryId,
    },
    ToggleGlobal {
        entry_id: EntryId,
    },
    Import {
        entry_id: EntryId,
        session_id: SessionId,
    },
    Unimport {
        entry_id: EntryId,
        session_id: SessionId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub entry_type: EntryType,
    pub title: String,
    pub content: String,
    pub tags: Tags,
    pub starred: bool,
    pub global: bool,
    pub properties: PropertyValues,
}

impl EntryDraft {
    pub fn new(entry_type: EntryType, title: impl Into<String>) -> Self {
        Self {
            entry_type,
            title: title.into(),
            content: String::new(),
            tags: Tags::new(),
            starred: false,
            global: false,
            properties: PropertyValues::new(),
        }
    }
}

/// Partial entry edit. `properties` is merged into the existing values module by module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub entry_type: Option<EntryType>,
    pub tags: Option<Tags>,
    pub properties: Option<PropertyValues>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveOp {
    /// Selecting a campaign (or none) clears the active session.
    SetCampaign(Option<CampaignId>),
    /// Selecting a session also selects its campaign.
    SetSession(Option<SessionId>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityRef {
    Campaign(CampaignId),
    Session(SessionId),
    Entry(EntryId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Campaign(id) => write!(f, "campaign:{id}"),
            Self::Session(id) => write!(f, "session:{id}"),
            Self::Entry(id) => write!(f, "entry:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which entities changed as the result of applying ops.
///
/// Coarse on purpose: it reports added/removed/updated entity refs, not field diffs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<EntityRef>,
    pub removed: Vec<EntityRef>,
    pub updated: Vec<EntityRef>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<EntityRef>,
    removed: BTreeSet<EntityRef>,
    updated: BTreeSet<EntityRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, entity: EntityRef) {
        self.removed.remove(&entity);
        self.updated.remove(&entity);
        self.added.insert(entity);
    }

    fn record_removed(&mut self, entity: EntityRef) {
        // Added and removed within one batch nets out to nothing.
        if self.added.remove(&entity) {
            self.updated.remove(&entity);
            return;
        }
        self.updated.remove(&entity);
        self.removed.insert(entity);
    }

    fn record_updated(&mut self, entity: EntityRef) {
        if self.added.contains(&entity) || self.removed.contains(&entity) {
            return;
        }
        self.updated.insert(entity);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

/// Applies `ops` in order to a copy of `store`.
///
/// `now` stamps created/updated timestamps; nothing in here reads the wall clock.
/// The revision only moves when the batch changed something: an empty delta with unchanged
/// active slots keeps `rev`.
pub fn apply_ops(
    store: &Store,
    ops: &[Op],
    now: DateTime<Utc>,
) -> Result<(Store, ApplyResult), ApplyError> {
    if ops.is_empty() {
        let result = ApplyResult {
            new_rev: store.rev(),
            applied: 0,
            delta: Delta::default(),
        };
        return Ok((store.clone(), result));
    }

    let mut next = store.clone();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        match op {
            Op::Campaign(op) => apply_campaign_op(&mut next, op, now, &mut delta)?,
            Op::Session(op) => apply_session_op(&mut next, op, now, &mut delta)?,
            Op::Entry(op) => apply_entry_op(&mut next, op, now, &mut delta)?,
            Op::Active(op) => apply_active_op(&mut next, op)?,
        }
    }

    debug_assert_eq!(next.check_invariants(), Ok(()));

    let delta = delta.finish();
    let active_changed = next.active_campaign_id() != store.active_campaign_id()
        || next.active_session_id() != store.active_session_id();
    if !delta.is_empty() || active_changed {
        next.bump_rev();
    }
    let result = ApplyResult {
        new_rev: next.rev(),
        applied: ops.len(),
        delta,
    };
    Ok((next, result))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Campaign,
    Session,
    Entry,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Campaign => "campaign",
            Self::Session => "session",
            Self::Entry => "entry",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyError {
    NotFound { kind: EntityKind, id: String },
    AlreadyExists { kind: EntityKind, id: String },
    InvalidOperation(InvalidOperation),
}

impl ApplyError {
    fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    fn already_exists(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.to_string(),
        }
    }
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found (id={id})"),
            Self::AlreadyExists { kind, id } => write!(f, "{kind} already exists (id={id})"),
            Self::InvalidOperation(reason) => write!(f, "invalid operation: {reason}"),
        }
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidOperation(InvalidOperation::Schema { source, .. }) => Some(source),
            _ => None,
        }
    }
}

impl From<InvalidOperation> for ApplyError {
    fn from(reason: InvalidOperation) -> Self {
        Self::InvalidOperation(reason)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidOperation {
    EmptyTitle {
        kind: EntityKind,
    },
    /// Only global entries can be imported into other sessions.
    EntryNotGlobal {
        entry_id: EntryId,
    },
    /// A local entry cannot leave its owning session.
    UnimportFromOwner {
        entry_id: EntryId,
        session_id: SessionId,
    },
    /// Making a global entry local needs a session to fall back to.
    OrphanedLocalEntry {
        entry_id: EntryId,
    },
    Schema {
        entry_id: EntryId,
        source: SchemaError,
    },
}

impl fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle { kind } => write!(f, "{kind} title must not be empty"),
            Self::EntryNotGlobal { entry_id } => {
                write!(f, "entry {entry_id} is not global and cannot be imported")
            }
            Self::UnimportFromOwner {
                entry_id,
                session_id,
            } => write!(
                f,
                "entry {entry_id} is local to session {session_id} and cannot be unimported"
            ),
            Self::OrphanedLocalEntry { entry_id } => write!(
                f,
                "entry {entry_id} belongs to no session and cannot be made local"
            ),
            Self::Schema { entry_id, source } => {
                write!(f, "entry {entry_id} has invalid properties: {source}")
            }
        }
    }
}

// Extracted op-application implementation for campaign/session/entry mutations.
include!("ops_impl.rs");
