// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::entry::EntryType;
use super::ids::{CampaignId, EntryId, SessionId};
use super::store::Store;
use crate::ops::{
    apply_ops, CampaignDraft, CampaignOp, EntryDraft, EntryOp, Op, SessionDraft, SessionOp,
};

pub(crate) fn cid(value: &str) -> CampaignId {
    CampaignId::new(value).expect("campaign id")
}

pub(crate) fn sid(value: &str) -> SessionId {
    SessionId::new(value).expect("session id")
}

pub(crate) fn eid(value: &str) -> EntryId {
    EntryId::new(value).expect("entry id")
}

/// Deterministic clock: `t(0)` is 2026-03-01T12:00:00Z, each step is one minute.
pub(crate) fn t(step: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(step)
}

pub(crate) fn create_campaign(campaign_id: &str, title: &str) -> Op {
    Op::Campaign(CampaignOp::Create {
        campaign_id: cid(campaign_id),
        draft: CampaignDraft::new(title),
    })
}

pub(crate) fn create_session(session_id: &str, campaign_id: &str) -> Op {
    Op::Session(SessionOp::Create {
        session_id: sid(session_id),
        campaign_id: cid(campaign_id),
        draft: SessionDraft::new(format!("Session {session_id}"), t(0)),
    })
}

pub(crate) fn create_entry(entry_id: &str, session_id: &str, entry_type: EntryType) -> Op {
    Op::Entry(EntryOp::Create {
        entry_id: eid(entry_id),
        session_id: sid(session_id),
        draft: EntryDraft::new(entry_type, format!("Entry {entry_id}")),
    })
}

pub(crate) fn create_global_entry(entry_id: &str, session_id: &str) -> Op {
    let mut draft = EntryDraft::new(EntryType::Note, format!("Global {entry_id}"));
    draft.global = true;
    Op::Entry(EntryOp::Create {
        entry_id: eid(entry_id),
        session_id: sid(session_id),
        draft,
    })
}

/// Applies `ops` one batch at a time, each stamped with the next clock step.
pub(crate) fn apply_each(store: &Store, ops: &[Op]) -> Store {
    let mut store = store.clone();
    for (step, op) in ops.iter().enumerate() {
        let (next, _) =
            apply_ops(&store, std::slice::from_ref(op), t(step as i64)).expect("apply op");
        store = next;
    }
    store
}

/// Campaign `c1` with sessions `s1`, `s2`, `s3`.
pub(crate) fn three_session_campaign() -> Store {
    apply_each(
        &Store::new(),
        &[
            create_campaign("c1", "Curse of Strahd"),
            create_session("s1", "c1"),
            create_session("s2", "c1"),
            create_session("s3", "c1"),
        ],
    )
}
