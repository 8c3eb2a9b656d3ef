// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Per-entity mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_campaign_op(
    store: &mut Store,
    op: &CampaignOp,
    now: DateTime<Utc>,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        CampaignOp::Create { campaign_id, draft } => {
            if store.campaigns().contains_key(campaign_id) {
                return Err(ApplyError::already_exists(EntityKind::Campaign, campaign_id));
            }
            require_title(EntityKind::Campaign, &draft.title)?;

            let mut campaign = Campaign::new(campaign_id.clone(), draft.title.clone(), now);
            campaign.set_description(draft.description.clone());
            campaign.set_tags(draft.tags.clone());
            campaign.set_settings(draft.settings.clone());
            store.campaigns_mut().insert(campaign_id.clone(), campaign);
            delta.record_added(EntityRef::Campaign(campaign_id.clone()));
            Ok(())
        }
        CampaignOp::Update { campaign_id, patch } => {
            if let Some(title) = &patch.title {
                require_title(EntityKind::Campaign, title)?;
            }
            let Some(campaign) = store.campaigns_mut().get_mut(campaign_id) else {
                return Err(ApplyError::not_found(EntityKind::Campaign, campaign_id));
            };

            if let Some(title) = &patch.title {
                campaign.set_title(title.clone());
            }
            if let Some(description) = &patch.description {
                campaign.set_description(description.clone());
            }
            if let Some(tags) = &patch.tags {
                campaign.set_tags(tags.clone());
            }
            if let Some(settings) = &patch.settings {
                campaign.set_settings(settings.clone());
            }
            campaign.touch(now);
            delta.record_updated(EntityRef::Campaign(campaign_id.clone()));
            Ok(())
        }
        CampaignOp::Delete { campaign_id } => {
            let Some(campaign) = store.campaigns().get(campaign_id) else {
                return Err(ApplyError::not_found(EntityKind::Campaign, campaign_id));
            };
            let session_ids = campaign.session_ids().to_vec();
            for session_id in &session_ids {
                delete_session(store, session_id, now, delta)?;
            }

            store.campaigns_mut().shift_remove(campaign_id);
            if store.is_campaign_active(campaign_id) {
                store.set_active_campaign_id(None);
                store.set_active_session_id(None);
            }
            delta.record_removed(EntityRef::Campaign(campaign_id.clone()));
            Ok(())
        }
    }
}

fn apply_session_op(
    store: &mut Store,
    op: &SessionOp,
    now: DateTime<Utc>,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        SessionOp::Create {
            session_id,
            campaign_id,
            draft,
        } => {
            if store.sessions().contains_key(session_id) {
                return Err(ApplyError::already_exists(EntityKind::Session, session_id));
            }
            require_title(EntityKind::Session, &draft.title)?;
            let Some(campaign) = store.campaigns_mut().get_mut(campaign_id) else {
                return Err(ApplyError::not_found(EntityKind::Campaign, campaign_id));
            };

            campaign.insert_session_id(session_id.clone());
            campaign.touch(now);
            delta.record_updated(EntityRef::Campaign(campaign_id.clone()));

            let mut session = Session::new(
                session_id.clone(),
                campaign_id.clone(),
                draft.title.clone(),
                draft.date,
            );
            session.set_description(draft.description.clone());
            session.set_tags(draft.tags.clone());
            store.sessions_mut().insert(session_id.clone(), session);
            delta.record_added(EntityRef::Session(session_id.clone()));
            Ok(())
        }
        SessionOp::Update { session_id, patch } => {
            if let Some(title) = &patch.title {
                require_title(EntityKind::Session, title)?;
            }
            let Some(session) = store.sessions_mut().get_mut(session_id) else {
                return Err(ApplyError::not_found(EntityKind::Session, session_id));
            };

            if let Some(title) = &patch.title {
                session.set_title(title.clone());
            }
            if let Some(date) = patch.date {
                session.set_date(date);
            }
            if let Some(description) = &patch.description {
                session.set_description(description.clone());
            }
            if let Some(tags) = &patch.tags {
                session.set_tags(tags.clone());
            }
            delta.record_updated(EntityRef::Session(session_id.clone()));
            Ok(())
        }
        SessionOp::Delete { session_id } => delete_session(store, session_id, now, delta),
    }
}

/// Removes a session together with the entries only it owned.
///
/// Global entries survive with the session stripped from their membership set, even when that
/// leaves them in no session at all.
fn delete_session(
    store: &mut Store,
    session_id: &SessionId,
    now: DateTime<Utc>,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    let Some(session) = store.sessions_mut().shift_remove(session_id) else {
        return Err(ApplyError::not_found(EntityKind::Session, session_id));
    };

    if let Some(campaign) = store.campaigns_mut().get_mut(session.campaign_id()) {
        campaign.remove_session_id(session_id);
        campaign.touch(now);
        delta.record_updated(EntityRef::Campaign(session.campaign_id().clone()));
    }

    for entry_id in session.entry_ids() {
        let Some(entry) = store.entries_mut().get_mut(entry_id) else {
            continue;
        };
        if entry.is_global() {
            entry.remove_session_id(session_id);
            delta.record_updated(EntityRef::Entry(entry_id.clone()));
        } else {
            store.entries_mut().shift_remove(entry_id);
            delta.record_removed(EntityRef::Entry(entry_id.clone()));
        }
    }

    if store.is_session_active(session_id) {
        store.set_active_session_id(None);
    }
    delta.record_removed(EntityRef::Session(session_id.clone()));
    Ok(())
}

fn apply_entry_op(
    store: &mut Store,
    op: &EntryOp,
    now: DateTime<Utc>,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        EntryOp::Create {
            entry_id,
            session_id,
            draft,
        } => {
            if store.entries().contains_key(entry_id) {
                return Err(ApplyError::already_exists(EntityKind::Entry, entry_id));
            }
            require_title(EntityKind::Entry, &draft.title)?;
            check_properties(entry_id, draft.entry_type, &draft.properties)?;
            let Some(session) = store.sessions_mut().get_mut(session_id) else {
                return Err(ApplyError::not_found(EntityKind::Session, session_id));
            };

            session.insert_entry_id(entry_id.clone());
            delta.record_updated(EntityRef::Session(session_id.clone()));

            let mut entry = Entry::new(
                entry_id.clone(),
                session_id.clone(),
                draft.entry_type,
                draft.title.clone(),
                now,
            );
            entry.set_content(draft.content.clone());
            entry.set_tags(draft.tags.clone());
            entry.set_starred(draft.starred);
            entry.set_global(draft.global);
            entry.set_properties(draft.properties.clone());
            store.entries_mut().insert(entry_id.clone(), entry);
            delta.record_added(EntityRef::Entry(entry_id.clone()));
            Ok(())
        }
        EntryOp::Update { entry_id, patch } => {
            if let Some(title) = &patch.title {
                require_title(EntityKind::Entry, title)?;
            }
            let Some(entry) = store.entries_mut().get_mut(entry_id) else {
                return Err(ApplyError::not_found(EntityKind::Entry, entry_id));
            };

            let entry_type = patch.entry_type.unwrap_or(entry.entry_type());
            let mut properties = entry.properties().clone();
            if entry_type != entry.entry_type() {
                properties.retain_template(&template_for(entry_type));
            }
            if let Some(patch_properties) = &patch.properties {
                properties.merge(patch_properties.clone());
            }
            check_properties(entry_id, entry_type, &properties)?;

            if let Some(title) = &patch.title {
                entry.set_title(title.clone());
            }
            if let Some(content) = &patch.content {
                entry.set_content(content.clone());
            }
            if let Some(tags) = &patch.tags {
                entry.set_tags(tags.clone());
            }
            entry.set_entry_type(entry_type);
            entry.set_properties(properties);
            entry.touch(now);
            delta.record_updated(EntityRef::Entry(entry_id.clone()));
            Ok(())
        }
        EntryOp::Delete { entry_id } => {
            let Some(entry) = store.entries_mut().shift_remove(entry_id) else {
                return Err(ApplyError::not_found(EntityKind::Entry, entry_id));
            };
            for session_id in entry.session_ids() {
                if let Some(session) = store.sessions_mut().get_mut(session_id) {
                    session.remove_entry_id(entry_id);
                    delta.record_updated(EntityRef::Session(session_id.clone()));
                }
            }
            delta.record_removed(EntityRef::Entry(entry_id.clone()));
            Ok(())
        }
        EntryOp::ToggleStar { entry_id } => {
            let Some(entry) = store.entries_mut().get_mut(entry_id) else {
                return Err(ApplyError::not_found(EntityKind::Entry, entry_id));
            };
            entry.set_starred(!entry.starred());
            delta.record_updated(EntityRef::Entry(entry_id.clone()));
            Ok(())
        }
        EntryOp::ToggleGlobal { entry_id } => toggle_global(store, entry_id, delta),
        EntryOp::Import {
            entry_id,
            session_id,
        } => {
            let Some(entry) = store.entries().get(entry_id) else {
                return Err(ApplyError::not_found(EntityKind::Entry, entry_id));
            };
            if !store.sessions().contains_key(session_id) {
                return Err(ApplyError::not_found(EntityKind::Session, session_id));
            }
            if !entry.is_global() {
                return Err(InvalidOperation::EntryNotGlobal {
                    entry_id: entry_id.clone(),
                }
                .into());
            }

            link(store, entry_id, session_id, delta);
            Ok(())
        }
        EntryOp::Unimport {
            entry_id,
            session_id,
        } => {
            let Some(entry) = store.entries().get(entry_id) else {
                return Err(ApplyError::not_found(EntityKind::Entry, entry_id));
            };
            if !store.sessions().contains_key(session_id) {
                return Err(ApplyError::not_found(EntityKind::Session, session_id));
            }
            if !entry.in_session(session_id) {
                return Ok(());
            }
            if !entry.is_global() {
                return Err(InvalidOperation::UnimportFromOwner {
                    entry_id: entry_id.clone(),
                    session_id: session_id.clone(),
                }
                .into());
            }

            unlink(store, entry_id, session_id, delta);
            Ok(())
        }
    }
}

/// Flips the global flag. Going local collapses the membership set to the first session.
fn toggle_global(
    store: &mut Store,
    entry_id: &EntryId,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    let Some(entry) = store.entries_mut().get_mut(entry_id) else {
        return Err(ApplyError::not_found(EntityKind::Entry, entry_id));
    };

    if !entry.is_global() {
        entry.set_global(true);
        delta.record_updated(EntityRef::Entry(entry_id.clone()));
        return Ok(());
    }

    let Some(origin) = entry.origin_session_id().cloned() else {
        return Err(InvalidOperation::OrphanedLocalEntry {
            entry_id: entry_id.clone(),
        }
        .into());
    };
    let dropped = entry
        .session_ids()
        .iter()
        .filter(|session_id| **session_id != origin)
        .cloned()
        .collect::<Vec<_>>();
    entry.set_global(false);
    entry.set_session_ids(vec![origin]);
    delta.record_updated(EntityRef::Entry(entry_id.clone()));

    for session_id in dropped {
        if let Some(session) = store.sessions_mut().get_mut(&session_id) {
            session.remove_entry_id(entry_id);
            delta.record_updated(EntityRef::Session(session_id));
        }
    }
    Ok(())
}

fn apply_active_op(store: &mut Store, op: &ActiveOp) -> Result<(), ApplyError> {
    match op {
        ActiveOp::SetCampaign(campaign_id) => {
            if let Some(campaign_id) = campaign_id {
                if !store.campaigns().contains_key(campaign_id) {
                    return Err(ApplyError::not_found(EntityKind::Campaign, campaign_id));
                }
            }
            store.set_active_campaign_id(campaign_id.clone());
            store.set_active_session_id(None);
            Ok(())
        }
        ActiveOp::SetSession(None) => {
            store.set_active_session_id(None);
            Ok(())
        }
        ActiveOp::SetSession(Some(session_id)) => {
            let Some(session) = store.sessions().get(session_id) else {
                return Err(ApplyError::not_found(EntityKind::Session, session_id));
            };
            let campaign_id = session.campaign_id().clone();
            store.set_active_campaign_id(Some(campaign_id));
            store.set_active_session_id(Some(session_id.clone()));
            Ok(())
        }
    }
}

fn link(store: &mut Store, entry_id: &EntryId, session_id: &SessionId, delta: &mut DeltaBuilder) {
    if let Some(entry) = store.entries_mut().get_mut(entry_id) {
        if entry.insert_session_id(session_id.clone()) {
            delta.record_updated(EntityRef::Entry(entry_id.clone()));
        }
    }
    if let Some(session) = store.sessions_mut().get_mut(session_id) {
        if session.insert_entry_id(entry_id.clone()) {
            delta.record_updated(EntityRef::Session(session_id.clone()));
        }
    }
}

fn unlink(
    store: &mut Store,
    entry_id: &EntryId,
    session_id: &SessionId,
    delta: &mut DeltaBuilder,
) {
    if let Some(entry) = store.entries_mut().get_mut(entry_id) {
        if entry.remove_session_id(session_id) {
            delta.record_updated(EntityRef::Entry(entry_id.clone()));
        }
    }
    if let Some(session) = store.sessions_mut().get_mut(session_id) {
        if session.remove_entry_id(entry_id) {
            delta.record_updated(EntityRef::Session(session_id.clone()));
        }
    }
}

fn require_title(kind: EntityKind, title: &str) -> Result<(), InvalidOperation> {
    if title.trim().is_empty() {
        return Err(InvalidOperation::EmptyTitle { kind });
    }
    Ok(())
}

fn check_properties(
    entry_id: &EntryId,
    entry_type: EntryType,
    properties: &PropertyValues,
) -> Result<(), InvalidOperation> {
    crate::model::validate_properties(entry_type, properties).map_err(|source| {
        InvalidOperation::Schema {
            entry_id: entry_id.clone(),
            source,
        }
    })
}
