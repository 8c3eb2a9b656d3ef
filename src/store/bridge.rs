// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON documents for the store and view state.
//!
//! Two keys are written: the store document `{ campaigns, sessions, entries }` and the view
//! document `{ activeCampaignId, activeSessionId, filter, sortOrder, searchTerm, theme }`. Ids and
//! dates travel as strings and are parsed back into typed values on load; anything that does not
//! parse, or that violates the store invariants, is reported as [`StoreError::CorruptState`].

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::kv::KeyValueStore;
use super::StoreError;
use crate::config::Config;
use crate::model::{
    validate_properties, Campaign, CampaignId, CampaignSettings, Entry, EntryId, EntryType, Id,
    PropertyValue, PropertyValues, Session, SessionId, Store, Tags,
};
use crate::query::{EntryFilter, SortOrder};
use crate::view::{Theme, ViewState};

/// Everything restored from the durable medium.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub store: Store,
    pub view: ViewState,
}

#[derive(Debug, Clone)]
pub struct PersistenceBridge {
    store_key: String,
    view_key: String,
    default_view: ViewState,
}

impl PersistenceBridge {
    pub fn new(store_key: impl Into<String>, view_key: impl Into<String>) -> Self {
        Self {
            store_key: store_key.into(),
            view_key: view_key.into(),
            default_view: ViewState::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            store_key: config.store_key.clone(),
            view_key: config.view_key.clone(),
            default_view: ViewState::new(config.default_filter, config.default_sort),
        }
    }

    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    pub fn view_key(&self) -> &str {
        &self.view_key
    }

    pub fn default_view(&self) -> &ViewState {
        &self.default_view
    }

    pub fn save_store<K: KeyValueStore + ?Sized>(
        &self,
        kv: &mut K,
        store: &Store,
    ) -> Result<(), StoreError> {
        let document = store_to_document(store);
        let json = serde_json::to_string(&document).map_err(|source| StoreError::Json {
            key: self.store_key.clone(),
            source,
        })?;
        kv.set(&self.store_key, &json)?;
        tracing::debug!(
            "bridge: saved store rev={} ({} bytes)",
            store.rev(),
            json.len()
        );
        Ok(())
    }

    pub fn save_view<K: KeyValueStore + ?Sized>(
        &self,
        kv: &mut K,
        store: &Store,
        view: &ViewState,
    ) -> Result<(), StoreError> {
        let document = view_to_document(store, view);
        let json = serde_json::to_string(&document).map_err(|source| StoreError::Json {
            key: self.view_key.clone(),
            source,
        })?;
        kv.set(&self.view_key, &json)?;
        tracing::debug!("bridge: saved view rev={}", view.rev());
        Ok(())
    }

    /// Writes the store document first, then the view document.
    pub fn save<K: KeyValueStore + ?Sized>(
        &self,
        kv: &mut K,
        store: &Store,
        view: &ViewState,
    ) -> Result<(), StoreError> {
        self.save_store(kv, store)?;
        self.save_view(kv, store, view)
    }

    /// Loads the store document; `None` when nothing has been saved yet.
    pub fn load_store<K: KeyValueStore + ?Sized>(
        &self,
        kv: &K,
    ) -> Result<Option<Store>, StoreError> {
        let Some(json) = kv.get(&self.store_key)? else {
            return Ok(None);
        };
        let document: StoreDocument =
            serde_json::from_str(&json).map_err(|source| StoreError::Json {
                key: self.store_key.clone(),
                source,
            })?;
        let store = store_from_document(document).map_err(|reason| StoreError::CorruptState {
            key: self.store_key.clone(),
            reason,
        })?;
        Ok(Some(store))
    }

    /// Loads both documents strictly: any malformed payload is an error.
    pub fn load<K: KeyValueStore + ?Sized>(&self, kv: &K) -> Result<Snapshot, StoreError> {
        let mut store = self.load_store(kv)?.unwrap_or_default();
        let view = match self.load_view_document(kv)? {
            Some(document) => apply_view_document(&mut store, document),
            None => self.default_view.clone(),
        };
        Ok(Snapshot { store, view })
    }

    /// Like [`Self::load`], but a corrupt document falls back to its empty default.
    ///
    /// Only payload corruption is recovered; a failing medium is still an error, so that a
    /// transient read failure is never followed by overwriting the stored data.
    pub fn load_or_empty<K: KeyValueStore + ?Sized>(
        &self,
        kv: &K,
    ) -> Result<Snapshot, StoreError> {
        let mut store = match self.load_store(kv) {
            Ok(store) => store.unwrap_or_default(),
            Err(err) if err.is_corrupt() => {
                tracing::warn!("bridge: discarding corrupt store document: {err}");
                Store::default()
            }
            Err(err) => return Err(err),
        };

        let view = match self.load_view_document(kv) {
            Ok(Some(document)) => apply_view_document(&mut store, document),
            Ok(None) => self.default_view.clone(),
            Err(err) if err.is_corrupt() => {
                tracing::warn!("bridge: discarding corrupt view document: {err}");
                self.default_view.clone()
            }
            Err(err) => return Err(err),
        };

        tracing::info!(
            "bridge: loaded {} campaigns, {} sessions, {} entries (rev={})",
            store.campaigns().len(),
            store.sessions().len(),
            store.entries().len(),
            store.rev()
        );
        Ok(Snapshot { store, view })
    }

    fn load_view_document<K: KeyValueStore + ?Sized>(
        &self,
        kv: &K,
    ) -> Result<Option<ViewDocument>, StoreError> {
        let Some(json) = kv.get(&self.view_key)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| StoreError::Json {
                key: self.view_key.clone(),
                source,
            })
    }
}

/// JSON Schema of the store document.
pub fn document_schema() -> schemars::Schema {
    schemars::schema_for!(StoreDocument)
}

/// JSON Schema of the view document.
pub fn view_schema() -> schemars::Schema {
    schemars::schema_for!(ViewDocument)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct StoreDocument {
    #[serde(default)]
    rev: u64,
    #[serde(default)]
    campaigns: Vec<CampaignJson>,
    #[serde(default)]
    sessions: Vec<SessionJson>,
    #[serde(default)]
    entries: Vec<EntryJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct CampaignJson {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    created: String,
    updated: String,
    #[serde(default)]
    session_ids: Vec<String>,
    #[serde(default)]
    settings: CampaignSettingsJson,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct CampaignSettingsJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    world_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct SessionJson {
    id: String,
    campaign_id: String,
    title: String,
    date: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    entry_ids: Vec<String>,
    #[serde(default)]
    is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct EntryJson {
    id: String,
    title: String,
    #[serde(default)]
    content: String,
    #[serde(rename = "type")]
    entry_type: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    starred: bool,
    #[serde(default)]
    is_global: bool,
    #[serde(default)]
    session_ids: Vec<String>,
    created: String,
    updated: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, BTreeMap<String, PropertyValueJson>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
enum PropertyValueJson {
    Text(String),
    Number(f64),
    Date(String),
    Tags(Vec<String>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
struct ViewDocument {
    active_campaign_id: Option<String>,
    active_session_id: Option<String>,
    filter: EntryFilter,
    sort_order: SortOrder,
    search_term: String,
    theme: Theme,
    global_view: bool,
}

fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_date(field: &str, value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|err| format!("invalid date for {field}: {value:?}: {err}"))
}

fn parse_id<T>(field: &str, value: String) -> Result<Id<T>, String> {
    Id::new(value.clone()).map_err(|err| format!("invalid id for {field}: {value:?}: {err}"))
}

fn tags_to_json(tags: &Tags) -> Vec<String> {
    tags.iter().map(str::to_owned).collect()
}

fn store_to_document(store: &Store) -> StoreDocument {
    let campaigns = store
        .campaigns()
        .values()
        .map(|campaign| CampaignJson {
            id: campaign.campaign_id().to_string(),
            title: campaign.title().to_owned(),
            description: campaign.description().to_owned(),
            tags: tags_to_json(campaign.tags()),
            created: format_date(campaign.created()),
            updated: format_date(campaign.updated()),
            session_ids: campaign.session_ids().iter().map(ToString::to_string).collect(),
            settings: CampaignSettingsJson {
                world_name: campaign.settings().world_name.clone(),
                start_date: campaign.settings().start_date.map(format_date),
                theme: campaign.settings().theme.clone(),
            },
        })
        .collect();

    let sessions = store
        .sessions()
        .values()
        .map(|session| SessionJson {
            id: session.session_id().to_string(),
            campaign_id: session.campaign_id().to_string(),
            title: session.title().to_owned(),
            date: format_date(session.date()),
            description: session.description().to_owned(),
            tags: tags_to_json(session.tags()),
            entry_ids: session.entry_ids().iter().map(ToString::to_string).collect(),
            is_active: store.is_session_active(session.session_id()),
        })
        .collect();

    let entries = store.entries().values().map(entry_to_json).collect();

    StoreDocument {
        rev: store.rev(),
        campaigns,
        sessions,
        entries,
    }
}

fn entry_to_json(entry: &Entry) -> EntryJson {
    let properties = entry
        .properties()
        .modules()
        .map(|(module_id, values)| {
            let values = values
                .iter()
                .map(|(property_id, value)| {
                    let value = match value {
                        PropertyValue::Text(text) => PropertyValueJson::Text(text.clone()),
                        PropertyValue::Number(number) => PropertyValueJson::Number(*number),
                        PropertyValue::Date(date) => PropertyValueJson::Date(format_date(*date)),
                        PropertyValue::Tags(tags) => PropertyValueJson::Tags(tags.clone()),
                    };
                    (property_id.clone(), value)
                })
                .collect();
            (module_id.to_owned(), values)
        })
        .collect();

    EntryJson {
        id: entry.entry_id().to_string(),
        title: entry.title().to_owned(),
        content: entry.content().to_owned(),
        entry_type: entry.entry_type().as_str().to_owned(),
        tags: tags_to_json(entry.tags()),
        starred: entry.starred(),
        is_global: entry.is_global(),
        session_ids: entry.session_ids().iter().map(ToString::to_string).collect(),
        created: format_date(entry.created()),
        updated: format_date(entry.updated()),
        properties,
    }
}

/// Rebuilds a store; duplicate ids inside persisted id lists are collapsed.
fn store_from_document(document: StoreDocument) -> Result<Store, String> {
    let mut store = Store::new();

    for campaign_json in document.campaigns {
        let campaign_id: CampaignId = parse_id("campaigns[].id", campaign_json.id)?;
        if store.campaigns().contains_key(&campaign_id) {
            return Err(format!("duplicate campaign id {campaign_id}"));
        }
        let created = parse_date("campaigns[].created", &campaign_json.created)?;
        let updated = parse_date("campaigns[].updated", &campaign_json.updated)?;
        let start_date = campaign_json
            .settings
            .start_date
            .as_deref()
            .map(|value| parse_date("campaigns[].settings.startDate", value))
            .transpose()?;

        let mut campaign = Campaign::new(campaign_id.clone(), campaign_json.title, created);
        campaign.set_description(campaign_json.description);
        campaign.set_tags(campaign_json.tags.into_iter().collect());
        campaign.set_settings(CampaignSettings {
            world_name: campaign_json.settings.world_name,
            start_date,
            theme: campaign_json.settings.theme,
        });
        campaign.set_timestamps(created, updated);
        for value in campaign_json.session_ids {
            campaign.insert_session_id(parse_id("campaigns[].sessionIds[]", value)?);
        }
        store.campaigns_mut().insert(campaign_id, campaign);
    }

    let mut active_session_ids = Vec::new();
    for session_json in document.sessions {
        let session_id: SessionId = parse_id("sessions[].id", session_json.id)?;
        if store.sessions().contains_key(&session_id) {
            return Err(format!("duplicate session id {session_id}"));
        }
        let campaign_id = parse_id("sessions[].campaignId", session_json.campaign_id)?;
        let date = parse_date("sessions[].date", &session_json.date)?;

        let mut session = Session::new(session_id.clone(), campaign_id, session_json.title, date);
        session.set_description(session_json.description);
        session.set_tags(session_json.tags.into_iter().collect());
        for value in session_json.entry_ids {
            session.insert_entry_id(parse_id("sessions[].entryIds[]", value)?);
        }
        if session_json.is_active {
            active_session_ids.push(session_id.clone());
        }
        store.sessions_mut().insert(session_id, session);
    }

    for entry_json in document.entries {
        let entry = entry_from_json(entry_json)?;
        if store.entries().contains_key(entry.entry_id()) {
            return Err(format!("duplicate entry id {}", entry.entry_id()));
        }
        store.entries_mut().insert(entry.entry_id().clone(), entry);
    }

    if active_session_ids.len() > 1 {
        return Err(format!(
            "{} sessions are marked active",
            active_session_ids.len()
        ));
    }
    if let Some(session_id) = active_session_ids.pop() {
        let campaign_id = store
            .session(&session_id)
            .map(|session| session.campaign_id().clone());
        store.set_active_campaign_id(campaign_id);
        store.set_active_session_id(Some(session_id));
    }

    store.set_rev(document.rev);
    store.check_invariants().map_err(|err| err.to_string())?;
    Ok(store)
}

fn entry_from_json(entry_json: EntryJson) -> Result<Entry, String> {
    let entry_id: EntryId = parse_id("entries[].id", entry_json.id)?;
    let entry_type = entry_json
        .entry_type
        .parse::<EntryType>()
        .map_err(|err| format!("entry {entry_id}: {err}"))?;
    let created = parse_date("entries[].created", &entry_json.created)?;
    let updated = parse_date("entries[].updated", &entry_json.updated)?;

    let mut session_ids = Vec::with_capacity(entry_json.session_ids.len());
    for value in entry_json.session_ids {
        let session_id: SessionId = parse_id("entries[].sessionIds[]", value)?;
        if !session_ids.contains(&session_id) {
            session_ids.push(session_id);
        }
    }

    let mut properties = PropertyValues::new();
    for (module_id, values) in entry_json.properties {
        for (property_id, value) in values {
            let value = match value {
                PropertyValueJson::Text(text) => PropertyValue::Text(text),
                PropertyValueJson::Number(number) => PropertyValue::Number(number),
                PropertyValueJson::Date(date) => {
                    PropertyValue::Date(parse_date("entries[].properties", &date)?)
                }
                PropertyValueJson::Tags(tags) => PropertyValue::Tags(tags),
            };
            properties.set(module_id.clone(), property_id, value);
        }
    }
    validate_properties(entry_type, &properties)
        .map_err(|err| format!("entry {entry_id}: {err}"))?;

    let mut entry = Entry::restored(
        entry_id,
        session_ids,
        entry_type,
        entry_json.title,
        entry_json.is_global,
    );
    entry.set_content(entry_json.content);
    entry.set_tags(entry_json.tags.into_iter().collect());
    entry.set_starred(entry_json.starred);
    entry.set_properties(properties);
    entry.set_timestamps(created, updated);
    Ok(entry)
}

fn view_to_document(store: &Store, view: &ViewState) -> ViewDocument {
    ViewDocument {
        active_campaign_id: store.active_campaign_id().map(ToString::to_string),
        active_session_id: store.active_session_id().map(ToString::to_string),
        filter: view.filter(),
        sort_order: view.sort(),
        search_term: view.search().to_owned(),
        theme: view.theme(),
        global_view: view.global_view(),
    }
}

/// Applies the persisted active ids to `store` and returns the view state.
///
/// Active ids that no longer resolve are dropped. When the view document names no active
/// session, the session flagged in the store document is kept if it belongs to the active
/// campaign.
fn apply_view_document(store: &mut Store, document: ViewDocument) -> ViewState {
    let active_session = document
        .active_session_id
        .and_then(|value| SessionId::new(value).ok())
        .and_then(|session_id| {
            let campaign_id = store.session(&session_id)?.campaign_id().clone();
            Some((campaign_id, session_id))
        });
    let active_campaign = document
        .active_campaign_id
        .and_then(|value| CampaignId::new(value).ok())
        .filter(|campaign_id| store.campaigns().contains_key(campaign_id));

    if let Some((campaign_id, session_id)) = active_session {
        store.set_active_campaign_id(Some(campaign_id));
        store.set_active_session_id(Some(session_id));
    } else if let Some(campaign_id) = active_campaign {
        let keep_session = store
            .active_session_id()
            .and_then(|session_id| store.session(session_id))
            .is_some_and(|session| session.campaign_id() == &campaign_id);
        if !keep_session {
            store.set_active_session_id(None);
        }
        store.set_active_campaign_id(Some(campaign_id));
    }

    ViewState::restored(
        document.filter,
        document.sort_order,
        document.search_term,
        document.theme,
        document.global_view,
    )
}

#[cfg(test)]
mod tests;
