// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::Duration;
use rstest::{fixture, rstest};

use super::{document_schema, view_schema, PersistenceBridge, Snapshot};
use crate::config::Config;
use crate::model::fixtures::{
    apply_each, cid, create_entry, create_global_entry, eid, sid, t, three_session_campaign,
};
use crate::model::{CampaignSettings, EntryType, PropertyValue, PropertyValues, Store, Tags};
use crate::ops::{apply_ops, ActiveOp, CampaignOp, CampaignPatch, EntryDraft, EntryOp, Op};
use crate::query::{EntryFilter, SortOrder};
use crate::store::{KeyValueStore, MemoryKv, StoreError};
use crate::view::{Theme, ViewState};

const STORE_KEY: &str = "lorekeep.store";
const VIEW_KEY: &str = "lorekeep.view";

#[fixture]
fn bridge() -> PersistenceBridge {
    PersistenceBridge::new(STORE_KEY, VIEW_KEY)
}

fn rich_store() -> Store {
    let mut properties = PropertyValues::new();
    properties.set("identity", "name", PropertyValue::Text("Strahd".to_owned()));
    properties.set(
        "identity",
        "aliases",
        PropertyValue::Tags(vec!["The Devil".to_owned()]),
    );
    properties.set("stats", "level", PropertyValue::Number(15.0));
    let mut npc = EntryDraft::new(EntryType::Npc, "Strahd von Zarovich");
    npc.content = "Vampire lord".to_owned();
    npc.tags = ["villain", "vampire"].into_iter().collect::<Tags>();
    npc.starred = true;
    npc.properties = properties;

    let store = apply_each(
        &three_session_campaign(),
        &[
            Op::Campaign(CampaignOp::Update {
                campaign_id: cid("c1"),
                patch: CampaignPatch {
                    description: Some("Gothic horror".to_owned()),
                    settings: Some(CampaignSettings {
                        world_name: Some("Barovia".to_owned()),
                        start_date: Some(t(-1440)),
                        theme: None,
                    }),
                    ..CampaignPatch::default()
                },
            }),
            create_entry("e1", "s1", EntryType::Location),
            create_global_entry("g1", "s1"),
            Op::Entry(EntryOp::Import {
                entry_id: eid("g1"),
                session_id: sid("s3"),
            }),
            Op::Active(ActiveOp::SetSession(Some(sid("s3")))),
        ],
    );

    // Sub-second precision must survive the string round trip.
    let now = t(30) + Duration::nanoseconds(123_456_789);
    let (store, _) = apply_ops(
        &store,
        &[Op::Entry(EntryOp::Create {
            entry_id: eid("strahd"),
            session_id: sid("s2"),
            draft: npc,
        })],
        now,
    )
    .expect("apply");
    store
}

#[rstest]
fn store_and_view_round_trip(bridge: PersistenceBridge) {
    let store = rich_store();
    let mut view = ViewState::default();
    view.set_filter(EntryFilter::Type(EntryType::Npc));
    view.set_sort(SortOrder::Oldest);
    view.set_search("vamp");
    view.set_theme(Theme::Dark);

    let mut kv = MemoryKv::new();
    bridge.save(&mut kv, &store, &view).expect("save");
    assert_eq!(kv.len(), 2);

    let Snapshot {
        store: loaded,
        view: loaded_view,
    } = bridge.load(&kv).expect("load");
    assert_eq!(loaded, store);
    assert_eq!(loaded.active_session_id(), Some(&sid("s3")));
    assert_eq!(loaded_view.filter(), EntryFilter::Type(EntryType::Npc));
    assert_eq!(loaded_view.sort(), SortOrder::Oldest);
    assert_eq!(loaded_view.search(), "vamp");
    assert_eq!(loaded_view.theme(), Theme::Dark);
    assert!(!loaded_view.global_view());
}

#[rstest]
fn document_uses_camel_case_and_iso_dates(bridge: PersistenceBridge) {
    let mut kv = MemoryKv::new();
    bridge.save_store(&mut kv, &rich_store()).expect("save");

    let json = kv.get(STORE_KEY).unwrap().expect("stored");
    let value: serde_json::Value = serde_json::from_str(&json).expect("json");

    let session = &value["sessions"][0];
    assert_eq!(session["campaignId"], "c1");
    assert_eq!(session["date"], "2026-03-01T12:00:00Z");
    assert_eq!(session["isActive"], false);
    assert_eq!(value["sessions"][2]["isActive"], true);

    let strahd = value["entries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["id"] == "strahd")
        .expect("strahd");
    assert_eq!(strahd["type"], "npc");
    assert_eq!(strahd["isGlobal"], false);
    assert_eq!(strahd["created"], "2026-03-01T12:30:00.123456789Z");
    assert_eq!(
        strahd["properties"]["stats"]["level"],
        serde_json::json!({"type": "number", "value": 15.0})
    );
    assert_eq!(
        value["campaigns"][0]["settings"]["worldName"],
        serde_json::json!("Barovia")
    );
}

#[rstest]
fn missing_keys_load_as_empty_with_configured_defaults() {
    let config = Config {
        default_sort: SortOrder::Oldest,
        default_filter: EntryFilter::Starred,
        ..Config::default()
    };
    let bridge = PersistenceBridge::from_config(&config);

    let snapshot = bridge.load_or_empty(&MemoryKv::new()).expect("load");
    assert!(snapshot.store.is_empty());
    assert_eq!(snapshot.view.sort(), SortOrder::Oldest);
    assert_eq!(snapshot.view.filter(), EntryFilter::Starred);
}

#[rstest]
#[case::not_json("{campaigns: [")]
#[case::wrong_shape(r#"{"campaigns": {"c1": {}}}"#)]
fn unparsable_store_is_a_json_error(bridge: PersistenceBridge, #[case] payload: &str) {
    let mut kv = MemoryKv::new();
    kv.set(STORE_KEY, payload).unwrap();

    let err = bridge.load(&kv).unwrap_err();
    assert!(matches!(err, StoreError::Json { .. }));
    assert!(err.is_corrupt());
}

#[rstest]
#[case::bad_date(
    r#"{"campaigns": [{"id": "c1", "title": "C", "created": "yesterday", "updated": "2026-03-01T12:00:00Z"}]}"#
)]
#[case::bad_id(
    r#"{"campaigns": [{"id": " c1", "title": "C", "created": "2026-03-01T12:00:00Z", "updated": "2026-03-01T12:00:00Z"}]}"#
)]
#[case::dangling_session(
    r#"{"campaigns": [{"id": "c1", "title": "C", "created": "2026-03-01T12:00:00Z", "updated": "2026-03-01T12:00:00Z", "sessionIds": ["s1"]}]}"#
)]
#[case::unknown_type(
    r#"{"campaigns": [{"id": "c1", "title": "C", "created": "2026-03-01T12:00:00Z", "updated": "2026-03-01T12:00:00Z", "sessionIds": ["s1"]}],
        "sessions": [{"id": "s1", "campaignId": "c1", "title": "S", "date": "2026-03-01T12:00:00Z", "entryIds": ["e1"]}],
        "entries": [{"id": "e1", "title": "E", "type": "monster", "sessionIds": ["s1"], "created": "2026-03-01T12:00:00Z", "updated": "2026-03-01T12:00:00Z"}]}"#
)]
#[case::local_entry_in_two_sessions(
    r#"{"campaigns": [{"id": "c1", "title": "C", "created": "2026-03-01T12:00:00Z", "updated": "2026-03-01T12:00:00Z", "sessionIds": ["s1", "s2"]}],
        "sessions": [{"id": "s1", "campaignId": "c1", "title": "S", "date": "2026-03-01T12:00:00Z", "entryIds": ["e1"]},
                     {"id": "s2", "campaignId": "c1", "title": "S", "date": "2026-03-01T12:00:00Z", "entryIds": ["e1"]}],
        "entries": [{"id": "e1", "title": "E", "type": "note", "sessionIds": ["s1", "s2"], "created": "2026-03-01T12:00:00Z", "updated": "2026-03-01T12:00:00Z"}]}"#
)]
#[case::two_active_sessions(
    r#"{"campaigns": [{"id": "c1", "title": "C", "created": "2026-03-01T12:00:00Z", "updated": "2026-03-01T12:00:00Z", "sessionIds": ["s1", "s2"]}],
        "sessions": [{"id": "s1", "campaignId": "c1", "title": "S", "date": "2026-03-01T12:00:00Z", "isActive": true},
                     {"id": "s2", "campaignId": "c1", "title": "S", "date": "2026-03-01T12:00:00Z", "isActive": true}]}"#
)]
fn inconsistent_store_is_corrupt_state(bridge: PersistenceBridge, #[case] payload: &str) {
    let mut kv = MemoryKv::new();
    kv.set(STORE_KEY, payload).unwrap();

    let err = bridge.load(&kv).unwrap_err();
    assert!(
        matches!(err, StoreError::CorruptState { ref key, .. } if key == STORE_KEY),
        "{err}"
    );

    let snapshot = bridge.load_or_empty(&kv).expect("falls back");
    assert!(snapshot.store.is_empty());
}

#[rstest]
fn legacy_event_entries_load_as_quests(bridge: PersistenceBridge) {
    let payload = r#"{
        "campaigns": [{"id": "c1", "title": "C", "created": "2026-03-01T12:00:00.000Z", "updated": "2026-03-01T12:00:00.000Z", "sessionIds": ["s1"]}],
        "sessions": [{"id": "s1", "campaignId": "c1", "title": "S", "date": "2026-03-01T12:00:00.000Z", "entryIds": ["e1", "e1"]}],
        "entries": [{"id": "e1", "title": "Rescue Ireena", "type": "event", "sessionIds": ["s1"], "created": "2026-03-01T12:00:00.000Z", "updated": "2026-03-02T08:15:00.000Z"}]
    }"#;
    let mut kv = MemoryKv::new();
    kv.set(STORE_KEY, payload).unwrap();

    let store = bridge.load(&kv).expect("load").store;
    let entry = store.entry(&eid("e1")).expect("entry");
    assert_eq!(entry.entry_type(), EntryType::Quest);
    assert_eq!(entry.updated(), t(20 * 60 + 15));
    assert_eq!(store.session(&sid("s1")).unwrap().entry_ids(), &[eid("e1")]);
}

#[rstest]
fn corrupt_view_keeps_store(bridge: PersistenceBridge) {
    let store = rich_store();
    let mut kv = MemoryKv::new();
    bridge.save_store(&mut kv, &store).expect("save");
    kv.set(VIEW_KEY, r#"{"theme": "neon"}"#).unwrap();

    assert!(matches!(bridge.load(&kv), Err(StoreError::Json { .. })));

    let snapshot = bridge.load_or_empty(&kv).expect("load");
    assert_eq!(snapshot.store, store);
    assert_eq!(snapshot.view, ViewState::default());
}

#[rstest]
fn view_active_ids_take_precedence_and_stale_ids_are_dropped(bridge: PersistenceBridge) {
    let mut kv = MemoryKv::new();
    bridge.save_store(&mut kv, &rich_store()).expect("save");

    kv.set(VIEW_KEY, r#"{"activeSessionId": "s1"}"#).unwrap();
    let store = bridge.load(&kv).expect("load").store;
    assert_eq!(store.active_session_id(), Some(&sid("s1")));
    assert_eq!(store.active_campaign_id(), Some(&cid("c1")));

    kv.set(
        VIEW_KEY,
        r#"{"activeSessionId": "gone", "activeCampaignId": "c1"}"#,
    )
    .unwrap();
    let store = bridge.load(&kv).expect("load").store;
    assert_eq!(store.active_session_id(), Some(&sid("s3")));

    kv.set(VIEW_KEY, r#"{"activeCampaignId": "gone"}"#).unwrap();
    let store = bridge.load(&kv).expect("load").store;
    assert_eq!(store.active_session_id(), Some(&sid("s3")));
    assert_eq!(store.check_invariants(), Ok(()));
}

struct FailingKv;

impl KeyValueStore for FailingKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Kv {
            key: key.to_owned(),
            source: "quota exceeded".into(),
        })
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
        self.get(key).map(|_| ())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.get(key).map(|_| ())
    }
}

#[rstest]
fn medium_failures_are_not_treated_as_corruption(bridge: PersistenceBridge) {
    let err = bridge.load_or_empty(&FailingKv).unwrap_err();
    assert!(matches!(err, StoreError::Kv { .. }));
    assert!(!err.is_corrupt());

    let err = bridge
        .save_store(&mut FailingKv, &Store::new())
        .unwrap_err();
    assert!(matches!(err, StoreError::Kv { ref key, .. } if key == STORE_KEY));
}

#[test]
fn schemas_describe_both_documents() {
    let store = serde_json::to_value(document_schema()).expect("schema json");
    for key in ["campaigns", "sessions", "entries"] {
        assert!(store["properties"].get(key).is_some(), "missing {key}");
    }

    let view = serde_json::to_value(view_schema()).expect("schema json");
    for key in [
        "activeCampaignId",
        "activeSessionId",
        "filter",
        "sortOrder",
        "searchTerm",
        "theme",
    ] {
        assert!(view["properties"].get(key).is_some(), "missing {key}");
    }
}
