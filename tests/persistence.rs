// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

mod common;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use common::{at, cid, eid, init_tracing, sid, StepClock, TempDir};
use lorekeep::model::EntryType;
use lorekeep::ops::{EntryDraft, EntryOp, Op, SessionDraft};
use lorekeep::query::{EntryFilter, SortOrder};
use lorekeep::store::{FileKv, KeyValueStore, WriteDurability};
use lorekeep::view::Theme;
use lorekeep::{Config, Intent, Workspace};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {path:?}: {err}"))
}

fn config_for(tmp: &TempDir) -> Config {
    Config::default().with_data_dir(tmp.path().join("data"))
}

fn open(config: &Config, start: i64) -> Workspace<FileKv, StepClock> {
    let kv = FileKv::new(&config.data_dir).with_durability(config.durability);
    Workspace::open_with_clock(kv, config, StepClock::starting_at(start)).expect("open")
}

#[test]
fn legacy_document_loads_with_retyped_dates() {
    init_tracing();
    let tmp = TempDir::new("legacy");
    let config = config_for(&tmp);
    let mut kv = FileKv::new(&config.data_dir);
    kv.set(&config.store_key, &read_fixture("legacy_store.json"))
        .expect("seed store");

    let ws = Workspace::open_dir(&config).expect("open");
    let store = ws.store();
    assert_eq!(store.campaigns().len(), 1);
    assert_eq!(store.sessions().len(), 2);
    assert_eq!(store.entries().len(), 3);

    let campaign = store.campaign(&cid("camp-1714584600000")).expect("campaign");
    assert_eq!(
        campaign.updated(),
        Utc.with_ymd_and_hms(2024, 5, 8, 21, 15, 42).unwrap()
            + chrono::Duration::milliseconds(123)
    );
    assert_eq!(campaign.settings().world_name.as_deref(), Some("Faerun"));

    let session = store.session(&sid("sess-1")).expect("session");
    assert_eq!(session.date(), Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap());
    assert_eq!(session.entry_ids(), &[eid("entry-sildar"), eid("entry-cragmaw")]);

    let quest = store.entry(&eid("entry-redbrands")).expect("entry");
    assert_eq!(quest.entry_type(), EntryType::Quest);
    assert!(!quest.is_global());

    assert_eq!(store.active_session_id(), Some(&sid("sess-2")));
    assert_eq!(store.active_campaign_id(), Some(&cid("camp-1714584600000")));
    assert_eq!(store.check_invariants(), Ok(()));

    let visible: Vec<_> = ws
        .visible_entries()
        .iter()
        .map(|entry| entry.entry_id().as_str())
        .collect();
    assert_eq!(visible, ["entry-cragmaw", "entry-redbrands"]);
}

#[test]
fn file_backed_workspace_round_trips() {
    init_tracing();
    let tmp = TempDir::new("round_trip");
    let config = config_for(&tmp).with_durability(WriteDurability::Durable);

    let (store, view) = {
        let mut ws = open(&config, 0);
        ws.dispatch(Intent::Apply(vec![
            Op::Campaign(lorekeep::ops::CampaignOp::Create {
                campaign_id: cid("c1"),
                draft: lorekeep::ops::CampaignDraft::new("Tomb of Annihilation"),
            }),
            Op::Session(lorekeep::ops::SessionOp::Create {
                session_id: sid("s1"),
                campaign_id: cid("c1"),
                draft: SessionDraft::new("Port Nyanzaru", at(-30)),
            }),
            Op::Entry(EntryOp::Create {
                entry_id: eid("e1"),
                session_id: sid("s1"),
                draft: EntryDraft::new(EntryType::Npc, "Syndra Silvane"),
            }),
            Op::Entry(EntryOp::ToggleStar { entry_id: eid("e1") }),
        ]))
        .expect("apply");
        ws.dispatch(Intent::SetActiveSession(Some(sid("s1"))))
            .expect("activate");
        ws.dispatch(Intent::SetFilter(EntryFilter::Starred))
            .expect("filter");
        ws.dispatch(Intent::SetSort(SortOrder::Oldest)).expect("sort");
        ws.dispatch(Intent::SetTheme(Theme::Dark)).expect("theme");
        (ws.store().clone(), ws.view().clone())
    };

    assert!(config.data_dir.join("lorekeep.store.json").is_file());
    assert!(config.data_dir.join("lorekeep.view.json").is_file());

    let ws = open(&config, 100);
    assert_eq!(ws.store(), &store);
    assert_eq!(ws.view().filter(), view.filter());
    assert_eq!(ws.view().sort(), SortOrder::Oldest);
    assert_eq!(ws.view().theme(), Theme::Dark);
    assert_eq!(ws.visible_entries().len(), 1);
}

#[test]
fn corrupt_file_falls_back_to_empty_and_is_replaced() {
    init_tracing();
    let tmp = TempDir::new("corrupt");
    let config = config_for(&tmp);
    let mut kv = FileKv::new(&config.data_dir);
    kv.set(&config.store_key, "{\"campaigns\": [ {\"id\": ").expect("seed");
    kv.set(&config.view_key, "[]").expect("seed view");

    let mut ws = open(&config, 0);
    assert!(ws.store().is_empty());
    assert_eq!(ws.view().sort(), SortOrder::Newest);

    ws.create_campaign(lorekeep::ops::CampaignDraft::new("Fresh start"))
        .expect("create");
    let reopened = open(&config, 10);
    assert_eq!(reopened.store().campaigns().len(), 1);
}

#[test]
fn config_file_drives_keys_and_defaults() {
    let tmp = TempDir::new("config");
    let config_path = tmp.path().join("lorekeep.json");
    let data_dir = tmp.path().join("notes");
    fs::write(
        &config_path,
        serde_json::json!({
            "storeKey": "dnd.store",
            "viewKey": "dnd.ui",
            "dataDir": data_dir,
            "durability": "durable",
            "defaultSort": "oldest",
            "defaultFilter": "npc",
        })
        .to_string(),
    )
    .expect("write config");

    let config = Config::load(&config_path).expect("config");
    assert_eq!(config.durability, WriteDurability::Durable);

    let mut ws = Workspace::open_dir(&config).expect("open");
    assert_eq!(ws.view().sort(), SortOrder::Oldest);
    assert_eq!(ws.view().filter(), EntryFilter::Type(EntryType::Npc));

    ws.create_campaign(lorekeep::ops::CampaignDraft::new("Keyed"))
        .expect("create");
    assert!(data_dir.join("dnd.store.json").is_file());
    assert!(!data_dir.join("lorekeep.store.json").exists());
}
