// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Duration, TimeZone, Utc};
use lorekeep::model::{CampaignId, EntryId, SessionId};
use lorekeep::Clock;

/// Routes `tracing` output to the test harness; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("lorekeep_it_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// `at(0)` is 2026-03-01T12:00:00Z; each step is one minute.
pub fn at(step: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(step)
}

/// Clock that advances one minute per reading, starting at `at(start)`.
pub struct StepClock(Cell<i64>);

impl StepClock {
    pub fn starting_at(start: i64) -> Self {
        Self(Cell::new(start))
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let step = self.0.get();
        self.0.set(step + 1);
        at(step)
    }
}

pub fn cid(value: &str) -> CampaignId {
    CampaignId::new(value).expect("campaign id")
}

pub fn sid(value: &str) -> SessionId {
    SessionId::new(value).expect("session id")
}

pub fn eid(value: &str) -> EntryId {
    EntryId::new(value).expect("entry id")
}
