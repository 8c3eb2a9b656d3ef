// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::campaign::{insert_unique, remove_all};
use super::ids::{EntryId, SessionId};
use super::property::PropertyValues;
use super::tags::Tags;

/// Category of an entry. Closed set; drives the property template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryType {
    Npc,
    Location,
    Item,
    Note,
    Quest,
}

impl EntryType {
    pub const ALL: [EntryType; 5] = [
        Self::Npc,
        Self::Location,
        Self::Item,
        Self::Note,
        Self::Quest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Npc => "npc",
            Self::Location => "location",
            Self::Item => "item",
            Self::Note => "note",
            Self::Quest => "quest",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEntryTypeError {
    value: String,
}

impl fmt::Display for ParseEntryTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid entry type {:?}", self.value)
    }
}

impl std::error::Error for ParseEntryTypeError {}

impl FromStr for EntryType {
    type Err = ParseEntryTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "npc" => Ok(Self::Npc),
            "location" => Ok(Self::Location),
            "item" => Ok(Self::Item),
            "note" => Ok(Self::Note),
            // Older forms labelled quests as events.
            "quest" | "event" => Ok(Self::Quest),
            _ => Err(ParseEntryTypeError {
                value: s.to_owned(),
            }),
        }
    }
}

/// A typed note (NPC, location, ...) that lives in one session, or in many if global.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    entry_id: EntryId,
    title: String,
    content: String,
    entry_type: EntryType,
    tags: Tags,
    starred: bool,
    global: bool,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    session_ids: Vec<SessionId>,
    properties: PropertyValues,
}

impl Entry {
    /// Creates a local entry owned by `origin`.
    pub fn new(
        entry_id: EntryId,
        origin: SessionId,
        entry_type: EntryType,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            entry_id,
            title: title.into(),
            content: String::new(),
            entry_type,
            tags: Tags::new(),
            starred: false,
            global: false,
            created: now,
            updated: now,
            session_ids: vec![origin],
            properties: PropertyValues::default(),
        }
    }

    /// Rebuilds an entry from persisted state; membership may be empty for orphaned globals.
    pub(crate) fn restored(
        entry_id: EntryId,
        session_ids: Vec<SessionId>,
        entry_type: EntryType,
        title: impl Into<String>,
        global: bool,
    ) -> Self {
        Self {
            entry_id,
            title: title.into(),
            content: String::new(),
            entry_type,
            tags: Tags::new(),
            starred: false,
            global,
            created: DateTime::<Utc>::UNIX_EPOCH,
            updated: DateTime::<Utc>::UNIX_EPOCH,
            session_ids,
            properties: PropertyValues::default(),
        }
    }

    pub fn entry_id(&self) -> &EntryId {
        &self.entry_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn set_entry_type(&mut self, entry_type: EntryType) {
        self.entry_type = entry_type;
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn set_tags(&mut self, tags: Tags) {
        self.tags = tags;
    }

    pub fn starred(&self) -> bool {
        self.starred
    }

    pub fn set_starred(&mut self, starred: bool) {
        self.starred = starred;
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub(crate) fn set_global(&mut self, global: bool) {
        self.global = global;
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

    /// The membership set, in insertion order. The first id is the originating session for as
    /// long as it has not been unimported.
    pub fn session_ids(&self) -> &[SessionId] {
        &self.session_ids
    }

    pub fn origin_session_id(&self) -> Option<&SessionId> {
        self.session_ids.first()
    }

    pub fn in_session(&self, session_id: &SessionId) -> bool {
        self.session_ids.contains(session_id)
    }

    pub(crate) fn insert_session_id(&mut self, session_id: SessionId) -> bool {
        insert_unique(&mut self.session_ids, session_id)
    }

    pub(crate) fn remove_session_id(&mut self, session_id: &SessionId) -> bool {
        remove_all(&mut self.session_ids, session_id)
    }

    pub(crate) fn set_session_ids(&mut self, session_ids: Vec<SessionId>) {
        self.session_ids = session_ids;
    }

    pub fn properties(&self) -> &PropertyValues {
        &self.properties
    }

    pub(crate) fn set_properties(&mut self, properties: PropertyValues) {
        self.properties = properties;
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::EntryType;

    #[rstest]
    #[case("npc", EntryType::Npc)]
    #[case("location", EntryType::Location)]
    #[case("item", EntryType::Item)]
    #[case("note", EntryType::Note)]
    #[case("quest", EntryType::Quest)]
    #[case("event", EntryType::Quest)]
    fn entry_type_parses_labels(#[case] label: &str, #[case] expected: EntryType) {
        assert_eq!(label.parse::<EntryType>(), Ok(expected));
    }

    #[test]
    fn entry_type_rejects_unknown_label() {
        assert!("monster".parse::<EntryType>().is_err());
        assert!("NPC".parse::<EntryType>().is_err());
    }

    #[test]
    fn entry_type_round_trips_through_as_str() {
        for entry_type in EntryType::ALL {
            assert_eq!(entry_type.as_str().parse::<EntryType>(), Ok(entry_type));
        }
    }
}
