// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Which entries a viewing context shows, and in which order.

use std::fmt;
use std::str::FromStr;

use memchr::memmem;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::{Entry, EntryType, SessionId, Store};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Entries whose membership set contains the session.
    Session(SessionId),
    /// Every global entry, regardless of membership.
    Global,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EntryFilter {
    #[default]
    All,
    Starred,
    Type(EntryType),
}

impl EntryFilter {
    pub fn matches(self, entry: &Entry) -> bool {
        match self {
            Self::All => true,
            Self::Starred => entry.starred(),
            Self::Type(entry_type) => entry.entry_type() == entry_type,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Starred => "starred",
            Self::Type(entry_type) => entry_type.as_str(),
        }
    }
}

impl fmt::Display for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEntryFilterError {
    value: String,
}

impl fmt::Display for ParseEntryFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown entry filter '{}'", self.value)
    }
}

impl std::error::Error for ParseEntryFilterError {}

impl FromStr for EntryFilter {
    type Err = ParseEntryFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "starred" => Ok(Self::Starred),
            other => other
                .parse::<EntryType>()
                .map(Self::Type)
                .map_err(|_| ParseEntryFilterError {
                    value: other.to_owned(),
                }),
        }
    }
}

impl Serialize for EntryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntryFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for EntryFilter {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        "EntryFilter".into()
    }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        let mut labels = vec!["all", "starred"];
        labels.extend(EntryType::ALL.iter().map(|entry_type| entry_type.as_str()));
        schemars::json_schema!({
            "type": "string",
            "enum": labels,
        })
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortOrderError {
    value: String,
}

impl fmt::Display for ParseSortOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort order '{}'", self.value)
    }
}

impl std::error::Error for ParseSortOrderError {}

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            other => Err(ParseSortOrderError {
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContext {
    pub scope: Scope,
    pub filter: EntryFilter,
    pub search: String,
    pub sort: SortOrder,
}

impl ViewContext {
    pub fn session(session_id: SessionId) -> Self {
        Self {
            scope: Scope::Session(session_id),
            filter: EntryFilter::All,
            search: String::new(),
            sort: SortOrder::Newest,
        }
    }

    pub fn global() -> Self {
        Self {
            scope: Scope::Global,
            filter: EntryFilter::All,
            search: String::new(),
            sort: SortOrder::Newest,
        }
    }

    pub fn with_filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

/// Case-insensitive substring matcher over title, content and tags.
struct SearchTerm {
    finder: Option<memmem::Finder<'static>>,
}

impl SearchTerm {
    fn new(term: &str) -> Self {
        if term.is_empty() {
            return Self { finder: None };
        }
        let needle = term.to_lowercase();
        Self {
            finder: Some(memmem::Finder::new(needle.as_bytes()).into_owned()),
        }
    }

    fn matches(&self, entry: &Entry) -> bool {
        let Some(finder) = &self.finder else {
            return true;
        };
        let hit = |text: &str| finder.find(text.to_lowercase().as_bytes()).is_some();
        hit(entry.title()) || hit(entry.content()) || entry.tags().iter().any(hit)
    }
}

/// Resolves the ordered list of entries shown for `context`.
///
/// Candidates come from the scope, then the filter and the search term are applied, and the result
/// is sorted by `updated`. The sort is stable, so equal timestamps keep store insertion order.
pub fn visible_entries<'a>(store: &'a Store, context: &ViewContext) -> Vec<&'a Entry> {
    let search = SearchTerm::new(&context.search);

    let mut visible = store
        .entries()
        .values()
        .filter(|entry| match &context.scope {
            Scope::Session(session_id) => entry.in_session(session_id),
            Scope::Global => entry.is_global(),
        })
        .filter(|entry| context.filter.matches(entry))
        .filter(|entry| search.matches(entry))
        .collect::<Vec<_>>();

    match context.sort {
        SortOrder::Newest => visible.sort_by(|a, b| b.updated().cmp(&a.updated())),
        SortOrder::Oldest => visible.sort_by_key(|entry| entry.updated()),
    }
    visible
}

/// Global entries that could still be imported into `session_id`, newest first.
pub fn importable_entries<'a>(store: &'a Store, session_id: &SessionId) -> Vec<&'a Entry> {
    let mut importable = store
        .entries()
        .values()
        .filter(|entry| entry.is_global() && !entry.in_session(session_id))
        .collect::<Vec<_>>();
    importable.sort_by(|a, b| b.updated().cmp(&a.updated()));
    importable
}
