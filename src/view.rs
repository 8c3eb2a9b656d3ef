// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persisted UI state.
//!
//! Filter, sort order, search term, theme and the global-view toggle survive restarts alongside
//! the store. The active campaign/session live in the store itself because ops keep them
//! consistent with deletes.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::SessionId;
use crate::query::{EntryFilter, Scope, SortOrder, ViewContext};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(ParseThemeError {
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError {
    value: String,
}

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme '{}'", self.value)
    }
}

impl std::error::Error for ParseThemeError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    rev: u64,
    filter: EntryFilter,
    sort: SortOrder,
    search: String,
    theme: Theme,
    global_view: bool,
}

impl ViewState {
    pub fn new(filter: EntryFilter, sort: SortOrder) -> Self {
        Self {
            filter,
            sort,
            ..Self::default()
        }
    }

    pub(crate) fn restored(
        filter: EntryFilter,
        sort: SortOrder,
        search: String,
        theme: Theme,
        global_view: bool,
    ) -> Self {
        Self {
            rev: 0,
            filter,
            sort,
            search,
            theme,
            global_view,
        }
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn filter(&self) -> EntryFilter {
        self.filter
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn global_view(&self) -> bool {
        self.global_view
    }

    pub fn set_filter(&mut self, filter: EntryFilter) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        self.bump();
        true
    }

    pub fn set_sort(&mut self, sort: SortOrder) -> bool {
        if self.sort == sort {
            return false;
        }
        self.sort = sort;
        self.bump();
        true
    }

    pub fn set_search(&mut self, search: impl Into<String>) -> bool {
        let search = search.into();
        if self.search == search {
            return false;
        }
        self.search = search;
        self.bump();
        true
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if self.theme == theme {
            return false;
        }
        self.theme = theme;
        self.bump();
        true
    }

    pub fn set_global_view(&mut self, global_view: bool) -> bool {
        if self.global_view == global_view {
            return false;
        }
        self.global_view = global_view;
        self.bump();
        true
    }

    /// Viewing context for the given session, or the global view when it is toggled on.
    ///
    /// Returns `None` when neither applies, i.e. no session is active and the global view is off.
    pub fn context(&self, active_session_id: Option<&SessionId>) -> Option<ViewContext> {
        let scope = if self.global_view {
            Scope::Global
        } else {
            Scope::Session(active_session_id?.clone())
        };
        Some(ViewContext {
            scope,
            filter: self.filter,
            search: self.search.clone(),
            sort: self.sort,
        })
    }

    fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }
}
