// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

/// Ordered tag list attached to campaigns, sessions and entries.
///
/// Insertion order is kept for display and duplicates survive a round-trip, but membership
/// checks treat the list as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<SmolStr>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: impl Into<SmolStr>) {
        self.0.push(tag.into());
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(SmolStr::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<SmolStr>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
