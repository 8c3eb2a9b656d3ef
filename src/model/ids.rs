// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// A stable identifier shared by the model, the ops layer and the persisted documents.
///
/// The value is opaque: ids written by older builds (e.g. millisecond timestamps) load fine.
/// The only requirements are that it is non-empty, has no surrounding whitespace and contains
/// no control characters, because ids end up as JSON strings and as `FileKv` key segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Mints a fresh random id.
    pub fn generate() -> Self {
        Self {
            value: uuid::Uuid::new_v4().to_string(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    SurroundingWhitespace,
    ControlCharacter,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::SurroundingWhitespace => {
                f.write_str("id must not start or end with whitespace")
            }
            Self::ControlCharacter => f.write_str("id must not contain control characters"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.trim() != value {
        return Err(IdError::SurroundingWhitespace);
    }
    if value.chars().any(char::is_control) {
        return Err(IdError::ControlCharacter);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CampaignIdTag {}
pub type CampaignId = Id<CampaignIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionIdTag {}
pub type SessionId = Id<SessionIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryIdTag {}
pub type EntryId = Id<EntryIdTag>;

#[cfg(test)]
mod tests {
    use super::{Id, IdError, SessionId};

    #[test]
    fn id_rejects_empty() {
        let result: Result<Id<()>, _> = Id::new("");
        assert_eq!(result, Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_surrounding_whitespace() {
        let result: Result<Id<()>, _> = Id::new(" s1");
        assert_eq!(result, Err(IdError::SurroundingWhitespace));
    }

    #[test]
    fn id_rejects_control_characters() {
        let result: Result<Id<()>, _> = Id::new("s\n1");
        assert_eq!(result, Err(IdError::ControlCharacter));
    }

    #[test]
    fn id_accepts_legacy_timestamp_ids() {
        let id: SessionId = "1712345678901".parse().expect("timestamp id");
        assert_eq!(id.as_str(), "1712345678901");
    }

    #[test]
    fn generated_ids_are_valid_and_distinct() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert!(SessionId::new(a.as_str()).is_ok());
    }
}
