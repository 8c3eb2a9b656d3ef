// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorekeep-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorekeep and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structured entry properties.
//!
//! Each [`EntryType`] maps to a [`Template`], which is an ordered list of standard [`Module`]s.
//! A module declares typed [`PropertySpec`]s; an entry stores its values grouped by module id in
//! [`PropertyValues`] and every write is checked with [`validate_properties`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use super::entry::EntryType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Text,
    Number,
    Date,
    Tags,
}

impl PropertyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    Tags(Vec<String>),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Text(_) => PropertyKind::Text,
            Self::Number(_) => PropertyKind::Number,
            Self::Date(_) => PropertyKind::Date,
            Self::Tags(_) => PropertyKind::Tags,
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Tags(tags) => tags.is_empty(),
            Self::Number(_) | Self::Date(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertySpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: PropertyKind,
    pub required: bool,
    pub multiline: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PropertySpec {
    const fn text(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            kind: PropertyKind::Text,
            required: false,
            multiline: false,
            min: None,
            max: None,
        }
    }

    const fn tags(id: &'static str, label: &'static str) -> Self {
        Self {
            kind: PropertyKind::Tags,
            ..Self::text(id, label)
        }
    }

    const fn number(id: &'static str, label: &'static str, min: f64) -> Self {
        Self {
            kind: PropertyKind::Number,
            min: Some(min),
            ..Self::text(id, label)
        }
    }

    const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    const fn multiline(self) -> Self {
        Self {
            multiline: true,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Module {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub properties: &'static [PropertySpec],
}

impl Module {
    pub fn property(&self, property_id: &str) -> Option<&'static PropertySpec> {
        self.properties.iter().find(|p| p.id == property_id)
    }
}

pub const IDENTITY_MODULE: Module = Module {
    id: "identity",
    label: "Basic Information",
    description: "Basic identifying information",
    properties: &[
        PropertySpec::text("name", "Name").required(),
        PropertySpec::tags("aliases", "Aliases"),
        PropertySpec::text("description", "Description").multiline(),
    ],
};

pub const LOCATION_MODULE: Module = Module {
    id: "location",
    label: "Location",
    description: "Where this can be found",
    properties: &[
        PropertySpec::text("region", "Region"),
        PropertySpec::text("settlement", "Settlement"),
        PropertySpec::text("specificLocation", "Specific Location"),
    ],
};

pub const STATS_MODULE: Module = Module {
    id: "stats",
    label: "Stats",
    description: "Combat statistics",
    properties: &[
        PropertySpec::number("level", "Level", 1.0),
        PropertySpec::number("hitPoints", "Hit Points", 0.0),
        PropertySpec::number("armorClass", "Armor Class", 0.0),
    ],
};

pub const NOTES_MODULE: Module = Module {
    id: "notes",
    label: "Notes",
    description: "Additional notes and information",
    properties: &[
        PropertySpec::text("content", "Content").multiline(),
        PropertySpec::tags("tags", "Tags"),
    ],
};

const STANDARD_MODULES: [&Module; 4] = [
    &IDENTITY_MODULE,
    &LOCATION_MODULE,
    &STATS_MODULE,
    &NOTES_MODULE,
];

pub fn standard_module(module_id: &str) -> Option<&'static Module> {
    STANDARD_MODULES.into_iter().find(|m| m.id == module_id)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Template {
    pub entry_type: EntryType,
    pub modules: &'static [&'static Module],
}

impl Template {
    pub fn module(&self, module_id: &str) -> Option<&'static Module> {
        self.modules.iter().copied().find(|m| m.id == module_id)
    }
}

const NPC_MODULES: &[&Module] = &[&IDENTITY_MODULE, &STATS_MODULE, &NOTES_MODULE];
const LOCATION_MODULES: &[&Module] = &[&IDENTITY_MODULE, &LOCATION_MODULE, &NOTES_MODULE];
const ITEM_MODULES: &[&Module] = &[&IDENTITY_MODULE, &NOTES_MODULE];
const NOTE_MODULES: &[&Module] = &[&NOTES_MODULE];

pub fn template_for(entry_type: EntryType) -> Template {
    let modules = match entry_type {
        EntryType::Npc => NPC_MODULES,
        EntryType::Location => LOCATION_MODULES,
        EntryType::Item | EntryType::Quest => ITEM_MODULES,
        EntryType::Note => NOTE_MODULES,
    };
    Template {
        entry_type,
        modules,
    }
}

/// Property values grouped as `module id -> property id -> value`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyValues(BTreeMap<String, BTreeMap<String, PropertyValue>>);

impl PropertyValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        module_id: impl Into<String>,
        property_id: impl Into<String>,
        value: PropertyValue,
    ) {
        self.0
            .entry(module_id.into())
            .or_default()
            .insert(property_id.into(), value);
    }

    pub fn get(&self, module_id: &str, property_id: &str) -> Option<&PropertyValue> {
        self.0.get(module_id)?.get(property_id)
    }

    pub fn modules(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, PropertyValue>)> {
        self.0.iter().map(|(id, values)| (id.as_str(), values))
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Drops every module that `template` does not include.
    pub fn retain_template(&mut self, template: &Template) {
        self.0.retain(|module_id, _| template.module(module_id).is_some());
    }

    /// Overlays `other` on top of `self`, module by module.
    pub fn merge(&mut self, other: PropertyValues) {
        for (module_id, values) in other.0 {
            self.0.entry(module_id).or_default().extend(values);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    UnknownModule {
        entry_type: EntryType,
        module_id: String,
    },
    UnknownProperty {
        module_id: String,
        property_id: String,
    },
    KindMismatch {
        module_id: String,
        property_id: String,
        expected: PropertyKind,
        found: PropertyKind,
    },
    RequiredMissing {
        module_id: String,
        property_id: String,
    },
    OutOfRange {
        module_id: String,
        property_id: String,
        value: f64,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownModule {
                entry_type,
                module_id,
            } => write!(f, "module '{module_id}' is not part of the {entry_type} template"),
            Self::UnknownProperty {
                module_id,
                property_id,
            } => write!(f, "module '{module_id}' has no property '{property_id}'"),
            Self::KindMismatch {
                module_id,
                property_id,
                expected,
                found,
            } => write!(
                f,
                "property {module_id}.{property_id} expects {expected}, got {found}"
            ),
            Self::RequiredMissing {
                module_id,
                property_id,
            } => write!(f, "property {module_id}.{property_id} is required"),
            Self::OutOfRange {
                module_id,
                property_id,
                value,
            } => write!(f, "property {module_id}.{property_id} is out of range ({value})"),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Checks `values` against the template of `entry_type`.
///
/// Modules the entry never filled in are skipped; once a module has any value, its required
/// properties must be present and non-blank.
pub fn validate_properties(
    entry_type: EntryType,
    values: &PropertyValues,
) -> Result<(), SchemaError> {
    let template = template_for(entry_type);

    for (module_id, module_values) in values.modules() {
        if module_values.is_empty() {
            continue;
        }
        let Some(module) = template.module(module_id) else {
            return Err(SchemaError::UnknownModule {
                entry_type,
                module_id: module_id.to_owned(),
            });
        };

        for (property_id, value) in module_values {
            let Some(spec) = module.property(property_id) else {
                return Err(SchemaError::UnknownProperty {
                    module_id: module_id.to_owned(),
                    property_id: property_id.clone(),
                });
            };
            check_value(module_id, spec, value)?;
        }

        for spec in module.properties.iter().filter(|p| p.required) {
            let present = module_values
                .get(spec.id)
                .is_some_and(|value| !value.is_blank());
            if !present {
                return Err(SchemaError::RequiredMissing {
                    module_id: module_id.to_owned(),
                    property_id: spec.id.to_owned(),
                });
            }
        }
    }

    Ok(())
}

fn check_value(
    module_id: &str,
    spec: &PropertySpec,
    value: &PropertyValue,
) -> Result<(), SchemaError> {
    if value.kind() != spec.kind {
        return Err(SchemaError::KindMismatch {
            module_id: module_id.to_owned(),
            property_id: spec.id.to_owned(),
            expected: spec.kind,
            found: value.kind(),
        });
    }

    if let PropertyValue::Number(number) = value {
        let below = spec.min.is_some_and(|min| *number < min);
        let above = spec.max.is_some_and(|max| *number > max);
        if !number.is_finite() || below || above {
            return Err(SchemaError::OutOfRange {
                module_id: module_id.to_owned(),
                property_id: spec.id.to_owned(),
                value: *number,
            });
        }
    }

    Ok(())
}
