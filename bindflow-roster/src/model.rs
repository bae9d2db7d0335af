// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Roster data model and the pure record-to-row projection.

use serde::{Deserialize, Serialize};

/// Login context handed to the record fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    /// Opaque credential, passed through unchanged.
    pub token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

/// A raw roster entry as returned by a record fetcher.
///
/// Only `name` and `age` feed the projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Record {
    pub name: String,
    pub age: u32,
}

impl Record {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

/// Display-ready projection of a [`Record`].
///
/// Serializes as `{"displayName": ..., "displayAge": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub display_name: String,
    pub display_age: String,
}

impl DisplayRow {
    pub fn new(display_name: impl Into<String>, display_age: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            display_age: display_age.into(),
        }
    }
}

/// Suffixes appended by the projection.
///
/// Defaults to the honorific `様` after names and `ちゃい` after ages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decorations {
    #[serde(default = "default_name_suffix")]
    pub name_suffix: String,
    #[serde(default = "default_age_suffix")]
    pub age_suffix: String,
}

fn default_name_suffix() -> String {
    "様".to_string()
}

fn default_age_suffix() -> String {
    "ちゃい".to_string()
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            name_suffix: default_name_suffix(),
            age_suffix: default_age_suffix(),
        }
    }
}

impl Decorations {
    pub fn new(name_suffix: impl Into<String>, age_suffix: impl Into<String>) -> Self {
        Self {
            name_suffix: name_suffix.into(),
            age_suffix: age_suffix.into(),
        }
    }

    /// No suffixes: names and ages are shown as they are.
    pub fn plain() -> Self {
        Self::new("", "")
    }

    /// Projects a single record. Pure: equal records always give equal rows.
    pub fn project(&self, record: &Record) -> DisplayRow {
        DisplayRow {
            display_name: format!("{}{}", record.name, self.name_suffix),
            display_age: format!("{}{}", record.age, self.age_suffix),
        }
    }

    /// Sorts records ascending by age and projects each of them.
    ///
    /// The sort is stable: records of equal age keep their fetch order.
    ///
    /// ```
    /// use bindflow_roster::{Decorations, Record};
    ///
    /// let rows = Decorations::default().present(vec![Record::new("a", 9), Record::new("b", 3)]);
    /// assert_eq!(rows[0].display_name, "b様");
    /// assert_eq!(rows[1].display_age, "9ちゃい");
    /// ```
    pub fn present(&self, mut records: Vec<Record>) -> Vec<DisplayRow> {
        records.sort_by_key(|record| record.age);
        records.iter().map(|record| self.project(record)).collect()
    }
}
