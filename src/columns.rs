//! Header detection for the different usage-report layouts.
//!
//! Exports from different admin portals name the same concept in different
//! ways ("Team", "Division", "Organization (Aggregated)", ...). Each
//! canonical [`Field`] has an ordered list of candidate names; a header
//! matches when its lowercase text *contains* the lowercase candidate, so
//! decorated headers like `"Active Users %"` are still recognised.
//!
//! Priority is entirely data-driven by [`COLUMN_SYNONYMS`]: candidates are
//! tried in order, and for each candidate the headers are scanned in file
//! order. Fields are matched independently, so one header may serve
//! several fields.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::error::IngestError;

/// Canonical semantic fields of a usage export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Team,
    EnabledUsers,
    ActiveUsers,
    TotalActions,
    MonthlyActions,
    Engagement,
    ActiveUsersPercent,
    PowerUsers,
    Date,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Team => "team",
            Field::EnabledUsers => "enabledUsers",
            Field::ActiveUsers => "activeUsers",
            Field::TotalActions => "totalActions",
            Field::MonthlyActions => "monthlyActions",
            Field::Engagement => "engagement",
            Field::ActiveUsersPercent => "activeUsersPercent",
            Field::PowerUsers => "powerUsers",
            Field::Date => "date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type SynonymTable = [(Field, &'static [&'static str])];

/// Candidate header names per field, highest priority first.
pub const COLUMN_SYNONYMS: &SynonymTable = &[
    (
        Field::Team,
        &[
            "Team",
            "Division",
            "Department",
            "Organization",
            "Org",
            "Team Name",
            "Division Name",
            "Organization (Aggregated)",
        ],
    ),
    (
        Field::EnabledUsers,
        &["Enabled Users", "Licensed Users", "Total Users", "Enabled"],
    ),
    (Field::ActiveUsers, &["Active Users", "Active", "Users"]),
    (
        Field::TotalActions,
        &["Total Actions", "Actions", "Total Activity", "Avg Copilot Actions"],
    ),
    (
        Field::MonthlyActions,
        &["Monthly Actions", "Monthly Activity", "Actions (Monthly)"],
    ),
    (
        Field::Engagement,
        &[
            "Engagement %",
            "Engagement",
            "Engagement Rate",
            "Engagement Percentage",
        ],
    ),
    (
        Field::ActiveUsersPercent,
        &["% Active Users", "Active Users %", "Active %"],
    ),
    (
        Field::PowerUsers,
        &["% Power Users", "Power Users %", "Power Users"],
    ),
    (Field::Date, &["Date", "Week", "Period", "Week Ending"]),
];

/// Canonical field -> header text found in the current file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    matched: BTreeMap<Field, String>,
}

impl ColumnMapping {
    /// Match `headers` against [`COLUMN_SYNONYMS`]. Fails when no team
    /// column can be found.
    pub fn detect(headers: &[String]) -> Result<Self, IngestError> {
        let mapping = match_columns(headers, COLUMN_SYNONYMS);
        if mapping.header(Field::Team).is_none() {
            return Err(IngestError::MissingRequiredColumn);
        }
        Ok(mapping)
    }

    pub fn header(&self, field: Field) -> Option<&str> {
        self.matched.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.matched.contains_key(&field)
    }

    /// A date column means one row per team per week.
    pub fn is_long_format(&self) -> bool {
        self.contains(Field::Date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.matched.iter().map(|(f, h)| (*f, h.as_str()))
    }

    pub fn len(&self) -> usize {
        self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

/// Resolve every field of `table` against `headers`. Unmatched fields are
/// simply absent from the result.
pub fn match_columns(headers: &[String], table: &SynonymTable) -> ColumnMapping {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let mut matched = BTreeMap::new();

    for (field, candidates) in table {
        let hit = candidates.iter().find_map(|candidate| {
            let needle = candidate.to_lowercase();
            lowered.iter().position(|h| h.contains(&needle))
        });
        if let Some(idx) = hit {
            debug!(field = %field, header = %headers[idx], "matched column");
            matched.insert(*field, headers[idx].clone());
        }
    }

    ColumnMapping { matched }
}
