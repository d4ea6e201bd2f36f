use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tabled::Tabled;

use crate::columns::{ColumnMapping, Field};
use crate::loader::LoadReport;

/// One data line of the input, keyed by header text.
///
/// Only lives between tokenizing and normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    values: HashMap<String, String>,
}

impl RawRow {
    /// Zip a header line with a data line. A repeated header keeps the
    /// value of its last column.
    pub fn from_fields<'a, I>(headers: &[String], fields: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let values = headers
            .iter()
            .cloned()
            .zip(fields.into_iter().map(str::to_string))
            .collect();
        Self { values }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }

    /// Value of a canonical field, `None` when the field is unmapped.
    pub fn field<'a>(&'a self, mapping: &ColumnMapping, field: Field) -> Option<&'a str> {
        mapping.header(field).and_then(|h| self.get(h))
    }

    /// Like `field` but also treats an empty cell as missing.
    pub fn non_empty_field<'a>(&'a self, mapping: &ColumnMapping, field: Field) -> Option<&'a str> {
        self.field(mapping, field).filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyObservation {
    pub date: NaiveDate,
    pub actions_per_user: f64,
}

/// Canonical usage snapshot for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRecord {
    pub team: String,
    pub enabled_users: f64,
    pub active_users: f64,
    pub weekly_actions: f64,
    pub monthly_actions: f64,
    pub engagement: f64,
    pub actions_per_user: f64,
    pub power_users: f64,
}

pub type WeeklyHistory = HashMap<String, Vec<WeeklyObservation>>;

/// Everything produced by one ingestion of a CSV file.
#[derive(Debug, Clone, Serialize)]
pub struct IngestResult {
    pub records: Vec<TeamRecord>,
    pub mapping: ColumnMapping,
    pub weekly_history: WeeklyHistory,
    pub report: LoadReport,
}

impl IngestResult {
    pub fn history_for(&self, team: &str) -> Option<&[WeeklyObservation]> {
        self.weekly_history.get(team).map(Vec::as_slice)
    }
}

/// Week with the highest per-user action rate. `date` is `None` when the
/// team had no dated history and the snapshot rate is used instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakWeek {
    pub date: Option<NaiveDate>,
    pub actions_per_user: f64,
}

/// A team record combined with the config-dependent figures used for
/// ranking. Rebuilt on every report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamView {
    #[serde(flatten)]
    pub record: TeamRecord,
    pub monthly_value: f64,
    pub weekly_hours: f64,
    pub peak_week: PeakWeek,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TeamRow {
    #[serde(rename = "Team/Division")]
    #[tabled(rename = "Team/Division")]
    pub team: String,
    #[serde(rename = "Active Users")]
    #[tabled(rename = "Active Users")]
    pub active_users: String,
    #[serde(rename = "Power Users")]
    #[tabled(rename = "Power Users")]
    pub power_users: String,
    #[serde(rename = "Weekly Actions")]
    #[tabled(rename = "Weekly Actions")]
    pub weekly_actions: String,
    #[serde(rename = "Actions/User")]
    #[tabled(rename = "Actions/User")]
    pub actions_per_user: String,
    #[serde(rename = "Peak Performance Week")]
    #[tabled(rename = "Peak Performance Week")]
    pub peak_week: String,
    #[serde(rename = "Weekly Hours")]
    #[tabled(rename = "Weekly Hours")]
    pub weekly_hours: String,
    #[serde(rename = "Monthly Value")]
    #[tabled(rename = "Monthly Value")]
    pub monthly_value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct LeaderboardRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Team")]
    #[tabled(rename = "Team")]
    pub team: String,
    #[serde(rename = "MonthlyValue")]
    #[tabled(rename = "Monthly Value")]
    pub monthly_value: String,
    #[serde(rename = "WeeklyHours")]
    #[tabled(rename = "Hours/Week")]
    pub weekly_hours: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RoiRow {
    #[tabled(rename = "Time Savings Assumption")]
    pub assumption: String,
    #[tabled(rename = "Hours/Month")]
    pub hours_per_month: String,
    #[tabled(rename = "Monthly Value")]
    pub monthly_value: String,
    #[tabled(rename = "Annual Value")]
    pub annual_value: String,
    #[tabled(rename = "Monthly ROI Multiple")]
    pub roi_multiple: String,
}
