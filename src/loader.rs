use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::columns::ColumnMapping;
use crate::error::IngestError;
use crate::normalize::normalize_rows;
use crate::reconcile::reconcile;
use crate::tokenizer::tokenize;
use crate::types::IngestResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub malformed_rows: usize,
    pub empty_team_rows: usize,
    pub no_user_rows: usize,
    pub teams: usize,
    pub teams_with_history: usize,
    pub long_format: bool,
}

/// Run the whole ingestion pipeline over the text of one CSV export.
///
/// Only three things are fatal: no data lines, no well-formed rows, and no
/// team column. Everything else is defaulted and tallied in the
/// [`LoadReport`].
pub fn load_and_clean(text: &str) -> Result<IngestResult, IngestError> {
    let table = tokenize(text)?;
    let mapping = ColumnMapping::detect(&table.headers)?;
    let total_rows = table.rows.len() + table.malformed_rows;

    let long_format = mapping.is_long_format();
    let reconciled = reconcile(table.rows, &mapping);
    let (records, skipped) = normalize_rows(&reconciled.rows, &mapping);

    if !long_format {
        let mut seen = HashSet::new();
        for r in &records {
            if !seen.insert(r.team.as_str()) {
                warn!(team = %r.team, "team appears more than once in wide-format file");
            }
        }
    }

    let report = LoadReport {
        total_rows,
        malformed_rows: table.malformed_rows,
        empty_team_rows: reconciled.dropped_empty_team + skipped.empty_team,
        no_user_rows: skipped.no_users,
        teams: records.len(),
        teams_with_history: reconciled.weekly_history.len(),
        long_format,
    };
    info!(
        rows = report.total_rows,
        teams = report.teams,
        malformed = report.malformed_rows,
        long_format = report.long_format,
        "loaded usage export"
    );

    Ok(IngestResult {
        records,
        mapping,
        weekly_history: reconciled.weekly_history,
        report,
    })
}
