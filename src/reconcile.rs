use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

use crate::columns::{ColumnMapping, Field};
use crate::dates::parse_date;
use crate::types::{RawRow, WeeklyHistory, WeeklyObservation};
use crate::util::parse_number_opt;

/// Rows collapsed to one snapshot per team, plus the weekly series each
/// snapshot was picked from.
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    pub rows: Vec<RawRow>,
    pub weekly_history: WeeklyHistory,
    pub dropped_empty_team: usize,
}

/// Collapse long-format input (one row per team per week) into one row per
/// team.
///
/// Wide-format input (no date column mapped) passes through untouched.
/// For long format, rows are grouped by team in first-seen order and the
/// most recent dated row becomes the team's snapshot. Every dated row is
/// kept in the team's history, newest first. A team whose dates are all
/// unparseable is represented by its first row and gets no history.
pub fn reconcile(rows: Vec<RawRow>, mapping: &ColumnMapping) -> Reconciled {
    if !mapping.is_long_format() {
        return Reconciled {
            rows,
            ..Reconciled::default()
        };
    }

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<RawRow>> = HashMap::new();
    let mut dropped_empty_team = 0usize;
    for row in rows {
        let Some(team) = row.non_empty_field(mapping, Field::Team).map(str::to_string) else {
            dropped_empty_team += 1;
            continue;
        };
        groups
            .entry(team.clone())
            .or_insert_with(|| {
                order.push(team);
                Vec::new()
            })
            .push(row);
    }

    let mut snapshots = Vec::with_capacity(order.len());
    let mut weekly_history = HashMap::new();
    for team in order {
        let Some(mut group) = groups.remove(&team) else {
            continue;
        };

        let mut dated: Vec<(NaiveDate, usize)> = group
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| {
                row.field(mapping, Field::Date)
                    .and_then(parse_date)
                    .map(|d| (d, idx))
            })
            .collect();

        if dated.is_empty() {
            debug!(team = %team, rows = group.len(), "no parseable dates; using first row");
            if let Some(first) = group.into_iter().next() {
                snapshots.push(first);
            }
            continue;
        }

        // Stable: equal dates keep file order.
        dated.sort_by(|a, b| b.0.cmp(&a.0));

        let history: Vec<WeeklyObservation> = dated
            .iter()
            .map(|(date, idx)| WeeklyObservation {
                date: *date,
                actions_per_user: parse_number_opt(group[*idx].field(mapping, Field::TotalActions)),
            })
            .collect();

        let latest = dated[0].1;
        snapshots.push(group.swap_remove(latest));
        weekly_history.insert(team, history);
    }

    debug!(
        teams = snapshots.len(),
        with_history = weekly_history.len(),
        "reconciled long-format rows"
    );

    Reconciled {
        rows: snapshots,
        weekly_history,
        dropped_empty_team,
    }
}
