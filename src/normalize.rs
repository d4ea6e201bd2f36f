use tracing::debug;

use crate::columns::{ColumnMapping, Field};
use crate::types::{RawRow, TeamRecord};
use crate::util::{parse_number, parse_number_opt, round_half_up};

/// Average number of weeks in a month.
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// Outcome of normalizing one row.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Record(TeamRecord),
    EmptyTeam,
    NoUsers,
}

/// Build the canonical record for one snapshot row.
///
/// Active users are derived from `% Active Users` when that column is
/// present and positive (overriding a direct count), and otherwise fall
/// back to the full licensed population. Power users are a percentage of
/// active users.
pub fn normalize_row(row: &RawRow, mapping: &ColumnMapping) -> Normalized {
    let team = match row.non_empty_field(mapping, Field::Team) {
        Some(t) => t.to_string(),
        None => return Normalized::EmptyTeam,
    };

    let enabled_users = parse_number_opt(row.field(mapping, Field::EnabledUsers));
    let mut active_users = parse_number_opt(row.field(mapping, Field::ActiveUsers));

    if enabled_users > 0.0 {
        if let Some(pct) = row.non_empty_field(mapping, Field::ActiveUsersPercent) {
            let pct = parse_number(pct);
            if pct > 0.0 {
                active_users = round_half_up(enabled_users * pct / 100.0);
            }
        }
    }

    if active_users == 0.0 && enabled_users > 0.0 {
        active_users = enabled_users;
    }

    let actions_per_user = parse_number_opt(row.field(mapping, Field::TotalActions));
    let weekly_actions = actions_per_user * active_users;
    let monthly_actions = weekly_actions * WEEKS_PER_MONTH;

    let power_users = row
        .non_empty_field(mapping, Field::PowerUsers)
        .map(|pct| round_half_up(active_users * parse_number(pct) / 100.0))
        .unwrap_or(0.0);

    if enabled_users == 0.0 && active_users == 0.0 {
        return Normalized::NoUsers;
    }

    Normalized::Record(TeamRecord {
        team,
        enabled_users,
        active_users,
        weekly_actions,
        monthly_actions,
        engagement: parse_number_opt(row.field(mapping, Field::Engagement)),
        actions_per_user,
        power_users,
    })
}

/// Counts of rows that did not become records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Skipped {
    pub empty_team: usize,
    pub no_users: usize,
}

pub fn normalize_rows(rows: &[RawRow], mapping: &ColumnMapping) -> (Vec<TeamRecord>, Skipped) {
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = Skipped::default();
    for row in rows {
        match normalize_row(row, mapping) {
            Normalized::Record(r) => records.push(r),
            Normalized::EmptyTeam => skipped.empty_team += 1,
            Normalized::NoUsers => {
                debug!(team = ?row.field(mapping, Field::Team), "dropping team with no users");
                skipped.no_users += 1;
            }
        }
    }
    (records, skipped)
}
