use clap::ValueEnum;
use std::cmp::Ordering;

use crate::config::Config;
use crate::metrics::{Headline, Metrics};
use crate::types::{
    IngestResult, LeaderboardRow, PeakWeek, RoiRow, TeamRecord, TeamRow, TeamView,
    WeeklyObservation,
};
use crate::util::{format_currency, format_number};

/// Best week in a team's history, newest first on ties.
///
/// History is stored newest first, so keeping the first strict maximum
/// gives the most recent of several equal peaks. Without history the
/// snapshot rate is used and no date is reported.
pub fn peak_week(history: Option<&[WeeklyObservation]>, fallback_rate: f64) -> PeakWeek {
    let mut best: Option<&WeeklyObservation> = None;
    for week in history.unwrap_or_default() {
        match best {
            Some(b) if week.actions_per_user <= b.actions_per_user => {}
            _ => best = Some(week),
        }
    }
    match best {
        Some(w) => PeakWeek {
            date: Some(w.date),
            actions_per_user: w.actions_per_user,
        },
        None => PeakWeek {
            date: None,
            actions_per_user: fallback_rate,
        },
    }
}

/// Combine a record with the config-dependent value figures.
pub fn project_team(
    record: &TeamRecord,
    history: Option<&[WeeklyObservation]>,
    config: &Config,
) -> TeamView {
    let monthly_hours = record.monthly_actions * config.minutes_per_action / 60.0;
    TeamView {
        record: record.clone(),
        monthly_value: monthly_hours * config.professional_rate,
        weekly_hours: record.weekly_actions * config.minutes_per_action / 60.0,
        peak_week: peak_week(history, record.actions_per_user),
    }
}

/// All teams, highest monthly value first.
pub fn rank_teams(result: &IngestResult, config: &Config) -> Vec<TeamView> {
    let mut views: Vec<TeamView> = result
        .records
        .iter()
        .map(|r| project_team(r, result.history_for(&r.team), config))
        .collect();
    sort_teams(&mut views, SortColumn::MonthlyValue, SortDirection::Descending);
    views
}

/// Columns of the team table that can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    Team,
    ActiveUsers,
    PowerUsers,
    WeeklyActions,
    ActionsPerUser,
    PeakWeek,
    WeeklyHours,
    MonthlyValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Stable sort of the team table. A team with no dated peak sorts as the
/// oldest peak week.
pub fn sort_teams(views: &mut [TeamView], column: SortColumn, direction: SortDirection) {
    views.sort_by(|a, b| {
        let ord = compare_on(a, b, column);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

fn compare_on(a: &TeamView, b: &TeamView, column: SortColumn) -> Ordering {
    let num = |x: f64, y: f64| x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    match column {
        SortColumn::Team => a
            .record
            .team
            .to_lowercase()
            .cmp(&b.record.team.to_lowercase())
            .then_with(|| a.record.team.cmp(&b.record.team)),
        SortColumn::ActiveUsers => num(a.record.active_users, b.record.active_users),
        SortColumn::PowerUsers => num(a.record.power_users, b.record.power_users),
        SortColumn::WeeklyActions => num(a.record.weekly_actions, b.record.weekly_actions),
        SortColumn::ActionsPerUser => num(a.record.actions_per_user, b.record.actions_per_user),
        SortColumn::PeakWeek => a.peak_week.date.cmp(&b.peak_week.date),
        SortColumn::WeeklyHours => num(a.weekly_hours, b.weekly_hours),
        SortColumn::MonthlyValue => num(a.monthly_value, b.monthly_value),
    }
}

pub fn format_peak_week(peak: &PeakWeek) -> String {
    match peak.date {
        Some(d) => format!("{} ({:.1})", d.format("%m/%d/%Y"), peak.actions_per_user),
        None => "N/A".to_string(),
    }
}

pub fn team_rows(views: &[TeamView]) -> Vec<TeamRow> {
    views
        .iter()
        .map(|v| TeamRow {
            team: v.record.team.clone(),
            active_users: format_number(v.record.active_users, 0),
            power_users: format!("{} users", format_number(v.record.power_users, 0)),
            weekly_actions: format_number(v.record.weekly_actions, 0),
            actions_per_user: format!("{:.1}", v.record.actions_per_user),
            peak_week: format_peak_week(&v.peak_week),
            weekly_hours: format!("{:.0}", v.weekly_hours),
            monthly_value: format_currency(v.monthly_value),
        })
        .collect()
}

/// Top `limit` teams of an already ranked list.
pub fn leaderboard_rows(ranked: &[TeamView], limit: usize) -> Vec<LeaderboardRow> {
    ranked
        .iter()
        .take(limit)
        .enumerate()
        .map(|(idx, v)| LeaderboardRow {
            rank: idx + 1,
            team: v.record.team.clone(),
            monthly_value: format!("{}/mo", format_currency(v.monthly_value)),
            weekly_hours: format!("{:.0} hrs/week", v.weekly_hours),
        })
        .collect()
}

pub fn roi_rows(metrics: &Metrics, headline: &Headline) -> Vec<RoiRow> {
    vec![RoiRow {
        assumption: format!("{} minutes per action", metrics.mins_per_action),
        hours_per_month: format!("{} hrs", format_number(metrics.hours_per_month, 0)),
        monthly_value: format_currency(headline.value_per_month),
        annual_value: format_currency(headline.annual_value),
        roi_multiple: format!("{:.1}x", headline.roi_multiple),
    }]
}
