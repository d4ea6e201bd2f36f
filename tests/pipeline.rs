use chrono::NaiveDate;
use roi_report::reports::{rank_teams, sort_teams, SortColumn, SortDirection};
use roi_report::{calculate_metrics, load_and_clean, Config, ConfigPatch, IngestError};

const EXAMPLE: &str = "Team,Enabled Users,Active Users,Avg Copilot Actions\nAlpha,100,80,15\nBeta,50,10,5";

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn example_export_end_to_end() {
    let result = load_and_clean(EXAMPLE).unwrap();
    let config = Config::default();
    let m = calculate_metrics(&result.records, &config);

    assert_eq!(m.total_enabled_users, 150.0);
    assert_eq!(m.total_active_users, 90.0);
    assert_eq!(m.total_weekly_actions, 1250.0);
    assert_eq!(m.monthly_cost, 4800.0);
    assert!(close(m.hours_per_month, 541.25));

    let ranked = rank_teams(&result, &config);
    let names: Vec<&str> = ranked.iter().map(|v| v.record.team.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
    assert!(ranked[0].monthly_value > ranked[1].monthly_value);
}

#[test]
fn long_and_wide_exports_agree_on_records() {
    let wide = "\
Division,Enabled Users,Active Users %,Total Actions,% Power Users
Alpha,120,50%,12,10%
Beta,40,75%,30,25%";
    let long = "\
Week Ending,Division,Enabled Users,Active Users %,Total Actions,% Power Users
2024-01-07,Alpha,100,40%,8,5%
2024-01-07,Beta,35,70%,31,20%
2024-01-21,Alpha,120,50%,12,10%
2024-01-14,Alpha,110,45%,14,8%
2024-01-21,Beta,40,75%,30,25%";

    let wide = load_and_clean(wide).unwrap();
    let long = load_and_clean(long).unwrap();
    assert!(!wide.report.long_format);
    assert!(long.report.long_format);
    assert_eq!(wide.records, long.records);

    let alpha = long.history_for("Alpha").unwrap();
    assert_eq!(alpha.len(), 3);
    assert_eq!(alpha[0].date, NaiveDate::from_ymd_opt(2024, 1, 21).unwrap());
}

#[test]
fn peak_week_comes_from_history() {
    let long = "\
Date,Team,Enabled Users,Actions
1/1/2024,Alpha,10,5
1/8/2024,Alpha,10,9
1/15/2024,Alpha,10,9
1/15/2024,Beta,10,3";
    let result = load_and_clean(long).unwrap();
    let ranked = rank_teams(&result, &Config::default());
    let alpha = ranked.iter().find(|v| v.record.team == "Alpha").unwrap();
    assert_eq!(alpha.peak_week.date, NaiveDate::from_ymd_opt(2024, 1, 15));
    assert_eq!(alpha.peak_week.actions_per_user, 9.0);
}

#[test]
fn malformed_row_does_not_abort_ingestion() {
    let text = "Team,Enabled Users,Active Users\nAlpha,10,5\nBroken,1\nBeta,20,20";
    let result = load_and_clean(text).unwrap();
    assert_eq!(result.records.len(), 2);
    assert_eq!(result.report.malformed_rows, 1);
    for r in &result.records {
        assert!(r.enabled_users > 0.0 || r.active_users > 0.0);
    }
}

#[test]
fn fatal_errors_are_reported_verbatim() {
    let err = load_and_clean("Department").unwrap_err();
    assert_eq!(err, IngestError::EmptyInput);
    assert_eq!(err.to_string(), "CSV file appears to be empty");

    let err = load_and_clean("Region,Users\nWest,10").unwrap_err();
    assert_eq!(err.to_string(), "Could not find team/division column in CSV");
}

#[test]
fn config_changes_recompute_without_touching_data() {
    let result = load_and_clean(EXAMPLE).unwrap();
    let before = result.records.clone();
    let base = Config::default();
    let faster = base.patched(&ConfigPatch {
        minutes_per_action: Some(12.0),
        ..ConfigPatch::default()
    });

    let m1 = calculate_metrics(&result.records, &base);
    let m2 = calculate_metrics(&result.records, &faster);
    assert!(close(m2.value_per_month, m1.value_per_month * 2.0));
    assert_eq!(m1.monthly_cost, m2.monthly_cost);
    assert_eq!(result.records, before);
    assert_eq!(calculate_metrics(&result.records, &base), m1);
}

#[test]
fn table_can_be_resorted() {
    let result = load_and_clean(EXAMPLE).unwrap();
    let mut views = rank_teams(&result, &Config::default());
    sort_teams(&mut views, SortColumn::MonthlyValue, SortDirection::Ascending);
    assert_eq!(views[0].record.team, "Beta");
}

#[test]
fn quoted_numbers_after_a_space_keep_their_row() {
    let text = "Team,Enabled Users,Active Users\nAlpha, \"1,234\", \"1,000\"\nBeta,10,5";
    let result = load_and_clean(text).unwrap();
    assert_eq!(result.records.len(), 2);
    assert_eq!(result.report.malformed_rows, 0);
    let alpha = result.records.iter().find(|r| r.team == "Alpha").unwrap();
    assert_eq!(alpha.enabled_users, 1234.0);
    assert_eq!(alpha.active_users, 1000.0);
}

#[test]
fn unbalanced_quote_loses_only_its_line() {
    let text = "Team,Enabled Users\n\"Alpha,5\nBeta,10\nGamma,3";
    let result = load_and_clean(text).unwrap();
    let teams: Vec<&str> = result.records.iter().map(|r| r.team.as_str()).collect();
    assert_eq!(teams, vec!["Beta", "Gamma"]);
    assert_eq!(result.report.malformed_rows, 1);
}

#[test]
fn overflowing_week_dates_roll_into_the_timeline() {
    let long = "\
Week,Team,Enabled Users,Actions
2024-02-30,Alpha,10,7
2024-02-20,Alpha,10,4";
    let result = load_and_clean(long).unwrap();
    let alpha = result.history_for("Alpha").unwrap();
    assert_eq!(alpha.len(), 2);
    assert_eq!(alpha[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(result.records[0].weekly_actions, 70.0);
}
