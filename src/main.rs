// Entry point and high-level CLI flow.
//
// - Loads one usage export and prints what was detected.
// - Builds the cost model from an optional JSON file plus flag overrides.
// - Prints the ROI summary, the leaderboard and the full team table, and
//   writes `teams.csv` and `metrics.json` to the output directory.
use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use roi_report::columns::ColumnMapping;
use roi_report::metrics::Headline;
use roi_report::reports::{self, SortColumn, SortDirection};
use roi_report::{
    calculate_metrics, load_and_clean, output, util, Config, ConfigPatch, IngestResult,
    LoadReport, Metrics,
};

/// Copilot productivity ROI report from a usage CSV export
#[derive(Parser, Debug)]
#[command(name = "roi_report", version)]
struct Cli {
    /// Usage export to analyze (.csv)
    csv: PathBuf,

    /// JSON file with the cost model (missing keys use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Licence cost per user per month
    #[arg(long)]
    license_cost: Option<f64>,

    /// Fully-loaded hourly rate
    #[arg(long)]
    professional_rate: Option<f64>,

    /// Minutes saved per Copilot action (1-15)
    #[arg(long)]
    minutes_per_action: Option<f64>,

    /// Weeks of data covered by the export
    #[arg(long)]
    analysis_weeks: Option<u32>,

    /// Intelligent Recap actions per month
    #[arg(long)]
    recap_actions: Option<u64>,

    /// Report ROI without the Intelligent Recap overlay
    #[arg(long)]
    exclude_recap: bool,

    /// Column to sort the team table by
    #[arg(long, value_enum, default_value_t = SortColumn::MonthlyValue)]
    sort: SortColumn,

    /// Sort the team table ascending instead of descending
    #[arg(long)]
    ascending: bool,

    /// Number of teams in the leaderboard
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Directory for teams.csv and metrics.json
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Log filter (error, warn, info, debug, trace or an EnvFilter directive)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn config_patch(&self) -> ConfigPatch {
        ConfigPatch {
            license_cost: self.license_cost,
            professional_rate: self.professional_rate,
            minutes_per_action: self.minutes_per_action,
            analysis_weeks: self.analysis_weeks,
            intelligent_recap_actions: self.recap_actions,
        }
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    config: &'a Config,
    include_recap: bool,
    headline: Headline,
    metrics: &'a Metrics,
    mapping: &'a ColumnMapping,
    load_report: &'a LoadReport,
}

fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry().with(filter).with(layer).init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let base = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::default(),
    };
    Ok(base.patched(&cli.config_patch()))
}

/// Read and ingest the export, printing a short summary of what happened.
fn handle_load(path: &Path) -> anyhow::Result<IngestResult> {
    let is_csv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        bail!("Please upload a CSV file");
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Error reading file {}", path.display()))?;
    let result = load_and_clean(&text).context("Error processing file")?;

    let report = &result.report;
    println!(
        "Processing dataset... ({} rows read, {} teams kept, {} format)",
        util::format_int(report.total_rows),
        util::format_int(report.teams),
        if report.long_format { "weekly" } else { "snapshot" }
    );
    if report.malformed_rows > 0 {
        println!(
            "Note: {} rows skipped due to a wrong number of fields.",
            util::format_int(report.malformed_rows)
        );
    }
    if report.no_user_rows + report.empty_team_rows > 0 {
        println!(
            "Note: {} rows skipped with no team name or no users.",
            util::format_int(report.no_user_rows + report.empty_team_rows)
        );
    }
    let detected: Vec<String> = result
        .mapping
        .iter()
        .map(|(field, header)| format!("{field} <- \"{header}\""))
        .collect();
    println!("Detected columns: {}\n", detected.join(", "));
    Ok(result)
}

/// Print every section of the report and write the exports.
fn handle_generate_reports(cli: &Cli, data: &IngestResult, config: &Config) -> anyhow::Result<()> {
    let metrics = calculate_metrics(&data.records, config);
    let include_recap = !cli.exclude_recap && metrics.recap.is_active();
    let headline = metrics.headline(include_recap);

    println!("Copilot Productivity ROI Analysis");
    println!(
        "(Based on {} teams/divisions, {} weeks of data)\n",
        util::format_int(data.records.len()),
        config.analysis_weeks
    );

    if metrics.recap.is_active() {
        println!(
            "Intelligent Recap: {} actions x 0.5 hours = {} hours/mo, {}/mo ({})\n",
            util::format_int(metrics.recap.actions),
            util::format_number(metrics.recap.hours_saved, 0),
            util::format_currency(metrics.recap.monthly_value),
            if include_recap { "included" } else { "excluded" }
        );
    }

    println!(
        "Enabled Users: {} | Activation Rate: {:.1}% ({} active) | Weekly Actions per User: {:.1} ({} total/week) | Weekly Hours Saved: {}\n",
        util::format_number(metrics.total_enabled_users, 0),
        metrics.activation_rate,
        util::format_number(metrics.total_active_users, 0),
        metrics.avg_actions_per_user,
        util::format_number(metrics.total_weekly_actions, 0),
        util::format_number(metrics.weekly_hours_saved, 0),
    );
    println!(
        "Power-user teams (>= 20 actions/week): {} ({:.1}%)\n",
        metrics.power_users, metrics.power_user_rate
    );

    println!("Productivity ROI Calculation\n");
    output::preview_table_rows(&reports::roi_rows(&metrics, &headline), 1);
    println!(
        "Investment: {}/month ({}/year) for {} licenses at ${}/user/month",
        util::format_currency(metrics.monthly_cost),
        util::format_currency(metrics.annual_cost),
        util::format_number(metrics.total_enabled_users, 0),
        config.license_cost
    );
    println!(
        "Calculation: {} monthly actions x {} min / 60 x ${}/hr = {}\n",
        util::format_number(metrics.total_monthly_actions, 0),
        metrics.mins_per_action,
        config.professional_rate,
        util::format_currency(metrics.value_per_month)
    );

    let ranked = reports::rank_teams(data, config);
    println!("Top {} Teams by Value Generated\n", cli.top);
    output::preview_table_rows(&reports::leaderboard_rows(&ranked, cli.top), cli.top);

    let mut table = ranked;
    let direction = if cli.ascending {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    reports::sort_teams(&mut table, cli.sort, direction);
    let rows = reports::team_rows(&table);
    println!("All Teams Performance\n");
    output::preview_table_rows(&rows, rows.len());

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;
    let teams_file = cli.out_dir.join("teams.csv");
    output::write_csv(&teams_file, &rows)?;
    let summary_file = cli.out_dir.join("metrics.json");
    let summary = Summary {
        config,
        include_recap,
        headline,
        metrics: &metrics,
        mapping: &data.mapping,
        load_report: &data.report,
    };
    output::write_json(&summary_file, &summary)?;
    println!(
        "(Full table exported to {}, summary to {})",
        teams_file.display(),
        summary_file.display()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let config = load_config(&cli)?;
    tracing::debug!(?config, "using cost model");

    let data = handle_load(&cli.csv)?;
    handle_generate_reports(&cli, &data, &config)
}
