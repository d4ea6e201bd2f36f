use serde::Serialize;

use crate::config::Config;
use crate::types::TeamRecord;
use crate::util::ratio;

/// Weekly actions per user at which a team counts as a power-user team.
pub const POWER_USER_THRESHOLD: f64 = 20.0;

/// Hours saved by one Intelligent Recap action (median meeting length).
pub const RECAP_HOURS_PER_ACTION: f64 = 0.5;

/// Aggregate ROI figures for one dataset under one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub total_enabled_users: f64,
    pub total_active_users: f64,
    pub activation_rate: f64,
    pub avg_actions_per_user: f64,
    /// Number of teams (not users) at or above [`POWER_USER_THRESHOLD`].
    pub power_users: usize,
    pub power_user_rate: f64,
    pub total_weekly_actions: f64,
    pub total_monthly_actions: f64,
    pub weekly_hours_saved: f64,
    pub monthly_cost: f64,
    pub annual_cost: f64,
    pub mins_per_action: f64,
    pub hours_per_month: f64,
    pub value_per_month: f64,
    pub annual_value: f64,
    pub roi_multiple: f64,
    pub recap: RecapOverlay,
}

/// Intelligent Recap value layered on top of the base figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecapOverlay {
    pub actions: u64,
    pub hours_saved: f64,
    pub monthly_value: f64,
    pub annual_value: f64,
    pub value_per_month_with_recap: f64,
    pub annual_value_with_recap: f64,
    pub roi_multiple_with_recap: f64,
}

impl RecapOverlay {
    pub fn is_active(&self) -> bool {
        self.actions > 0
    }
}

/// The three figures that change when the recap overlay is toggled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Headline {
    pub value_per_month: f64,
    pub annual_value: f64,
    pub roi_multiple: f64,
}

impl Metrics {
    /// Base figures, or base plus recap when `include_recap` is set and
    /// recap actions were configured.
    pub fn headline(&self, include_recap: bool) -> Headline {
        if include_recap && self.recap.is_active() {
            Headline {
                value_per_month: self.recap.value_per_month_with_recap,
                annual_value: self.recap.annual_value_with_recap,
                roi_multiple: self.recap.roi_multiple_with_recap,
            }
        } else {
            Headline {
                value_per_month: self.value_per_month,
                annual_value: self.annual_value,
                roi_multiple: self.roi_multiple,
            }
        }
    }
}

pub fn calculate_metrics(records: &[TeamRecord], config: &Config) -> Metrics {
    let total_enabled_users: f64 = records.iter().map(|r| r.enabled_users).sum();
    let total_active_users: f64 = records.iter().map(|r| r.active_users).sum();
    let total_weekly_actions: f64 = records.iter().map(|r| r.weekly_actions).sum();
    let total_monthly_actions: f64 = records.iter().map(|r| r.monthly_actions).sum();

    let activation_rate = ratio(total_active_users, total_enabled_users) * 100.0;
    let avg_actions_per_user = ratio(total_weekly_actions, total_active_users);

    let power_users = records
        .iter()
        .filter(|r| r.actions_per_user >= POWER_USER_THRESHOLD)
        .count();
    let power_user_rate = ratio(power_users as f64, records.len() as f64) * 100.0;

    let monthly_cost = total_enabled_users * config.license_cost;
    let annual_cost = monthly_cost * 12.0;

    let mins_per_action = config.minutes_per_action;
    let hours_per_month = total_monthly_actions * mins_per_action / 60.0;
    let value_per_month = hours_per_month * config.professional_rate;
    let annual_value = value_per_month * 12.0;
    let roi_multiple = ratio(value_per_month, monthly_cost);

    let weekly_hours_saved = total_weekly_actions * mins_per_action / 60.0;

    let recap = recap_overlay(config, value_per_month, annual_value, monthly_cost);

    Metrics {
        total_enabled_users,
        total_active_users,
        activation_rate,
        avg_actions_per_user,
        power_users,
        power_user_rate,
        total_weekly_actions,
        total_monthly_actions,
        weekly_hours_saved,
        monthly_cost,
        annual_cost,
        mins_per_action,
        hours_per_month,
        value_per_month,
        annual_value,
        roi_multiple,
        recap,
    }
}

fn recap_overlay(
    config: &Config,
    value_per_month: f64,
    annual_value: f64,
    monthly_cost: f64,
) -> RecapOverlay {
    let actions = config.intelligent_recap_actions;
    let hours_saved = actions as f64 * RECAP_HOURS_PER_ACTION;
    let monthly_value = hours_saved * config.professional_rate;
    let recap_annual = monthly_value * 12.0;
    let value_per_month_with_recap = value_per_month + monthly_value;
    RecapOverlay {
        actions,
        hours_saved,
        monthly_value,
        annual_value: recap_annual,
        value_per_month_with_recap,
        annual_value_with_recap: annual_value + recap_annual,
        roi_multiple_with_recap: ratio(value_per_month_with_recap, monthly_cost),
    }
}
