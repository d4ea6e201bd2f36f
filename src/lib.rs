//! Copilot usage ROI reporting.
//!
//! The pipeline turns a usage export into canonical per-team records
//! ([`loader::load_and_clean`]), then derives ROI figures
//! ([`metrics::calculate_metrics`]) and a ranked team table
//! ([`reports::rank_teams`]) for a caller-owned [`config::Config`].
pub mod columns;
pub mod config;
pub mod dates;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod normalize;
pub mod output;
pub mod reconcile;
pub mod reports;
pub mod tokenizer;
pub mod types;
pub mod util;

pub use config::{Config, ConfigPatch};
pub use error::IngestError;
pub use loader::{load_and_clean, LoadReport};
pub use metrics::{calculate_metrics, Metrics};
pub use types::{IngestResult, TeamRecord, TeamView, WeeklyObservation};
