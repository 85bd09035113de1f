//! The end-to-end update pipeline and its fallback behavior.

use anyhow::bail;
use chrono::Utc;
use itertools::Itertools;
use log::{error, info, warn};
use num_format::{Locale, ToFormattedString};
use thiserror::Error;

use crate::api::RoundSource;
use crate::batch::fetch_rounds;
use crate::dataset::{self, DataPaths};
use crate::discovery;
use crate::schema::Dataset;
use crate::validate::validate_dataset;

/// How a pipeline run ended.  Every variant except a returned error leaves
/// usable data on disk.
#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Persisted data already covers the latest round; nothing was written.
    UpToDate,
    Updated {
        latest_round: u32,
        total_draws: usize,
    },
    /// Fetching failed but the primary file still holds usable data.
    ServedStale,
    /// Fetching failed and the primary was unusable; the backup now sits in
    /// its place.
    RestoredBackup,
}

/// A merged dataset that fails validation.  Always fatal: it must never
/// reach disk, and stale-data recovery does not apply.
#[derive(Debug, Error)]
#[error("dataset failed validation with {} error(s)", .errors.len())]
pub struct InvalidDataset {
    pub errors: Vec<String>,
}

/// Runs the update, degrading to previously persisted data when fetching
/// fails outright.  Only an invalid merged dataset or the absence of any
/// usable data (primary, backup, and upstream all dead) is an error.
pub async fn run<S: RoundSource>(source: &S, paths: &DataPaths) -> anyhow::Result<UpdateOutcome> {
    match update(source, paths).await {
        Ok(outcome) => Ok(outcome),
        Err(err) if err.is::<InvalidDataset>() => Err(err),
        Err(err) => recover(paths, err),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FetchPlan {
    UpToDate,
    /// Fetch `start..=latest`.  `keep_existing` is false when a full
    /// re-fetch replaces suspect data.
    Fetch { start: u32, keep_existing: bool },
}

fn plan_fetch(existing: Option<&Dataset>, latest: u32) -> FetchPlan {
    match existing {
        Some(data) if !data.draws.is_empty() => {
            if data.all_prizes_zero() {
                // An earlier run most likely saved incomplete records.  The
                // check can also trip on genuinely prize-less historical
                // data; a spurious re-fetch is the accepted cost.
                warn!("All persisted prize amounts are zero; forcing a full re-fetch");
                FetchPlan::Fetch {
                    start: 1,
                    keep_existing: false,
                }
            } else if data.latest_round >= latest {
                FetchPlan::UpToDate
            } else {
                FetchPlan::Fetch {
                    start: data.latest_round + 1,
                    keep_existing: true,
                }
            }
        }
        _ => FetchPlan::Fetch {
            start: 1,
            keep_existing: false,
        },
    }
}

async fn update<S: RoundSource>(source: &S, paths: &DataPaths) -> anyhow::Result<UpdateOutcome> {
    let existing = dataset::load_existing(paths);
    let persisted_latest = existing.as_ref().map(|d| d.latest_round);

    let latest = discovery::discover_latest_round(source, persisted_latest).await;
    info!("Latest round: {latest}");

    let (start, existing) = match plan_fetch(existing.as_ref(), latest) {
        FetchPlan::UpToDate => {
            info!("Data is already up to date");
            return Ok(UpdateOutcome::UpToDate);
        }
        FetchPlan::Fetch {
            start,
            keep_existing,
        } => (start, existing.filter(|_| keep_existing)),
    };

    info!("Fetching rounds {start} to {latest}...");
    let report = fetch_rounds(source, start, latest).await;
    if !report.failed_rounds.is_empty() {
        warn!(
            "{} round(s) could not be fetched: {}",
            report.failed_rounds.len(),
            report.failed_rounds.iter().join(", ")
        );
    }
    if report.records.is_empty() {
        bail!("no rounds could be fetched from upstream");
    }

    let mut merged = match existing {
        // Fetched ranges are disjoint from existing data by construction, so
        // the merge is a plain concatenation.
        Some(mut data) => {
            data.draws.extend(report.records);
            data
        }
        None => Dataset::new(report.records, latest),
    };
    merged.latest_round = latest;
    merged.last_updated = Utc::now();
    merged.sort_draws();

    let validation = validate_dataset(&merged.draws);
    if !validation.valid {
        for error in &validation.errors {
            error!("{error}");
        }
        return Err(InvalidDataset {
            errors: validation.errors,
        }
        .into());
    }

    dataset::backup_current(paths);
    let bytes = dataset::write_dataset(paths, &merged)?;
    info!(
        "Saved {} rounds to {:?} ({}KB)",
        merged.draws.len().to_formatted_string(&Locale::en),
        paths.primary,
        bytes / 1024
    );
    Ok(UpdateOutcome::Updated {
        latest_round: merged.latest_round,
        total_draws: merged.draws.len(),
    })
}

/// The fallback chain: stale primary data is acceptable, a restored backup
/// is acceptable, and only the absence of both turns `err` into a failure.
fn recover(paths: &DataPaths, err: anyhow::Error) -> anyhow::Result<UpdateOutcome> {
    warn!("Update failed: {err:#}");
    if dataset::read_dataset(&paths.primary).is_ok() {
        warn!("Keeping previously saved data");
        return Ok(UpdateOutcome::ServedStale);
    }
    match dataset::read_dataset(&paths.backup) {
        Ok(_) => {
            warn!("Primary data is unusable; restoring the backup");
            dataset::restore_backup(paths)?;
            Ok(UpdateOutcome::RestoredBackup)
        }
        Err(backup_err) => {
            error!("Backup is unusable as well: {backup_err:#}");
            Err(err.context("no usable data in primary or backup"))
        }
    }
}
