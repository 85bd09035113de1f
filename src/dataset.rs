//! Reading, backing up, and writing the dataset file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use fs_err as fs;
use log::{info, warn};

use crate::schema::Dataset;

/// The primary dataset location and its fixed sibling backup slot.
#[derive(Clone, Debug)]
pub struct DataPaths {
    pub primary: PathBuf,
    pub backup: PathBuf,
}

impl DataPaths {
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        let primary = primary.into();
        let backup = sibling(&primary, ".bak");
        Self { primary, backup }
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.as_os_str().to_owned();
    sibling.push(suffix);
    sibling.into()
}

/// Reads a dataset file, requiring at least one draw.
pub fn read_dataset(path: &Path) -> anyhow::Result<Dataset> {
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        bail!("data file {path:?} is empty");
    }
    let dataset: Dataset =
        serde_json::from_str(&raw).with_context(|| format!("while parsing {path:?}"))?;
    if dataset.draws.is_empty() {
        bail!("data file {path:?} contains no draws");
    }
    Ok(dataset)
}

/// Loads the dataset for consumers: the primary file first, failing over to
/// the backup when the primary is missing, empty, or unparsable.  Errors only
/// when neither is usable.
pub fn load_dataset(paths: &DataPaths) -> anyhow::Result<Dataset> {
    match read_dataset(&paths.primary) {
        Ok(dataset) => Ok(dataset),
        Err(primary_err) => {
            warn!(
                "Failed to load {:?} ({primary_err:#}); trying backup",
                paths.primary
            );
            read_dataset(&paths.backup)
                .context("failed to load lottery data from both primary and backup files")
        }
    }
}

/// Loads whatever currently exists for the update pipeline.  Absent or
/// unusable data means a full backfill, not an error.
pub fn load_existing(paths: &DataPaths) -> Option<Dataset> {
    match read_dataset(&paths.primary) {
        Ok(dataset) => {
            info!(
                "Existing data: {} rounds (up to {})",
                dataset.draws.len(),
                dataset.latest_round
            );
            Some(dataset)
        }
        Err(e) => {
            info!("No usable existing data: {e:#}");
            None
        }
    }
}

/// Copies the current primary into the backup slot before an overwrite.
/// Best-effort: losing the backup is less harmful than blocking a validated
/// update.
pub fn backup_current(paths: &DataPaths) {
    if !paths.primary.exists() {
        return;
    }
    if let Err(e) = fs::copy(&paths.primary, &paths.backup) {
        warn!("Failed to back up {:?}: {e}", paths.primary);
    }
}

/// Writes the dataset whole, through a temporary file in the same directory
/// so the primary is replaced atomically.  Returns the on-disk size.
pub fn write_dataset(paths: &DataPaths, dataset: &Dataset) -> anyhow::Result<u64> {
    if let Some(parent) = paths.primary.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = sibling(&paths.primary, ".tmp");
    fs::write(&tmp, serde_json::to_string(dataset)?)?;
    fs::rename(&tmp, &paths.primary)?;
    Ok(fs::metadata(&paths.primary)?.len())
}

/// Restores the backup over the primary.
pub fn restore_backup(paths: &DataPaths) -> anyhow::Result<()> {
    fs::copy(&paths.backup, &paths.primary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::schema::{DrawRecord, LottoNumber, RecordStatus};

    use super::*;

    fn record(round: u32) -> DrawRecord {
        DrawRecord::builder()
            .round(round)
            .draw_date("2026-01-03".to_owned())
            .numbers([1, 4, 16, 23, 31, 41].map(|n| LottoNumber::try_from(n).unwrap()))
            .bonus(LottoNumber::try_from(2).unwrap())
            .first_prize_amount(3_226_386_263)
            .first_prize_winners(10)
            .status(RecordStatus::Success)
            .build()
    }

    fn dataset(latest: u32) -> Dataset {
        let mut dataset = Dataset::new((1..=latest).map(record).collect(), latest);
        dataset.sort_draws();
        dataset
    }

    #[test]
    fn backup_path_sits_next_to_the_primary() {
        let paths = DataPaths::new("data/lotto.json");
        assert_eq!(paths.backup, Path::new("data/lotto.json.bak"));
    }

    #[test]
    fn write_then_read_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().join("lotto.json"));
        let written = dataset(3);
        write_dataset(&paths, &written).unwrap();
        assert_eq!(read_dataset(&paths.primary).unwrap(), written);
    }

    #[test]
    fn write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().join("nested/data/lotto.json"));
        write_dataset(&paths, &dataset(1)).unwrap();
        assert!(paths.primary.exists());
    }

    #[test]
    fn backup_preserves_the_previous_primary() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().join("lotto.json"));
        write_dataset(&paths, &dataset(2)).unwrap();
        let before = fs::read_to_string(&paths.primary).unwrap();

        backup_current(&paths);
        write_dataset(&paths, &dataset(3)).unwrap();

        assert_eq!(fs::read_to_string(&paths.backup).unwrap(), before);
        assert_ne!(fs::read_to_string(&paths.primary).unwrap(), before);
    }

    #[test]
    fn load_falls_over_to_the_backup() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().join("lotto.json"));
        let good = dataset(2);
        write_dataset(&paths, &good).unwrap();
        backup_current(&paths);
        fs::write(&paths.primary, "{ corrupt").unwrap();

        assert_eq!(load_dataset(&paths).unwrap(), good);
    }

    #[test]
    fn load_fails_when_both_files_are_unusable() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().join("lotto.json"));
        fs::write(&paths.primary, "").unwrap();
        assert!(load_dataset(&paths).is_err());
    }

    #[test]
    fn an_empty_draw_list_is_not_usable() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().join("lotto.json"));
        let empty = Dataset::new(Vec::new(), 0);
        fs::write(&paths.primary, serde_json::to_string(&empty).unwrap()).unwrap();
        assert!(read_dataset(&paths.primary).is_err());
        assert!(load_existing(&paths).is_none());
    }

    #[test]
    fn restore_copies_the_backup_over_the_primary() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().join("lotto.json"));
        write_dataset(&paths, &dataset(2)).unwrap();
        backup_current(&paths);
        fs::write(&paths.primary, "{ corrupt").unwrap();

        restore_backup(&paths).unwrap();
        assert_eq!(
            fs::read_to_string(&paths.primary).unwrap(),
            fs::read_to_string(&paths.backup).unwrap()
        );
    }
}
