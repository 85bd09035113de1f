//! Runtime configuration for the update pipeline.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::dataset::DataPaths;
use crate::retry::DEFAULT_ATTEMPTS;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Primary dataset location; the backup slot sits next to it.
    pub data_path: PathBuf,
    /// Base URL of the upstream result pages; the round number is appended.
    pub base_url: Url,
    /// Attempts per page fetch before a round counts as unavailable.
    pub fetch_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: "data/lotto.json".into(),
            base_url: Url::parse("https://superkts.com/lotto/").unwrap(),
            fetch_attempts: DEFAULT_ATTEMPTS,
        }
    }
}

impl Config {
    /// Reads a TOML config; defaults apply when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Ok(toml::from_str(&fs_err::read_to_string(path)?)?),
            None => Ok(Self::default()),
        }
    }

    pub fn data_paths(&self) -> DataPaths {
        DataPaths::new(&self.data_path)
    }
}
