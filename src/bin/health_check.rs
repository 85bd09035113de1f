//! Offline integrity check: loads the persisted dataset through the same
//! backup-failover path consumers use and runs the full validator.

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use lotto_scraping::cache::DatasetCache;
use lotto_scraping::dataset::DataPaths;
use lotto_scraping::validate::validate_dataset;
use num_format::{Locale, ToFormattedString};

#[derive(Parser)]
struct Opts {
    #[arg(default_value = "data/lotto.json")]
    data_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let cache = DatasetCache::new(DataPaths::new(&opts.data_path));
    let dataset = cache.get()?;
    println!(
        "Loaded {} draws (latest round {})",
        dataset.draws.len().to_formatted_string(&Locale::en),
        dataset.latest_round
    );

    let validation = validate_dataset(&dataset.draws);
    if !validation.valid {
        for error in &validation.errors {
            eprintln!("{error}");
        }
        bail!(
            "dataset failed validation with {} error(s)",
            validation.errors.len()
        );
    }
    println!("Dataset OK.");
    Ok(())
}
