use std::path::PathBuf;

use clap::Parser;
use lotto_scraping::api::LottoClient;
use lotto_scraping::config::Config;
use lotto_scraping::updater::{self, UpdateOutcome};

#[derive(Parser)]
struct Opts {
    /// TOML configuration file; built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overrides the dataset location from the configuration.
    #[arg(long)]
    data_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let mut config = Config::load(opts.config.as_deref())?;
    if let Some(data_path) = opts.data_path {
        config.data_path = data_path;
    }

    let client = LottoClient::new(&config)?;
    match updater::run(&client, &config.data_paths()).await? {
        UpdateOutcome::UpToDate => println!("Data is already up to date."),
        UpdateOutcome::Updated {
            latest_round,
            total_draws,
        } => println!("Saved {total_draws} rounds (latest round {latest_round})."),
        UpdateOutcome::ServedStale => {
            println!("Fetch failed; previously saved data is still in place.")
        }
        UpdateOutcome::RestoredBackup => println!("Fetch failed; restored data from the backup."),
    }
    Ok(())
}
