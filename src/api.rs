//! HTTP access to the upstream draw pages.

use std::time::Duration;

use log::debug;
use url::Url;

use crate::config::Config;
use crate::parser::{DrawPageParser, MetaDescriptionParser};
use crate::retry::{with_retry, with_timeout};
use crate::schema::DrawRecord;

/// Upper bound on a single page fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can produce per-round draw records.
///
/// `None` means the round is unavailable: not yet drawn, or the page could
/// not be fetched or parsed.  Implementations must not fail any other way —
/// discovery relies on `None` to detect the edge of the published history.
pub trait RoundSource {
    async fn fetch_round(&self, round: u32) -> Option<DrawRecord>;
}

pub struct LottoClient<P = MetaDescriptionParser> {
    client: reqwest::Client,
    base_url: Url,
    max_attempts: u32,
    parser: P,
}

impl LottoClient {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0")
                .build()?,
            base_url: config.base_url.clone(),
            max_attempts: config.fetch_attempts,
            parser: MetaDescriptionParser,
        })
    }
}

impl<P: DrawPageParser> LottoClient<P> {
    async fn try_fetch(&self, round: u32) -> anyhow::Result<DrawRecord> {
        let url = format!("{}{round}", self.base_url);
        let label = format!("Round {round}");
        let html = with_retry(&label, self.max_attempts, || {
            with_timeout(FETCH_TIMEOUT, &label, async {
                let response = self.client.get(&url).send().await?;
                Ok(response.error_for_status()?.text().await?)
            })
        })
        .await?;
        self.parser.parse(round, &html)
    }
}

impl<P: DrawPageParser> RoundSource for LottoClient<P> {
    async fn fetch_round(&self, round: u32) -> Option<DrawRecord> {
        match self.try_fetch(round).await {
            Ok(record) => Some(record),
            Err(e) => {
                // The usual reason is simply that the round is not drawn yet.
                debug!("Round {round} unavailable: {e:#}");
                None
            }
        }
    }
}
