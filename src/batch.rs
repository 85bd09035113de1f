//! Fetching a round range in fixed-size concurrent batches.

use std::time::Duration;

use futures::future::join_all;
use log::info;
use tokio::time::sleep;

use crate::api::RoundSource;
use crate::schema::DrawRecord;

/// Rounds fetched concurrently per batch.
pub const BATCH_WIDTH: u32 = 10;
/// Pause between batches, out of politeness to the upstream server.
const BATCH_DELAY: Duration = Duration::from_millis(200);

/// What a range fetch produced.  Failed rounds are reported, never fatal.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Successful records in batch submission order; the caller re-sorts.
    pub records: Vec<DrawRecord>,
    pub failed_rounds: Vec<u32>,
}

/// Fetches every round in `start..=end`.  Batches run sequentially; within a
/// batch all fetches run concurrently and the whole batch is awaited before
/// the next one starts.
pub async fn fetch_rounds<S: RoundSource>(source: &S, start: u32, end: u32) -> FetchReport {
    let mut report = FetchReport::default();
    if start > end {
        return report;
    }
    let total = end - start + 1;
    let mut done = 0;
    let mut next = start;
    while next <= end {
        let batch_end = end.min(next + BATCH_WIDTH - 1);
        let rounds: Vec<u32> = (next..=batch_end).collect();
        let results = join_all(rounds.iter().map(|&round| source.fetch_round(round))).await;
        for (&round, result) in rounds.iter().zip(results) {
            match result {
                Some(record) => report.records.push(record),
                None => report.failed_rounds.push(round),
            }
        }
        done += rounds.len() as u32;
        info!("Progress: {}% ({batch_end}/{end})", done * 100 / total);
        sleep(BATCH_DELAY).await;
        next = batch_end + 1;
    }
    report
}
