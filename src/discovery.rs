//! Locating the latest published round.

use chrono::{FixedOffset, NaiveDate, Utc};
use log::info;

use crate::api::RoundSource;
use crate::schema::FIRST_DRAW_DATE;

/// How far above the floor the probe starts.
const PROBE_BUFFER: u32 = 5;

fn first_draw_date() -> NaiveDate {
    FIRST_DRAW_DATE.parse().unwrap()
}

/// Draws happen on KST Saturdays, so "today" must be taken in KST or the
/// estimate flips a round early around the date line.
pub fn kst_today() -> NaiveDate {
    let kst = FixedOffset::east_opt(9 * 3600).unwrap();
    Utc::now().with_timezone(&kst).date_naive()
}

/// Elapsed whole weeks since the first draw, plus one.  Holiday shifts and
/// late page publication can make this drift by a round; probing absorbs it.
pub fn estimate_latest_round(today: NaiveDate) -> u32 {
    let weeks = (today - first_draw_date()).num_weeks();
    weeks.max(0) as u32 + 1
}

/// Confirms the latest round against the source.
///
/// The floor is the better of the calendar estimate and whatever was last
/// persisted.  Rounds are probed downward from a small buffer above the
/// floor; the first confirmed round wins, and the floor itself is the answer
/// when nothing confirms.
pub async fn discover_latest_round<S: RoundSource>(
    source: &S,
    persisted_latest: Option<u32>,
) -> u32 {
    let floor = estimate_latest_round(kst_today()).max(persisted_latest.unwrap_or(0));
    probe_latest_round(source, floor).await
}

pub async fn probe_latest_round<S: RoundSource>(source: &S, floor: u32) -> u32 {
    info!("Probing for the latest round around {floor}...");
    for round in (floor..=floor + PROBE_BUFFER).rev() {
        if source.fetch_round(round).await.is_some() {
            info!("Latest round confirmed: {round}");
            return round;
        }
    }
    info!("No probe succeeded; assuming round {floor}");
    floor
}
