use std::convert::TryFrom;

use chrono::{DateTime, Utc};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 45;
pub const NUMBERS_PER_DRAW: usize = 6;
/// The first Lotto 6/45 draw was held on this Saturday.
pub const FIRST_DRAW_DATE: &str = "2002-12-07";
pub const LOTTERY_ID: &str = "lotto645";

/// A ball number, main or bonus.  Constructed only within [1, 45].
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    derive_more::Display,
    derive_more::Into,
    Serialize,
    Deserialize,
)]
pub struct LottoNumber(u8);

impl LottoNumber {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for LottoNumber {
    type Error = u8;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            MIN_NUMBER..=MAX_NUMBER => Ok(Self(value)),
            _ => Err(value),
        }
    }
}

/// A record either parses completely or not at all, so the only status a
/// stored record can carry is `Success`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Success,
}

/// One weekly draw.
#[derive(
    Clone, PartialEq, Eq, Debug, TypedBuilder, CopyGetters, Getters, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct DrawRecord {
    #[getset(get_copy = "pub")]
    round: u32,
    /// `YYYY-MM-DD`; kept as text so the validator can vouch for the format
    /// of whatever was loaded from disk.
    #[getset(get = "pub")]
    draw_date: String,
    /// The six main numbers, in the order the source lists them.
    #[getset(get_copy = "pub")]
    numbers: [LottoNumber; NUMBERS_PER_DRAW],
    #[getset(get_copy = "pub")]
    bonus: LottoNumber,
    /// First-tier prize per winner, in won.
    #[getset(get_copy = "pub")]
    first_prize_amount: u64,
    #[getset(get_copy = "pub")]
    first_prize_winners: u32,
    #[getset(get_copy = "pub")]
    status: RecordStatus,
}

/// The dataset file: all draws, newest first.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub lottery: String,
    pub last_updated: DateTime<Utc>,
    pub latest_round: u32,
    pub draws: Vec<DrawRecord>,
}

impl Dataset {
    pub fn new(draws: Vec<DrawRecord>, latest_round: u32) -> Self {
        Self {
            lottery: LOTTERY_ID.to_owned(),
            last_updated: Utc::now(),
            latest_round,
            draws,
        }
    }

    /// Newest first, the order consumers read.
    pub fn sort_draws(&mut self) {
        self.draws.sort_by_key(|d| std::cmp::Reverse(d.round()));
    }

    pub fn draw(&self, round: u32) -> Option<&DrawRecord> {
        self.draws.iter().find(|d| d.round() == round)
    }

    pub fn recent(&self, count: usize) -> &[DrawRecord] {
        &self.draws[..count.min(self.draws.len())]
    }

    /// Zero prizes across the board usually mean an earlier run saved
    /// incomplete records.
    pub fn all_prizes_zero(&self) -> bool {
        self.draws.iter().all(|d| d.first_prize_amount() == 0)
    }
}
