//! Structural integrity checks over the merged dataset.

use itertools::Itertools;

use crate::schema::{DrawRecord, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_DRAW};

#[derive(Debug)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Checks every record plus the round sequence, reporting every problem at
/// once so operators can fix them all from a single run.
///
/// A record-level rule failing does not suppress the others; the sequence
/// rule runs on an ascending-sorted copy of the round numbers and flags any
/// adjacent pair whose delta is not exactly one.
pub fn validate_dataset(draws: &[DrawRecord]) -> Validation {
    let mut errors = Vec::new();
    if draws.is_empty() {
        return Validation {
            valid: false,
            errors: vec!["No draws found".to_owned()],
        };
    }

    for draw in draws {
        let numbers = draw.numbers();
        for n in numbers {
            if !(MIN_NUMBER..=MAX_NUMBER).contains(&n.get()) {
                errors.push(format!(
                    "Round {}: number {n} out of range {MIN_NUMBER}-{MAX_NUMBER}",
                    draw.round()
                ));
            }
        }
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&draw.bonus().get()) {
            errors.push(format!(
                "Round {}: bonus {} out of range {MIN_NUMBER}-{MAX_NUMBER}",
                draw.round(),
                draw.bonus()
            ));
        }
        if numbers.iter().unique().count() != NUMBERS_PER_DRAW {
            errors.push(format!(
                "Round {}: duplicate numbers in {}",
                draw.round(),
                numbers.iter().join(",")
            ));
        }
        if !regex!(r"^\d{4}-\d{2}-\d{2}$").is_match(draw.draw_date()) {
            errors.push(format!(
                "Round {}: invalid date format {:?}",
                draw.round(),
                draw.draw_date()
            ));
        }
    }

    let rounds = draws.iter().map(DrawRecord::round).sorted().collect_vec();
    for (prev, next) in rounds.iter().tuple_windows() {
        if *next != prev + 1 {
            errors.push(format!("Missing round(s) between {prev} and {next}"));
        }
    }

    Validation {
        valid: errors.is_empty(),
        errors,
    }
}
