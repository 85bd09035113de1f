//! Extraction of a [`DrawRecord`] from a round's result page.

use anyhow::{anyhow, Context};
use scraper::Html;

use crate::amount::{parse_grouped_amount, parse_korean_amount};
use crate::schema::{DrawRecord, LottoNumber, RecordStatus, NUMBERS_PER_DRAW};

/// Turns a raw result page into a fully populated record, or fails.
///
/// The upstream template is brittle, so the matching rules live behind this
/// seam; orchestration and persistence never see them.  Implementations must
/// not produce partial records.
pub trait DrawPageParser {
    fn parse(&self, round: u32, html: &str) -> anyhow::Result<DrawRecord>;
}

/// Parses the natural-language summary in `<meta name="description">`:
///
/// `1205회 로또는 2026년 1월 3일에 추첨하였고 당첨번호는 1,4,16,23,31,41
/// 보너스 2 입니다. 1등 당첨자는 10명이며 32억2638만6263원씩`
#[derive(Clone, Copy, Debug, Default)]
pub struct MetaDescriptionParser;

impl DrawPageParser for MetaDescriptionParser {
    fn parse(&self, round: u32, html: &str) -> anyhow::Result<DrawRecord> {
        let document = Html::parse_document(html);
        let description = document
            .select(selector!(r#"meta[name="description"]"#))
            .next()
            .context("description meta tag not found")?
            .value()
            .attr("content")
            .context("description meta tag has no content")?;

        let draw_date = parse_draw_date(description)?;
        let (numbers, bonus) = parse_winning_numbers(description)?;
        let winners = parse_winner_count(description);
        // The description only approximates the prize.  The prize table
        // carries the exact figure, but it is trustworthy only when the first
        // tier was actually awarded; with zero winners the figure found there
        // belongs to a neighboring tier, so the approximation stands.
        let amount = match find_exact_amount(html) {
            Some(exact) if winners > 0 => exact,
            _ => parse_korean_amount(description),
        };

        Ok(DrawRecord::builder()
            .round(round)
            .draw_date(draw_date)
            .numbers(numbers)
            .bonus(bonus)
            .first_prize_amount(amount)
            .first_prize_winners(winners)
            .status(RecordStatus::Success)
            .build())
    }
}

fn parse_draw_date(description: &str) -> anyhow::Result<String> {
    let caps = regex!(r"(\d{4})년\s*(\d{1,2})월\s*(\d{1,2})일")
        .captures(description)
        .context("draw date not found in description")?;
    Ok(format!("{}-{:0>2}-{:0>2}", &caps[1], &caps[2], &caps[3]))
}

fn parse_winning_numbers(
    description: &str,
) -> anyhow::Result<([LottoNumber; NUMBERS_PER_DRAW], LottoNumber)> {
    let caps = regex!(r"당첨번호는\s*([\d,]+)\s*보너스\s*(\d+)")
        .captures(description)
        .context("winning numbers not found in description")?;
    let numbers = caps[1]
        .split(',')
        .map(parse_number)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let count = numbers.len();
    let numbers: [LottoNumber; NUMBERS_PER_DRAW] = numbers
        .try_into()
        .map_err(|_| anyhow!("expected {NUMBERS_PER_DRAW} main numbers, found {count}"))?;
    let bonus = parse_number(&caps[2])?;
    Ok((numbers, bonus))
}

fn parse_number(text: &str) -> anyhow::Result<LottoNumber> {
    let value: u8 = text
        .trim()
        .parse()
        .with_context(|| format!("invalid number {text:?}"))?;
    LottoNumber::try_from(value).map_err(|v| anyhow!("number {v} out of range"))
}

fn parse_winner_count(description: &str) -> u32 {
    regex!(r"1등\s*당첨자는\s*(\d+)명")
        .captures(description)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// A long comma-grouped won figure from the page body.  The first-tier row
/// precedes the other tiers on the upstream page, so the first match is the
/// first-tier amount.
fn find_exact_amount(html: &str) -> Option<u64> {
    let caps = regex!(r"(\d{1,3}(?:,\d{3}){2,})원").captures(html)?;
    parse_grouped_amount(&caps[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = "1205회 로또는 2026년 1월 3일에 추첨하였고 당첨번호는 \
                               1,4,16,23,31,41 보너스 2 입니다. 1등 당첨자는 10명이며 \
                               32억2638만6263원씩";

    fn page(description: &str, body: &str) -> String {
        format!(
            r#"<html><head><meta name="description" content="{description}"></head><body>{body}</body></html>"#
        )
    }

    fn numbers_of(record: &DrawRecord) -> Vec<u8> {
        record.numbers().iter().map(|n| n.get()).collect()
    }

    #[test]
    fn parses_a_complete_page() {
        let html = page(DESCRIPTION, "<td>3,226,386,263원</td>");
        let record = MetaDescriptionParser.parse(1205, &html).unwrap();
        assert_eq!(record.round(), 1205);
        assert_eq!(record.draw_date(), "2026-01-03");
        assert_eq!(numbers_of(&record), vec![1, 4, 16, 23, 31, 41]);
        assert_eq!(record.bonus().get(), 2);
        assert_eq!(record.first_prize_winners(), 10);
        assert_eq!(record.status(), RecordStatus::Success);
    }

    #[test]
    fn exact_figure_supersedes_the_approximation() {
        let html = page(DESCRIPTION, "<td>3,226,386,263원</td>");
        let record = MetaDescriptionParser.parse(1205, &html).unwrap();
        assert_eq!(record.first_prize_amount(), 3_226_386_263);
    }

    #[test]
    fn approximation_stands_without_an_exact_figure() {
        let html = page(DESCRIPTION, "");
        let record = MetaDescriptionParser.parse(1205, &html).unwrap();
        assert_eq!(record.first_prize_amount(), 3_226_386_263);
    }

    #[test]
    fn zero_winners_keeps_the_approximated_amount() {
        let description = "1111회 로또는 2024년 3월 16일에 추첨하였고 당첨번호는 \
                           2,3,9,21,25,40 보너스 29 입니다. 1등 당첨자는 0명이며 0원씩";
        // The grouped figure in the body belongs to the second tier.
        let html = page(description, "<td>54,864,272원</td>");
        let record = MetaDescriptionParser.parse(1111, &html).unwrap();
        assert_eq!(record.first_prize_winners(), 0);
        assert_eq!(record.first_prize_amount(), 0);
    }

    #[test]
    fn rejects_wrong_number_count() {
        let description = "1205회 로또는 2026년 1월 3일에 추첨하였고 당첨번호는 \
                           1,4,16,23,31 보너스 2 입니다.";
        assert!(MetaDescriptionParser
            .parse(1205, &page(description, ""))
            .is_err());
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let description = "1205회 로또는 2026년 1월 3일에 추첨하였고 당첨번호는 \
                           1,4,16,23,31,46 보너스 2 입니다.";
        assert!(MetaDescriptionParser
            .parse(1205, &page(description, ""))
            .is_err());
    }

    #[test]
    fn rejects_missing_description_or_date() {
        assert!(MetaDescriptionParser
            .parse(1205, "<html><head></head></html>")
            .is_err());
        let description = "1205회 로또 당첨번호는 1,4,16,23,31,41 보너스 2 입니다.";
        assert!(MetaDescriptionParser
            .parse(1205, &page(description, ""))
            .is_err());
    }

    #[test]
    fn missing_winner_sentence_means_zero_winners() {
        let description = "1회 로또는 2002년 12월 7일에 추첨하였고 당첨번호는 \
                           10,23,29,33,37,40 보너스 16 입니다.";
        let record = MetaDescriptionParser.parse(1, &page(description, "")).unwrap();
        assert_eq!(record.first_prize_winners(), 0);
        assert_eq!(record.first_prize_amount(), 0);
    }
}
