//! Parsers for the localized numeric text on the upstream pages.

/// Parses mixed Korean large-unit notation into won.
///
/// The amount combines an optional 억 (10^8) component, an optional 만 (10^4)
/// component, and an optional remainder in base units before 원; whichever
/// components are present are summed.  `"11억229만8407원"` is 1,102,298,407
/// and `"3만원"` is 30,000.  Text with no such amount yields zero.
pub fn parse_korean_amount(text: &str) -> u64 {
    for caps in regex!(r"(?:(\d+)\s*억)?\s*(?:(\d+)\s*만)?\s*(\d+)?\s*원").captures_iter(text) {
        if caps.get(1).is_none() && caps.get(2).is_none() && caps.get(3).is_none() {
            // A bare 원 with no digits attached is not an amount.
            continue;
        }
        let component = |idx: usize, unit: u64| {
            caps.get(idx)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .unwrap_or(0)
                * unit
        };
        return component(1, 100_000_000) + component(2, 10_000) + component(3, 1);
    }
    0
}

/// Parses a comma-grouped digit string such as `"1,102,298,407"`.
pub fn parse_grouped_amount(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_mixed_notation() {
        assert_eq!(parse_korean_amount("11억229만8407원"), 1_102_298_407);
        assert_eq!(parse_korean_amount("32억2638만6263원씩"), 3_226_386_263);
    }

    #[test]
    fn components_are_independently_optional() {
        assert_eq!(parse_korean_amount("3만원"), 30_000);
        assert_eq!(parse_korean_amount("11억원"), 1_100_000_000);
        assert_eq!(parse_korean_amount("8407원"), 8_407);
        assert_eq!(parse_korean_amount("0원씩"), 0);
    }

    #[test]
    fn amount_is_found_inside_surrounding_text() {
        let description = "1205회 로또는 2026년 1월 3일에 추첨하였고 당첨번호는 1,4,16,23,31,41 \
                           보너스 2 입니다. 1등 당첨자는 10명이며 32억2638만6263원씩";
        assert_eq!(parse_korean_amount(description), 3_226_386_263);
    }

    #[test]
    fn no_amount_yields_zero() {
        assert_eq!(parse_korean_amount("당첨자가 없습니다"), 0);
        assert_eq!(parse_korean_amount(""), 0);
    }

    #[test]
    fn grouped_amount() {
        assert_eq!(parse_grouped_amount("1,102,298,407"), Some(1_102_298_407));
        assert_eq!(parse_grouped_amount("30,000"), Some(30_000));
        assert_eq!(parse_grouped_amount("no digits"), None);
    }
}
