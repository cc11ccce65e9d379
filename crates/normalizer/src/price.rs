use crate::fold_fullwidth_ascii;
use once_cell::sync::Lazy;
use regex::Regex;

const MIN_PRICE_MAN_YEN: i64 = 100;
const MAX_PRICE_MAN_YEN: i64 = 10_000_000;

static OKU_MAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)億([0-9,]+)万円").unwrap());
static OKU_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)億(?:円)?(?:[^万]|$)").unwrap());
static MAN_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9,]+)万円").unwrap());

/// Extract a price in man-yen (万円) from free text.
///
/// Accepts `XX,XXX万円`, `N億YY万円`, and `N億` forms. Values outside
/// `[100, 10_000_000]` man-yen are rejected as implausible (likely a parse
/// of the wrong number on the page) and `None` is returned instead.
pub fn extract_price(text: &str) -> Option<i64> {
    let folded = fold_fullwidth_ascii(text);

    let value = if let Some(caps) = OKU_MAN.captures(&folded) {
        let oku: i64 = caps[1].parse().ok()?;
        let man: i64 = caps[2].replace(',', "").parse().ok()?;
        oku * 10_000 + man
    } else if let Some(caps) = MAN_ONLY.captures(&folded) {
        caps[1].replace(',', "").parse().ok()?
    } else if let Some(caps) = OKU_ONLY.captures(&folded) {
        let oku: i64 = caps[1].parse().ok()?;
        oku * 10_000
    } else {
        return None;
    };

    if (MIN_PRICE_MAN_YEN..=MAX_PRICE_MAN_YEN).contains(&value) {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_man_yen() {
        assert_eq!(extract_price("5,000万円"), Some(5000));
    }

    #[test]
    fn oku_and_man() {
        assert_eq!(extract_price("1億2,000万円"), Some(12_000));
    }

    #[test]
    fn oku_only() {
        assert_eq!(extract_price("1億円"), Some(10_000));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(extract_price("50万円"), None);
        assert_eq!(extract_price("99,999,999万円"), None);
    }

    #[test]
    fn no_match_returns_none() {
        assert_eq!(extract_price("価格応相談"), None);
    }
}
