use crate::fold_fullwidth_ascii;
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

static SEIREKI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]{4})年").unwrap());
static REIWA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"令和([0-9]{1,2})年").unwrap());
static HEISEI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"平成([0-9]{1,2})年").unwrap());
static SHOWA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"昭和([0-9]{1,2})年").unwrap());

const REIWA_START: i32 = 2019;
const HEISEI_START: i32 = 1989;
const SHOWA_START: i32 = 1926;

/// Extract a built year (西暦, Gregorian) from free text.
///
/// Converts 令和/平成/昭和 era years when present. Years more than two
/// years in the future relative to today are rejected as implausible
/// (a parse of an unrelated four-digit number on the page).
pub fn extract_built_year(text: &str) -> Option<i32> {
    let folded = fold_fullwidth_ascii(text);

    let year = if let Some(caps) = REIWA_RE.captures(&folded) {
        let era_year: i32 = caps[1].parse().ok()?;
        REIWA_START + era_year - 1
    } else if let Some(caps) = HEISEI_RE.captures(&folded) {
        let era_year: i32 = caps[1].parse().ok()?;
        HEISEI_START + era_year - 1
    } else if let Some(caps) = SHOWA_RE.captures(&folded) {
        let era_year: i32 = caps[1].parse().ok()?;
        SHOWA_START + era_year - 1
    } else if let Some(caps) = SEIREKI_RE.captures(&folded) {
        caps[1].parse().ok()?
    } else {
        return None;
    };

    let current_year = chrono::Utc::now().year();
    if year <= current_year + 2 {
        Some(year)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seireki_year() {
        assert_eq!(extract_built_year("2015年築"), Some(2015));
    }

    #[test]
    fn reiwa_era() {
        assert_eq!(extract_built_year("令和2年築"), Some(2020));
    }

    #[test]
    fn heisei_era() {
        assert_eq!(extract_built_year("平成10年築"), Some(1998));
    }

    #[test]
    fn showa_era() {
        assert_eq!(extract_built_year("昭和60年築"), Some(1985));
    }

    #[test]
    fn implausibly_far_future_is_rejected() {
        assert_eq!(extract_built_year("9999年築"), None);
    }
}
