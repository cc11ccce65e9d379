use crate::fold_fullwidth_ascii;
use once_cell::sync::Lazy;
use regex::Regex;

static FLOOR_OF_TOTAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)階[/／]").unwrap());
static FLOOR_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)階").unwrap());

static BASEMENT_FIRST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"地下([0-9]+)階地上([0-9]+)階建").unwrap());
static TOTAL_THEN_BASEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)階建?地下([0-9]+)階?").unwrap());
static TOTAL_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)階建").unwrap());

/// Extract the unit's own floor number from patterns like `N階/M階建`.
///
/// Picks the first (the unit's floor), not the building's total floor
/// count. Falls back to a bare `N階` if no `/`-separated total is present.
pub fn extract_floor_number(text: &str) -> Option<i32> {
    let folded = fold_fullwidth_ascii(text);

    if let Some(caps) = FLOOR_OF_TOTAL_RE.captures(&folded) {
        return caps[1].parse().ok();
    }
    FLOOR_ONLY_RE
        .captures(&folded)
        .and_then(|caps| caps[1].parse().ok())
}

/// Extract `(total_floors, basement_floors)` from free text.
///
/// Recognizes `N階地下K` and `K階地下N階建` variants. The above-ground
/// count is always returned as `total_floors`; when no basement is
/// mentioned, `basement_floors` is `0`.
pub fn extract_total_floors(text: &str) -> Option<(i32, i32)> {
    let folded = fold_fullwidth_ascii(text);

    if let Some(caps) = BASEMENT_FIRST_RE.captures(&folded) {
        let basement: i32 = caps[1].parse().ok()?;
        let total: i32 = caps[2].parse().ok()?;
        return Some((total, basement));
    }
    if let Some(caps) = TOTAL_THEN_BASEMENT_RE.captures(&folded) {
        let total: i32 = caps[1].parse().ok()?;
        let basement: i32 = caps[2].parse().ok()?;
        return Some((total, basement));
    }
    if let Some(caps) = TOTAL_ONLY_RE.captures(&folded) {
        let total: i32 = caps[1].parse().ok()?;
        return Some((total, 0));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_of_total_picks_unit_floor() {
        assert_eq!(extract_floor_number("5階/10階建"), Some(5));
    }

    #[test]
    fn bare_floor_number() {
        assert_eq!(extract_floor_number("3階"), Some(3));
    }

    #[test]
    fn total_floors_without_basement() {
        assert_eq!(extract_total_floors("10階建"), Some((10, 0)));
    }

    #[test]
    fn total_floors_with_basement_first() {
        assert_eq!(extract_total_floors("地下2階地上10階建"), Some((10, 2)));
    }

    #[test]
    fn total_floors_with_basement_trailing() {
        assert_eq!(extract_total_floors("10階建地下2階"), Some((10, 2)));
    }

    #[test]
    fn no_floor_info_returns_none() {
        assert_eq!(extract_floor_number("情報なし"), None);
        assert_eq!(extract_total_floors("情報なし"), None);
    }
}
