use crate::fold_fullwidth_ascii;
use once_cell::sync::Lazy;
use regex::Regex;

const MIN_AREA_SQM: f64 = 10.0;
const MAX_AREA_SQM: f64 = 1000.0;

static AREA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+(?:,[0-9]{3})*(?:\.[0-9]+)?)\s*(?:㎡|m²|m2|平米)").unwrap());

/// Extract a floor area in square meters from free text.
///
/// Tolerates `㎡`, `m²`, `m2`, `平米` unit markers and comma-grouped
/// integers. Values outside `[10, 1000]` are rejected.
pub fn extract_area(text: &str) -> Option<f64> {
    let folded = fold_fullwidth_ascii(text);
    let caps = AREA_RE.captures(&folded)?;
    let value: f64 = caps[1].replace(',', "").parse().ok()?;

    if (MIN_AREA_SQM..=MAX_AREA_SQM).contains(&value) {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_square_meter_marker() {
        assert_eq!(extract_area("60.00㎡"), Some(60.0));
    }

    #[test]
    fn accepts_m2_and_m_squared_forms() {
        assert_eq!(extract_area("75.5m2"), Some(75.5));
        assert_eq!(extract_area("75.5m²"), Some(75.5));
    }

    #[test]
    fn accepts_heibei_marker_and_comma_grouping() {
        assert_eq!(extract_area("1,000平米"), Some(1000.0));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(extract_area("5㎡"), None);
        assert_eq!(extract_area("1200㎡"), None);
    }

    #[test]
    fn no_unit_marker_returns_none() {
        assert_eq!(extract_area("面積不明"), None);
    }
}
