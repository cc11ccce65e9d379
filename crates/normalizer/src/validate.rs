const MIN_PRICE_MAN_YEN: i64 = 100;
const MAX_PRICE_MAN_YEN: i64 = 10_000_000;
const MIN_AREA_SQM: f64 = 10.0;
const MAX_AREA_SQM: f64 = 1000.0;

/// Whether a price (already extracted, in man-yen) is within the
/// plausible range for a used condominium unit.
pub fn validate_price(price: i64) -> bool {
    (MIN_PRICE_MAN_YEN..=MAX_PRICE_MAN_YEN).contains(&price)
}

/// Whether an area (already extracted, in square meters) is within the
/// plausible range for a used condominium unit.
pub fn validate_area(area: f64) -> bool {
    (MIN_AREA_SQM..=MAX_AREA_SQM).contains(&area)
}

/// A unit's floor number must not exceed the building's total floor count
/// when both are known. Either being absent is not itself a validation
/// failure — that is a missing-field concern handled elsewhere.
pub fn validate_floor_number(floor: Option<i32>, total_floors: Option<i32>) -> bool {
    match (floor, total_floors) {
        (Some(f), Some(total)) => f <= total,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_range() {
        assert!(validate_price(5000));
        assert!(!validate_price(50));
        assert!(!validate_price(50_000_000));
    }

    #[test]
    fn area_range() {
        assert!(validate_area(60.0));
        assert!(!validate_area(5.0));
    }

    #[test]
    fn floor_must_not_exceed_total() {
        assert!(validate_floor_number(Some(5), Some(10)));
        assert!(!validate_floor_number(Some(11), Some(10)));
        assert!(validate_floor_number(None, Some(10)));
        assert!(validate_floor_number(Some(5), None));
    }
}
