//! Run-level circuit breakers (§4.5 "Circuit breakers"). Each tracker is
//! scoped to a single task run; nothing here is persisted between runs
//! except the `ScraperAlert` row a trip writes.

use std::collections::HashMap;

pub const TRACKED_FIELDS: &[&str] = &["price", "building_name", "area", "layout", "floor", "built_year"];

/// Per-field miss-rate tracker. A field trips the breaker when its
/// new-error count this run reaches `consecutive_errors`, or its error
/// rate exceeds `critical_error_rate` with at least `critical_error_count`
/// occurrences.
#[derive(Debug, Default)]
pub struct FieldErrorTracker {
    counts: HashMap<String, (u32, u32)>, // (misses, attempts)
}

impl FieldErrorTracker {
    pub fn record(&mut self, field: &str, present: bool) {
        let entry = self.counts.entry(field.to_string()).or_insert((0, 0));
        entry.1 += 1;
        if !present {
            entry.0 += 1;
        }
    }

    /// Raw `(misses, attempts)` for a field, used to fill in the alert row
    /// once `tripped` reports it.
    pub fn counts(&self, field: &str) -> (u32, u32) {
        self.counts.get(field).copied().unwrap_or((0, 0))
    }

    /// Returns the first tracked field that has tripped, if any.
    pub fn tripped(&self, consecutive_errors: u32, critical_error_rate: f64, critical_error_count: u32) -> Option<String> {
        for field in TRACKED_FIELDS {
            if let Some(&(misses, attempts)) = self.counts.get(*field) {
                if misses >= consecutive_errors {
                    return Some((*field).to_string());
                }
                if misses >= critical_error_count {
                    let rate = misses as f64 / attempts.max(1) as f64;
                    if rate > critical_error_rate {
                        return Some((*field).to_string());
                    }
                }
            }
        }
        None
    }

    /// §4.7's partial-required tolerance: a field may miss up to
    /// `missing_rate_ceiling` of attempts once at least `sample_floor`
    /// attempts have been made, independent of the generic thresholds
    /// above.
    pub fn partial_required_tripped(&self, field: &str, sample_floor: u32, missing_rate_ceiling: f64) -> bool {
        let (misses, attempts) = self.counts(field);
        attempts >= sample_floor && (misses as f64 / attempts as f64) > missing_rate_ceiling
    }
}

/// Guards against a run full of implausible attribute swings (§4.5):
/// ≥70% change in area/price, or floor dropping to null where it was
/// previously non-null. `threshold` flagged updates in a row (default 5,
/// `SCRAPER_SUSPICIOUS_UPDATE_THRESHOLD`) aborts the run.
#[derive(Debug, Default)]
pub struct SuspiciousUpdateGuard {
    streak: u32,
}

const SUSPICIOUS_CHANGE_RATIO: f64 = 0.70;

impl SuspiciousUpdateGuard {
    pub fn is_suspicious(old_price: i64, new_price: i64, old_area: Option<f64>, new_area: Option<f64>, old_floor: Option<i32>, new_floor: Option<i32>) -> bool {
        let price_swing = old_price > 0
            && (new_price - old_price).unsigned_abs() as f64 / old_price as f64 >= SUSPICIOUS_CHANGE_RATIO;
        let area_swing = match (old_area, new_area) {
            (Some(old), Some(new)) if old > 0.0 => ((new - old).abs() / old) >= SUSPICIOUS_CHANGE_RATIO,
            _ => false,
        };
        let floor_dropped_to_null = old_floor.is_some() && new_floor.is_none();
        price_swing || area_swing || floor_dropped_to_null
    }

    /// Records one flag outcome, returning `true` once `threshold` flags
    /// have occurred in a row (`SCRAPER_SUSPICIOUS_UPDATE_THRESHOLD`).
    pub fn record(&mut self, flagged: bool, threshold: u32) -> bool {
        if flagged {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        self.streak >= threshold
    }
}

/// Optional per-parser selector success/failure tracker (§4.5): a
/// selector with ≥50% failure rate after ≥5 failures raises an alert.
#[derive(Debug, Default)]
pub struct SelectorUsageTracker {
    counts: HashMap<String, (u32, u32)>, // (failures, attempts)
}

impl SelectorUsageTracker {
    pub fn record(&mut self, selector: &str, succeeded: bool) {
        let entry = self.counts.entry(selector.to_string()).or_insert((0, 0));
        entry.1 += 1;
        if !succeeded {
            entry.0 += 1;
        }
    }

    pub fn tripped_selectors(&self) -> Vec<String> {
        self.counts
            .iter()
            .filter(|(_, &(failures, attempts))| failures >= 5 && (failures as f64 / attempts as f64) >= 0.5)
            .map(|(selector, _)| selector.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_tracker_trips_on_consecutive_errors() {
        let mut tracker = FieldErrorTracker::default();
        for _ in 0..5 {
            tracker.record("price", false);
        }
        assert_eq!(tracker.tripped(5, 0.5, 10), Some("price".to_string()));
    }

    #[test]
    fn field_error_tracker_does_not_trip_below_threshold() {
        let mut tracker = FieldErrorTracker::default();
        tracker.record("price", false);
        tracker.record("price", true);
        assert_eq!(tracker.tripped(5, 0.5, 10), None);
    }

    #[test]
    fn field_error_tracker_trips_on_error_rate() {
        let mut tracker = FieldErrorTracker::default();
        for _ in 0..11 {
            tracker.record("area", false);
        }
        for _ in 0..5 {
            tracker.record("area", true);
        }
        assert_eq!(tracker.tripped(100, 0.5, 10), Some("area".to_string()));
    }

    #[test]
    fn suspicious_update_guard_flags_large_price_swing() {
        assert!(SuspiciousUpdateGuard::is_suspicious(5000, 1000, None, None, None, None));
        assert!(!SuspiciousUpdateGuard::is_suspicious(5000, 4800, None, None, None, None));
    }

    #[test]
    fn suspicious_update_guard_flags_floor_dropping_to_null() {
        assert!(SuspiciousUpdateGuard::is_suspicious(5000, 5000, None, None, Some(5), None));
    }

    #[test]
    fn suspicious_update_guard_trips_after_five_in_a_row() {
        let mut guard = SuspiciousUpdateGuard::default();
        for _ in 0..4 {
            assert!(!guard.record(true, 5));
        }
        assert!(guard.record(true, 5));
    }

    #[test]
    fn suspicious_update_guard_streak_resets_on_clean_update() {
        let mut guard = SuspiciousUpdateGuard::default();
        guard.record(true, 5);
        guard.record(true, 5);
        assert!(!guard.record(false, 5));
        for _ in 0..4 {
            assert!(!guard.record(true, 5));
        }
    }

    #[test]
    fn suspicious_update_guard_respects_custom_threshold() {
        let mut guard = SuspiciousUpdateGuard::default();
        assert!(!guard.record(true, 2));
        assert!(guard.record(true, 2));
    }

    #[test]
    fn selector_usage_tracker_reports_only_tripped_selectors() {
        let mut tracker = SelectorUsageTracker::default();
        for _ in 0..5 {
            tracker.record("price_cell", false);
        }
        tracker.record("address_cell", false);
        assert_eq!(tracker.tripped_selectors(), vec!["price_cell".to_string()]);
    }
}
