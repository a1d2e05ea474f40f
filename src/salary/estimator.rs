use crate::schema::SalaryRecord;

/// Multiplier applied when only the lower bound is known.
const LOWER_ONLY_FACTOR: f64 = 1.2;

/// Multiplier applied when only the upper bound is known.
const UPPER_ONLY_FACTOR: f64 = 0.8;

/// Estimates one representative salary for a vacancy in `target_currency`.
///
/// Returns `None` when the record is absent, its currency differs from the
/// target (exact, case-sensitive), or neither bound is usable.
///
/// RULES:
/// - both bounds: `lower + upper / 2`
/// - lower only:  `lower * 1.2`
/// - upper only:  `upper * 0.8`
///
/// The arithmetic runs in `f64` and the result is truncated toward zero.
/// The two-bound rule is `lower + (upper / 2)`, NOT the midpoint of the
/// range.
///
/// NOTE:
/// A bound of `0` counts as absent. Whether an employer can legitimately
/// offer exactly 0 is unresolved; do not change this to a plain
/// `is_some()` check without a product decision.
pub fn estimate(record: Option<&SalaryRecord>, target_currency: &str) -> Option<u64> {
    let record = record?;
    if record.currency != target_currency {
        return None;
    }

    let lower = record.lower.filter(|&v| v != 0);
    let upper = record.upper.filter(|&v| v != 0);

    let estimated = match (lower, upper) {
        (Some(lower), Some(upper)) => lower as f64 + upper as f64 / 2.0,
        (Some(lower), None) => lower as f64 * LOWER_ONLY_FACTOR,
        (None, Some(upper)) => upper as f64 * UPPER_ONLY_FACTOR,
        (None, None) => return None,
    };

    Some(estimated as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lower: Option<u64>, upper: Option<u64>, currency: &str) -> SalaryRecord {
        SalaryRecord {
            lower,
            upper,
            currency: currency.to_string(),
        }
    }

    #[test]
    fn absent_record_is_unusable() {
        assert_eq!(estimate(None, "RUR"), None);
    }

    #[test]
    fn currency_mismatch_is_unusable() {
        let usd = record(Some(100_000), Some(150_000), "USD");
        assert_eq!(estimate(Some(&usd), "RUR"), None);

        // case-sensitive: "rur" is not "RUR"
        let lowercase = record(Some(100_000), None, "rur");
        assert_eq!(estimate(Some(&lowercase), "RUR"), None);
    }

    #[test]
    fn both_bounds_use_lower_plus_half_upper() {
        let both = record(Some(100_000), Some(150_000), "RUR");
        assert_eq!(estimate(Some(&both), "RUR"), Some(175_000));
    }

    #[test]
    fn both_bounds_truncate_fraction() {
        let odd = record(Some(10), Some(5), "rub");
        assert_eq!(estimate(Some(&odd), "rub"), Some(12));
    }

    #[test]
    fn lower_only_is_scaled_up() {
        let lower = record(Some(100_000), None, "RUR");
        assert_eq!(estimate(Some(&lower), "RUR"), Some(120_000));
    }

    #[test]
    fn upper_only_is_scaled_down() {
        let upper = record(None, Some(100_000), "RUR");
        assert_eq!(estimate(Some(&upper), "RUR"), Some(80_000));
    }

    #[test]
    fn upper_only_below_one_truncates_to_zero() {
        let tiny = record(None, Some(1), "RUR");
        assert_eq!(estimate(Some(&tiny), "RUR"), Some(0));
    }

    #[test]
    fn no_bounds_is_unusable() {
        let empty = record(None, None, "RUR");
        assert_eq!(estimate(Some(&empty), "RUR"), None);
    }

    #[test]
    fn zero_bounds_count_as_absent() {
        let zeros = record(Some(0), Some(0), "rub");
        assert_eq!(estimate(Some(&zeros), "rub"), None);

        let zero_lower = record(Some(0), Some(100_000), "rub");
        assert_eq!(estimate(Some(&zero_lower), "rub"), Some(80_000));

        let zero_upper = record(Some(100_000), Some(0), "rub");
        assert_eq!(estimate(Some(&zero_upper), "rub"), Some(120_000));
    }
}
