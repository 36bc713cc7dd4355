//! Small-number suppression
//!
//! A privacy control, not a correctness feature: any published cell with a
//! small non-zero count is replaced by a redacted marker, and secondary
//! suppression may redact the companion cell in the same row so a
//! suppressed count cannot be recovered by subtraction from the other.

use crate::MeasureRow;

/// Suppression configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SuppressionPolicy {
    /// Counts in `1..=threshold` are redacted
    pub threshold: u64,
    /// Whether to also redact the companion cell of a row in which
    /// exactly one cell was redacted
    pub secondary: bool,
}

impl Default for SuppressionPolicy {
    fn default() -> Self {
        Self {
            threshold: 5,
            secondary: true,
        }
    }
}

impl SuppressionPolicy {
    /// Check whether a count must be redacted. Zero is publishable: it
    /// identifies nobody.
    pub const fn suppresses(&self, count: u64) -> bool {
        count > 0 && count <= self.threshold
    }

    /// Apply primary and secondary suppression to one output row
    ///
    /// Must only be called once the row's counts are final.
    pub fn apply(&self, row: &mut MeasureRow) {
        let mut redact_numerator = row.numerator.is_some_and(|n| self.suppresses(n));
        let mut redact_denominator = row.denominator.is_some_and(|d| self.suppresses(d));

        if self.secondary && (redact_numerator != redact_denominator) {
            redact_numerator = true;
            redact_denominator = true;
        }

        if redact_numerator {
            row.numerator = None;
        }
        if redact_denominator {
            row.denominator = None;
        }
        if redact_numerator || redact_denominator {
            row.rate = None;
            row.suppressed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(numerator: u64, denominator: u64) -> MeasureRow {
        MeasureRow {
            measure_id: "m".to_string(),
            category: "population".to_string(),
            numerator: Some(numerator),
            denominator: Some(denominator),
            rate: None,
            suppressed: false,
        }
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(5, true)]
    #[case(6, false)]
    #[case(50, false)]
    fn test_threshold_boundaries(#[case] count: u64, #[case] suppressed: bool) {
        let policy = SuppressionPolicy::default();
        assert_eq!(policy.suppresses(count), suppressed);
    }

    #[test]
    fn test_secondary_redacts_companion_cell() {
        // Numerator 3 is small; the denominator of 50 would let a reader
        // recover it from the rate, so it goes too
        let policy = SuppressionPolicy::default();
        let mut r = row(3, 50);
        policy.apply(&mut r);

        assert_eq!(r.numerator, None);
        assert_eq!(r.denominator, None);
        assert!(r.suppressed);
    }

    #[test]
    fn test_primary_only_keeps_companion_cell() {
        let policy = SuppressionPolicy {
            threshold: 5,
            secondary: false,
        };
        let mut r = row(3, 50);
        policy.apply(&mut r);

        assert_eq!(r.numerator, None);
        assert_eq!(r.denominator, Some(50));
        assert!(r.suppressed);
        assert_eq!(r.rate, None);
    }

    #[test]
    fn test_large_counts_untouched() {
        let policy = SuppressionPolicy::default();
        let mut r = row(30, 50);
        r.rate = Some(rust_decimal::Decimal::new(6, 1));
        policy.apply(&mut r);

        assert_eq!(r.numerator, Some(30));
        assert_eq!(r.denominator, Some(50));
        assert!(r.rate.is_some());
        assert!(!r.suppressed);
    }

    #[test]
    fn test_zero_numerator_publishable() {
        let policy = SuppressionPolicy::default();
        let mut r = row(0, 50);
        policy.apply(&mut r);
        assert_eq!(r.numerator, Some(0));
        assert!(!r.suppressed);
    }
}
