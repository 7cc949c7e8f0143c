//! Wilson score lower bound
//!
//! Raw win percentages are unreliable on small samples: two wins out of two
//! games is not a better move than 30,000 wins out of 50,000. The lower end
//! of the Wilson score interval discounts a rate by how little evidence
//! supports it.

/// z for a ~95% two-sided interval
pub const Z_95: f64 = 1.96;

/// Lower bound of the Wilson score interval for `wins` out of `total`
///
/// Returns 0.0 when `total` is zero or no game was won.
pub fn lower_bound(wins: u64, total: u64) -> f64 {
    if total == 0 || wins == 0 {
        return 0.0;
    }

    let n = total as f64;
    let z2 = Z_95 * Z_95;
    let phat = wins.min(total) as f64 / n;

    let a = phat + z2 / (2.0 * n);
    let b = Z_95 * ((phat * (1.0 - phat) + z2 / (4.0 * n)) / n).sqrt();
    let c = 1.0 + z2 / n;

    ((a - b) / c).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_total_is_neutral() {
        assert_eq!(lower_bound(0, 0), 0.0);
    }

    #[test]
    fn test_zero_wins_is_zero() {
        assert_eq!(lower_bound(0, 1), 0.0);
        assert_eq!(lower_bound(0, 50_000), 0.0);
    }

    #[test]
    fn test_small_samples_are_heavily_discounted() {
        let lb = lower_bound(1, 2);
        assert!(lb < 0.1, "1/2 should be far below 0.5, got {}", lb);

        let lucky = lower_bound(2, 2);
        let proven = lower_bound(30_000, 50_000);
        assert!(lucky < proven, "2/2 must not outrank 60% over 50k games");
    }

    #[test]
    fn test_all_wins_stays_below_one() {
        let lb = lower_bound(1_000_000, 1_000_000);
        assert!(lb < 1.0);
        assert!(lb > 0.99);
    }

    #[test]
    fn test_known_value() {
        // 60 of 100 at 95%: ~0.502
        let lb = lower_bound(60, 100);
        assert!((lb - 0.502).abs() < 0.001, "got {}", lb);
    }

    proptest! {
        #[test]
        fn prop_bound_is_a_probability_below_raw_rate(total in 1u64..100_000, frac in 0.0f64..=1.0) {
            let wins = ((total as f64) * frac).floor() as u64;
            let lb = lower_bound(wins, total);
            prop_assert!((0.0..=1.0).contains(&lb));
            prop_assert!(lb <= wins as f64 / total as f64 + 1e-12);
        }

        #[test]
        fn prop_bound_is_monotonic_in_wins(total in 1u64..10_000, wins in 0u64..10_000) {
            let wins = wins.min(total - 1);
            prop_assert!(lower_bound(wins, total) <= lower_bound(wins + 1, total));
        }

        #[test]
        fn prop_more_evidence_narrows_the_gap(wins in 1u64..500, scale in 2u64..50) {
            let total = wins * 2;
            let small_gap = 0.5 - lower_bound(wins, total);
            let large_gap = 0.5 - lower_bound(wins * scale, total * scale);
            prop_assert!(large_gap < small_gap);
        }
    }
}
