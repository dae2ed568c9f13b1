/// Rates closer to zero than this use the linear form of the model.
pub const RATE_EPSILON: f64 = 1e-12;

/// One phase of the trajectory: the solution of `dW/dt = r·W + C`
/// anchored at `start_worth` when the owner is `start_age`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthSegment {
    pub start_age: f64,
    pub start_worth: f64,
    /// Income minus spending, per year.
    pub net_cash_flow: f64,
    /// Continuous annual return as a fraction.
    pub rate: f64,
}

impl GrowthSegment {
    pub fn new(start_age: f64, start_worth: f64, net_cash_flow: f64, rate: f64) -> Self {
        Self {
            start_age,
            start_worth,
            net_cash_flow,
            rate,
        }
    }

    fn is_linear(&self) -> bool {
        self.rate.abs() < RATE_EPSILON
    }

    /// `C / r`, the shift that turns the model into pure exponential growth.
    fn offset(&self) -> f64 {
        self.net_cash_flow / self.rate
    }

    /// Worth after `elapsed` years on this segment.
    pub fn worth_after(&self, elapsed: f64) -> f64 {
        if self.is_linear() {
            return self.start_worth + self.net_cash_flow * elapsed;
        }
        let offset = self.offset();
        (self.start_worth + offset) * (self.rate * elapsed).exp() - offset
    }

    pub fn worth_at_age(&self, age: f64) -> f64 {
        self.worth_after(age - self.start_age)
    }

    /// Years until the segment first reaches `target`, or `None` when it
    /// moves away from it or levels off before getting there.
    pub fn time_to_reach(&self, target: f64) -> Option<f64> {
        if target == self.start_worth {
            return Some(0.0);
        }

        let elapsed = if self.is_linear() {
            if self.net_cash_flow == 0.0 {
                return None;
            }
            (target - self.start_worth) / self.net_cash_flow
        } else {
            let offset = self.offset();
            let ratio = (target + offset) / (self.start_worth + offset);
            if ratio.is_nan() || ratio.is_infinite() || ratio <= 0.0 {
                return None;
            }
            ratio.ln() / self.rate
        };

        (elapsed.is_finite() && elapsed >= 0.0).then_some(elapsed)
    }

    /// The level the segment converges to, if it converges at all.
    pub fn asymptote(&self) -> Option<f64> {
        if self.is_linear() {
            return (self.net_cash_flow == 0.0).then_some(self.start_worth);
        }
        if self.rate < 0.0 || self.start_worth + self.offset() == 0.0 {
            return Some(-self.offset());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assume, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn no_cash_flow_is_pure_compounding() {
        let segment = GrowthSegment::new(30.0, 10_000.0, 0.0, 0.05);
        for t in [0.0, 1.0, 7.5, 40.0] {
            assert_approx(segment.worth_after(t), 10_000.0 * (0.05_f64 * t).exp());
        }
    }

    #[test]
    fn zero_rate_grows_linearly() {
        let segment = GrowthSegment::new(30.0, 5_000.0, 12_000.0, 0.0);
        assert_approx(segment.worth_after(2.5), 35_000.0);
        assert_approx(segment.time_to_reach(65_000.0).expect("reached"), 5.0);
        assert_eq!(segment.time_to_reach(1_000.0), None);
    }

    #[test]
    fn zero_rate_without_cash_flow_never_moves() {
        let segment = GrowthSegment::new(30.0, 5_000.0, 0.0, 0.0);
        assert_eq!(segment.time_to_reach(6_000.0), None);
        assert_eq!(segment.time_to_reach(5_000.0), Some(0.0));
        assert_eq!(segment.asymptote(), Some(5_000.0));
    }

    #[test]
    fn worth_at_age_is_relative_to_segment_start() {
        let segment = GrowthSegment::new(40.0, 100.0, 0.0, 0.1);
        assert_approx(segment.worth_at_age(40.0), 100.0);
        assert_approx(segment.worth_at_age(50.0), 100.0 * 1.0_f64.exp());
    }

    #[test]
    fn stationary_segment_holds_its_level() {
        // Returns exactly cover spending.
        let segment = GrowthSegment::new(60.0, 500_000.0, -20_000.0, 0.04);
        assert_approx(segment.worth_after(30.0), 500_000.0);
        assert_eq!(segment.time_to_reach(600_000.0), None);
        assert_eq!(segment.asymptote(), Some(500_000.0));
    }

    #[test]
    fn shrinking_segment_cannot_climb_to_higher_target() {
        let segment = GrowthSegment::new(60.0, 300_000.0, -20_000.0, 0.04);
        assert_eq!(segment.time_to_reach(400_000.0), None);
        let to_zero = segment.time_to_reach(0.0).expect("runs out");
        assert!(segment.worth_after(to_zero).abs() < 1e-6);
    }

    #[test]
    fn negative_rate_never_passes_its_floor() {
        let segment = GrowthSegment::new(60.0, 100_000.0, -22_000.0, -0.02);
        let floor = segment.asymptote().expect("converges");
        assert_approx(floor, -1_100_000.0);
        assert_eq!(segment.time_to_reach(floor - 1.0), None);
        assert!(segment.time_to_reach(floor + 1_000.0).is_some());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn inverse_recovers_elapsed_time(
            start_worth in -200_000.0f64..2_000_000.0,
            net_cash_flow in -80_000.0f64..120_000.0,
            rate in -0.05f64..0.12,
            elapsed in 0.0f64..60.0,
        ) {
            prop_assume!(rate.abs() > 0.005);
            let segment = GrowthSegment::new(30.0, start_worth, net_cash_flow, rate);
            let worth = segment.worth_after(elapsed);
            prop_assume!(worth.is_finite());
            // A flat trajectory cannot identify the time.
            prop_assume!((worth - start_worth).abs() > 1.0);

            let recovered = segment.time_to_reach(worth);
            prop_assert!(recovered.is_some(), "no crossing for worth {}", worth);
            let recovered = recovered.unwrap_or_default();
            prop_assert!(
                (recovered - elapsed).abs() <= 1e-5 * elapsed.max(1.0),
                "expected {}, got {}", elapsed, recovered
            );
        }

        #[test]
        fn reported_crossings_are_never_negative_or_nan(
            start_worth in -500_000.0f64..2_000_000.0,
            net_cash_flow in -80_000.0f64..120_000.0,
            rate in -0.1f64..0.15,
            target in -3_000_000.0f64..5_000_000.0,
        ) {
            let segment = GrowthSegment::new(30.0, start_worth, net_cash_flow, rate);
            if let Some(t) = segment.time_to_reach(target) {
                prop_assert!(t.is_finite());
                prop_assert!(t >= 0.0);
            }
        }
    }
}
