//! XP to level conversion
//!
//! All operations are pure and total: negative XP clamps to level 0 and a
//! non-positive level needs 0 XP. Nothing here can fail.

/// Scaling constant of the Code::Stats level formula
pub const LEVEL_FACTOR: f64 = 0.025;

/// Conversions between experience points and levels
pub trait XpCalculator {
    /// Level reached with `xp` experience points
    fn get_level(&self, xp: i64) -> i32;

    /// Progress from the current level towards the next one, in `[0.0, 1.0]`
    fn get_level_percentage(&self, xp: i64) -> f64;

    /// Minimum XP needed to reach `level`
    fn get_xp_for_level(&self, level: i32) -> i64;

    /// Minimum XP needed to reach the level after the one `xp` is at
    fn get_xp_for_next_level(&self, xp: i64) -> i64;
}

/// Calculator using the official Code::Stats formula
///
/// # Examples
/// ```
/// use xp_calculator::{Calculator, XpCalculator};
///
/// let calc = Calculator::new();
/// assert_eq!(calc.get_xp_for_level(2), 6400);
/// assert_eq!(calc.get_level(6400), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calculator;

impl Calculator {
    /// Create a new calculator
    pub fn new() -> Self {
        Self
    }
}

impl XpCalculator for Calculator {
    fn get_level(&self, xp: i64) -> i32 {
        if xp < 0 {
            return 0;
        }
        (LEVEL_FACTOR * (xp as f64).sqrt()).floor() as i32
    }

    fn get_level_percentage(&self, xp: i64) -> f64 {
        if xp < 0 {
            return 0.0;
        }

        let level = self.get_level(xp);
        let current_level_xp = self.get_xp_for_level(level);
        let next_level_xp = self.get_xp_for_level(level.saturating_add(1));

        // Saturated thresholds collapse the interval
        if next_level_xp <= current_level_xp {
            return 1.0;
        }

        let gained = xp.saturating_sub(current_level_xp) as f64;
        let needed = (next_level_xp - current_level_xp) as f64;

        (gained / needed).clamp(0.0, 1.0)
    }

    fn get_xp_for_level(&self, level: i32) -> i64 {
        if level <= 0 {
            return 0;
        }
        // `as` saturates at i64::MAX for levels whose threshold does not fit
        (f64::from(level) / LEVEL_FACTOR).powi(2).ceil() as i64
    }

    fn get_xp_for_next_level(&self, xp: i64) -> i64 {
        self.get_xp_for_level(self.get_level(xp).saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 0.01,
            "expected {} ± 0.01, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_get_level() {
        let calc = Calculator::new();
        assert_eq!(calc.get_level(0), 0);
        assert_eq!(calc.get_level(-100), 0);
        assert_eq!(calc.get_level(1599), 0);
        assert_eq!(calc.get_level(1600), 1);
        assert_eq!(calc.get_level(4000), 1);
        assert_eq!(calc.get_level(6399), 1);
        assert_eq!(calc.get_level(6400), 2);
        assert_eq!(calc.get_level(14400), 3);
    }

    #[test]
    fn test_get_xp_for_level() {
        let calc = Calculator::new();
        assert_eq!(calc.get_xp_for_level(0), 0);
        assert_eq!(calc.get_xp_for_level(-5), 0);
        assert_eq!(calc.get_xp_for_level(1), 1600);
        assert_eq!(calc.get_xp_for_level(2), 6400);
        assert_eq!(calc.get_xp_for_level(3), 14400);
        assert_eq!(calc.get_xp_for_level(10), 160_000);
    }

    #[test]
    fn test_get_level_percentage() {
        let calc = Calculator::new();
        assert_close(calc.get_level_percentage(0), 0.0);
        assert_close(calc.get_level_percentage(-100), 0.0);
        assert_close(calc.get_level_percentage(1600), 0.0);
        assert_close(calc.get_level_percentage(4000), 0.5);
        assert_close(calc.get_level_percentage(6300), 0.979);
        assert_close(calc.get_level_percentage(6400), 0.0);
    }

    #[test]
    fn test_get_xp_for_next_level() {
        let calc = Calculator::new();
        assert_eq!(calc.get_xp_for_next_level(0), 1600);
        assert_eq!(calc.get_xp_for_next_level(-1), 1600);
        assert_eq!(calc.get_xp_for_next_level(1600), 6400);
        assert_eq!(calc.get_xp_for_next_level(4000), 6400);
        assert_eq!(calc.get_xp_for_next_level(6400), 14400);
    }

    #[test]
    fn test_level_round_trip() {
        let calc = Calculator::new();
        for level in 1..=1000 {
            let xp = calc.get_xp_for_level(level);
            assert_eq!(calc.get_level(xp), level, "level {} needs {} xp", level, xp);
            assert_eq!(calc.get_level(xp - 1), level - 1, "one below level {}", level);
        }
    }

    #[test]
    fn test_saturated_threshold() {
        let calc = Calculator::new();
        assert_eq!(calc.get_xp_for_level(i32::MAX), i64::MAX);
        assert_eq!(calc.get_level_percentage(i64::MAX), 1.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn percentage_stays_in_unit_interval(xp in any::<i64>()) {
            let pct = Calculator.get_level_percentage(xp);
            prop_assert!((0.0..=1.0).contains(&pct));
        }

        #[test]
        fn negative_xp_clamps_to_zero(xp in i64::MIN..0) {
            prop_assert_eq!(Calculator.get_level(xp), 0);
            prop_assert_eq!(Calculator.get_level_percentage(xp), 0.0);
        }

        #[test]
        fn level_is_monotonic(xp in 0i64..10_000_000_000, delta in 0i64..100_000) {
            prop_assert!(Calculator.get_level(xp) <= Calculator.get_level(xp + delta));
        }

        #[test]
        fn next_level_threshold_is_above_xp(xp in 0i64..10_000_000_000) {
            prop_assert!(Calculator.get_xp_for_next_level(xp) > xp);
        }
    }
}
