//! Conversion between quoting cadences and the canonical monthly unit.
//!
//! The factors are average-length approximations (a month is 30.4167 days,
//! 4.33 weeks), not calendar arithmetic.

use crate::store::Frequency;

const DAYS_PER_MONTH: f64 = 30.4167;
const WEEKS_PER_MONTH: f64 = 4.33;
const MONTHS_PER_YEAR: f64 = 12.0;

impl Frequency {
    /// How many monthly units one unit of this cadence is worth.
    #[inline]
    pub fn monthly_factor(&self) -> f64 {
        match self {
            Frequency::Daily => DAYS_PER_MONTH,
            Frequency::Weekly => WEEKS_PER_MONTH,
            Frequency::Monthly => 1.0,
            Frequency::Yearly => 1.0 / MONTHS_PER_YEAR,
        }
    }

    /// The reciprocal of `monthly_factor`, with yearly kept exact at 12.
    #[inline]
    pub fn view_factor(&self) -> f64 {
        match self {
            Frequency::Daily => 1.0 / DAYS_PER_MONTH,
            Frequency::Weekly => 1.0 / WEEKS_PER_MONTH,
            Frequency::Monthly => 1.0,
            Frequency::Yearly => MONTHS_PER_YEAR,
        }
    }

    #[inline]
    pub fn to_monthly(&self, value: f64) -> f64 {
        value * self.monthly_factor()
    }

    #[inline]
    pub fn from_monthly(&self, monthly: f64) -> f64 {
        monthly * self.view_factor()
    }
}

/// Normalizes `value`, quoted at `frequency`, to a per-month figure.
pub fn to_monthly(value: f64, frequency: Frequency) -> f64 {
    frequency.to_monthly(value)
}

/// Expresses a monthly figure in the `view` cadence.
pub fn from_monthly(value: f64, view: Frequency) -> f64 {
    view.from_monthly(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Frequency::Daily, 100.0, 3041.67)]
    #[case(Frequency::Weekly, 10.0, 43.3)]
    #[case(Frequency::Monthly, 250.0, 250.0)]
    #[case(Frequency::Yearly, 1000.0, 1000.0 / 12.0)]
    fn test_to_monthly(#[case] freq: Frequency, #[case] value: f64, #[case] expected: f64) {
        assert!((to_monthly(value, freq) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip_every_frequency() {
        for freq in Frequency::ALL {
            for v in [0.0, 1.0, 83.25, 75_000.0, -42.5] {
                let back = from_monthly(to_monthly(v, freq), freq);
                assert!((back - v).abs() < 1e-9, "{:?}: {} -> {}", freq, v, back);
            }
        }
    }

    #[test]
    fn test_yearly_view_of_monthly_value() {
        assert_eq!(from_monthly(6250.0, Frequency::Yearly), 75_000.0);
    }
}
