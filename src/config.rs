//! Configuration
//!
//! Explicit solver and decoding parameters. Shipping is jurisdiction- and
//! marketplace-dependent, so it is always supplied by the caller; the
//! remaining knobs carry sensible defaults.

use std::time::Duration;

use rusty_money::{Money, iso::Currency};

/// Default wall-clock budget for a single solve.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(300);

/// Default relative optimality-gap tolerance (2%).
pub const DEFAULT_OPTIMALITY_GAP: f64 = 0.02;

/// Default threshold below 1.0 at which a binary offer variable counts as
/// selected.
pub const DEFAULT_ZERO_TOLERANCE: f64 = 1e-5;

/// Parameters for one optimization run.
///
/// The currency of `shipping_cost` is the plan currency; all offer prices
/// must be denominated in it.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Flat shipping surcharge charged once per used seller.
    pub shipping_cost: Money<'static, Currency>,

    /// Wall-clock budget for the solve. Backends that cannot bound their
    /// runtime ignore this and run to proven optimality.
    pub time_budget: Duration,

    /// Relative optimality gap the solver may accept. Backends that cannot
    /// relax ignore this and prove the optimum.
    pub optimality_gap: f64,

    /// Selection threshold: offer variables valued at or above
    /// `1 - zero_tolerance` are treated as purchased.
    pub zero_tolerance: f64,
}

impl PlanConfig {
    /// Create a configuration with the given shipping surcharge and default
    /// time budget, optimality gap, and zero tolerance.
    pub fn new(shipping_cost: Money<'static, Currency>) -> Self {
        Self {
            shipping_cost,
            time_budget: DEFAULT_TIME_BUDGET,
            optimality_gap: DEFAULT_OPTIMALITY_GAP,
            zero_tolerance: DEFAULT_ZERO_TOLERANCE,
        }
    }

    /// Replace the wall-clock time budget.
    #[must_use]
    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    /// Replace the relative optimality-gap tolerance.
    #[must_use]
    pub fn with_optimality_gap(mut self, optimality_gap: f64) -> Self {
        self.optimality_gap = optimality_gap;
        self
    }

    /// Replace the selection threshold tolerance.
    #[must_use]
    pub fn with_zero_tolerance(mut self, zero_tolerance: f64) -> Self {
        self.zero_tolerance = zero_tolerance;
        self
    }

    /// The plan currency, taken from the shipping surcharge.
    pub fn currency(&self) -> &'static Currency {
        self.shipping_cost.currency()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;

    use super::*;

    #[test]
    fn new_config_uses_documented_defaults() {
        let config = PlanConfig::new(Money::from_minor(110, EUR));

        assert_eq!(config.time_budget, Duration::from_secs(300));
        assert!((config.optimality_gap - 0.02).abs() < f64::EPSILON);
        assert!((config.zero_tolerance - 1e-5).abs() < f64::EPSILON);
        assert_eq!(config.currency(), EUR);
    }

    #[test]
    fn builders_replace_single_fields() {
        let config = PlanConfig::new(Money::from_minor(110, EUR))
            .with_time_budget(Duration::ZERO)
            .with_optimality_gap(0.0)
            .with_zero_tolerance(1e-9);

        assert_eq!(config.time_budget, Duration::ZERO);
        assert!(config.optimality_gap.abs() < f64::EPSILON);
        assert!((config.zero_tolerance - 1e-9).abs() < f64::EPSILON);
    }
}
