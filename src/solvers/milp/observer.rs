//! Model Observer
//!
//! Progress and formulation reporting stays out of the solver core: callers
//! inject an observer that receives callbacks as the model is built, so the
//! pipeline itself is side-effect free and independently testable.

use good_lp::{Expression, Variable};

/// Observer trait for capturing the MILP formulation as it is built.
///
/// The solver remains the single source of truth for model construction;
/// observers passively record variables, objective terms, and constraints
/// for reporting or analysis. Unobserved solves use [`NoopObserver`].
pub trait ModelObserver {
    /// Called when a binary offer-selection variable is created.
    fn on_offer_variable(
        &mut self,
        offer_idx: usize,
        seller_idx: usize,
        var: Variable,
        price_minor: i64,
    );

    /// Called when a binary seller-used variable is created.
    fn on_seller_variable(&mut self, seller_idx: usize, var: Variable, shipping_minor: i64);

    /// Called when a term is added to the objective.
    fn on_objective_term(&mut self, _var: Variable, _coefficient: f64) {}

    /// Called when a linking constraint (`offer <= seller`) is recorded.
    fn on_linking_constraint(&mut self, offer_idx: usize, seller_idx: usize, lhs: &Expression);

    /// Called when an item's coverage constraint (`sum of offers >= 1`) is
    /// recorded.
    fn on_coverage_constraint(&mut self, item_idx: usize, lhs: &Expression);
}

/// No-op observer for unobserved solves.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ModelObserver for NoopObserver {
    fn on_offer_variable(&mut self, _: usize, _: usize, _: Variable, _: i64) {}

    fn on_seller_variable(&mut self, _: usize, _: Variable, _: i64) {}

    fn on_linking_constraint(&mut self, _: usize, _: usize, _: &Expression) {}

    fn on_coverage_constraint(&mut self, _: usize, _: &Expression) {}
}

/// Observer that tallies formulation size.
///
/// The counts stand in for the original's ad-hoc progress printing: callers
/// can report "n sellers, m offers, k constraints" without the core printing
/// anything.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModelStats {
    /// Number of offer-selection variables created.
    pub offer_variables: usize,

    /// Number of seller-used variables created.
    pub seller_variables: usize,

    /// Number of linking constraints recorded.
    pub linking_constraints: usize,

    /// Number of coverage constraints recorded.
    pub coverage_constraints: usize,
}

impl ModelObserver for ModelStats {
    fn on_offer_variable(&mut self, _: usize, _: usize, _: Variable, _: i64) {
        self.offer_variables += 1;
    }

    fn on_seller_variable(&mut self, _: usize, _: Variable, _: i64) {
        self.seller_variables += 1;
    }

    fn on_linking_constraint(&mut self, _: usize, _: usize, _: &Expression) {
        self.linking_constraints += 1;
    }

    fn on_coverage_constraint(&mut self, _: usize, _: &Expression) {
        self.coverage_constraints += 1;
    }
}
