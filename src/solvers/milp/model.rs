//! Plan Model
//!
//! Binary integer program over an indexed offer set: one selection variable
//! per offer row, one used variable per seller, linking and coverage
//! constraints, and a minor-unit cost objective. Constraints are recorded as
//! (lhs, relation, rhs) triples so the formulation can be inspected and
//! unit-tested before it is handed to a backend.

use good_lp::{Expression, ProblemVariables, Variable, variable};
use smallvec::SmallVec;

use crate::{
    config::PlanConfig,
    index::OfferIndex,
    solvers::{
        SolverError,
        milp::{i64_to_f64_exact, observer::ModelObserver},
    },
};

/// Relation operator for a recorded linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintRelation {
    /// Less than or equal (`lhs <= rhs`)
    Leq,

    /// Greater than or equal (`lhs >= rhs`)
    Geq,
}

/// Recorded linear constraint emitted during model construction.
#[derive(Debug, Clone)]
pub(crate) struct PlanConstraint {
    /// Left-hand side expression
    pub(crate) lhs: Expression,

    /// Relation operator
    pub(crate) relation: ConstraintRelation,

    /// Right-hand side scalar
    pub(crate) rhs: f64,
}

/// Builder state for the offer-selection integer program.
pub struct PlanModel {
    pb: ProblemVariables,
    cost: Expression,
    offer_vars: SmallVec<[Variable; 10]>,
    seller_vars: SmallVec<[Variable; 10]>,
    constraints: Vec<PlanConstraint>,
}

impl std::fmt::Debug for PlanModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanModel")
            .field("offer_vars", &format!("[{} variables]", self.offer_vars.len()))
            .field(
                "seller_vars",
                &format!("[{} variables]", self.seller_vars.len()),
            )
            .field(
                "constraints",
                &format!("[{} constraints]", self.constraints.len()),
            )
            .finish_non_exhaustive()
    }
}

impl PlanModel {
    /// Build the integer program for the given indexed offer set.
    ///
    /// Creates a binary selection variable per offer row and a binary used
    /// variable per seller, then records:
    ///
    /// - a linking constraint `x_offer - y_seller <= 0` per row, so a
    ///   seller's shipping surcharge is active whenever any of its offers is
    ///   selected and never charged for an unused seller;
    /// - a coverage constraint `sum of x over the item's offers >= 1` per
    ///   item, so every item is bought at least once. An item with a single
    ///   surviving offer forces that offer's selection.
    ///
    /// The objective is `sum(price * x) + sum(shipping * y)` in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::MinorUnitsNotRepresentable`] if a price or the
    /// shipping surcharge does not survive an exact `i64` to `f64`
    /// round-trip.
    pub fn from_index<O: ModelObserver + ?Sized>(
        index: &OfferIndex<'_>,
        config: &PlanConfig,
        observer: &mut O,
    ) -> Result<Self, SolverError> {
        let mut pb = ProblemVariables::new();
        let mut cost = Expression::default();

        let shipping_minor = config.shipping_cost.to_minor_units();
        let shipping_coeff = i64_to_f64_exact(shipping_minor).ok_or(
            SolverError::MinorUnitsNotRepresentable {
                minor_units: shipping_minor,
            },
        )?;

        let mut seller_vars: SmallVec<[Variable; 10]> = SmallVec::new();

        for seller_idx in 0..index.seller_count() {
            let var = pb.add(variable().binary());

            cost += var * shipping_coeff;
            seller_vars.push(var);

            observer.on_seller_variable(seller_idx, var, shipping_minor);
            observer.on_objective_term(var, shipping_coeff);
        }

        let mut offer_vars: SmallVec<[Variable; 10]> = SmallVec::new();
        let mut constraints = Vec::with_capacity(index.offer_count() + index.item_count());
        let mut coverage: Vec<Expression> = vec![Expression::default(); index.item_count()];

        for (offer_idx, row) in index.rows().iter().enumerate() {
            let var = pb.add(variable().binary());

            // `good_lp` stores coefficients as `f64`. Only integers with
            // absolute value <= 2^53 can be represented exactly in an
            // IEEE-754 `f64` mantissa; enforce that via a round-trip check so
            // we never silently change the objective.
            let coeff = i64_to_f64_exact(row.price_minor).ok_or(
                SolverError::MinorUnitsNotRepresentable {
                    minor_units: row.price_minor,
                },
            )?;

            cost += var * coeff;
            offer_vars.push(var);

            observer.on_offer_variable(offer_idx, row.seller, var, row.price_minor);
            observer.on_objective_term(var, coeff);

            let seller_var = seller_vars.get(row.seller).copied().ok_or(
                SolverError::InvariantViolation {
                    message: "offer row references a seller index outside the index",
                },
            )?;

            let lhs = Expression::from(var) - seller_var;
            observer.on_linking_constraint(offer_idx, row.seller, &lhs);
            constraints.push(PlanConstraint {
                lhs,
                relation: ConstraintRelation::Leq,
                rhs: 0.0,
            });

            let item_expr = coverage.get_mut(row.item).ok_or(
                SolverError::InvariantViolation {
                    message: "offer row references an item index outside the index",
                },
            )?;
            *item_expr += var;
        }

        for (item_idx, lhs) in coverage.into_iter().enumerate() {
            observer.on_coverage_constraint(item_idx, &lhs);
            constraints.push(PlanConstraint {
                lhs,
                relation: ConstraintRelation::Geq,
                rhs: 1.0,
            });
        }

        Ok(Self {
            pb,
            cost,
            offer_vars,
            seller_vars,
            constraints,
        })
    }

    /// Number of recorded constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Extract the problem variables, objective, offer and seller variables,
    /// and all recorded constraints.
    #[expect(clippy::type_complexity, reason = "one-shot destructuring tuple")]
    pub(crate) fn into_parts(
        self,
    ) -> (
        ProblemVariables,
        Expression,
        SmallVec<[Variable; 10]>,
        SmallVec<[Variable; 10]>,
        Vec<PlanConstraint>,
    ) {
        (
            self.pb,
            self.cost,
            self.offer_vars,
            self.seller_vars,
            self.constraints,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use good_lp::Solution;
    use rusty_money::{Money, iso::EUR};
    use testresult::TestResult;

    use crate::{
        offers::Offer,
        solvers::milp::observer::{ModelStats, NoopObserver},
    };

    use super::*;

    fn offer(seller: &str, item: &str, minor: i64) -> Offer {
        Offer::new(seller, item, Money::from_minor(minor, EUR))
    }

    fn fixture() -> Vec<Offer> {
        vec![
            offer("S1", "Card A", 100),
            offer("S1", "Card B", 100),
            offer("S2", "Card A", 50),
        ]
    }

    #[test]
    fn model_has_one_constraint_per_offer_and_item() -> TestResult {
        let offers = fixture();
        let index = OfferIndex::new(&offers);
        let config = PlanConfig::new(Money::from_minor(100, EUR));

        let mut observer = NoopObserver;
        let model = PlanModel::from_index(&index, &config, &mut observer)?;

        // 3 linking constraints + 2 coverage constraints.
        assert_eq!(model.constraint_count(), 5);
        assert_eq!(model.offer_vars.len(), 3);
        assert_eq!(model.seller_vars.len(), 2);

        Ok(())
    }

    #[test]
    fn objective_counts_prices_and_shipping_per_used_seller() -> TestResult {
        let offers = fixture();
        let index = OfferIndex::new(&offers);
        let config = PlanConfig::new(Money::from_minor(100, EUR));

        let mut observer = NoopObserver;
        let model = PlanModel::from_index(&index, &config, &mut observer)?;
        let (_pb, cost, offer_vars, seller_vars, _constraints) = model.into_parts();

        // Buy everything from S1 only: 100 + 100 items, one 100 surcharge.
        let mut assignment: HashMap<Variable, f64> = HashMap::new();

        for (pos, var) in offer_vars.iter().copied().enumerate() {
            assignment.insert(var, if pos < 2 { 1.0 } else { 0.0 });
        }

        for (pos, var) in seller_vars.iter().copied().enumerate() {
            assignment.insert(var, if pos == 0 { 1.0 } else { 0.0 });
        }

        let objective = assignment.eval(&cost);
        assert!((objective - 300.0).abs() <= f64::EPSILON);

        Ok(())
    }

    #[test]
    fn observer_sees_every_variable_and_constraint() -> TestResult {
        let offers = fixture();
        let index = OfferIndex::new(&offers);
        let config = PlanConfig::new(Money::from_minor(100, EUR));

        let mut stats = ModelStats::default();
        let _model = PlanModel::from_index(&index, &config, &mut stats)?;

        assert_eq!(stats.offer_variables, 3);
        assert_eq!(stats.seller_variables, 2);
        assert_eq!(stats.linking_constraints, 3);
        assert_eq!(stats.coverage_constraints, 2);

        Ok(())
    }

    #[test]
    fn unrepresentable_price_is_rejected() {
        let offers = [offer("S1", "Card A", 9_007_199_254_740_993)];
        let index = OfferIndex::new(&offers);
        let config = PlanConfig::new(Money::from_minor(100, EUR));

        let mut observer = NoopObserver;
        let err = PlanModel::from_index(&index, &config, &mut observer).err();

        assert!(matches!(
            err,
            Some(SolverError::MinorUnitsNotRepresentable { .. })
        ));
    }

    #[test]
    fn debug_reports_model_shape() -> TestResult {
        let offers = fixture();
        let index = OfferIndex::new(&offers);
        let config = PlanConfig::new(Money::from_minor(100, EUR));

        let mut observer = NoopObserver;
        let model = PlanModel::from_index(&index, &config, &mut observer)?;

        let formatted = format!("{model:?}");
        assert!(formatted.contains("PlanModel"), "unexpected: {formatted}");
        assert!(formatted.contains("3 variables"), "unexpected: {formatted}");

        Ok(())
    }
}
