//! Solvers
//!
//! The branch-and-bound solver is an opaque capability behind the [`Solver`]
//! trait: it takes an indexed offer set and a configuration and returns a
//! terminal [`Outcome`]. Any conforming integer-program backend can be
//! substituted without touching model construction.

use good_lp::ResolutionError;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{config::PlanConfig, index::OfferIndex, plan::PurchasePlan};

pub mod milp;

/// Solver Errors
#[derive(Debug, Error)]
pub enum SolverError {
    /// Money amount in minor units cannot be represented exactly as a solver coefficient.
    #[error(
        "money amount in minor units cannot be represented exactly as a solver coefficient: {minor_units}"
    )]
    MinorUnitsNotRepresentable {
        /// Money amount in minor units
        minor_units: i64,
    },

    /// Wrapped index resolution error.
    #[error(transparent)]
    Index(#[from] crate::index::IndexError),

    /// Wrapped solver resolution error
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Terminal classification of one solve.
///
/// All four outcomes are terminal; the driver never retries internally. A
/// caller wanting a stronger guarantee re-invokes with a larger budget.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The plan is proven optimal.
    Optimal(PurchasePlan),

    /// A valid plan within the accepted gap or time budget; the proven lower
    /// bound is reported when the backend exposes one.
    Feasible {
        /// Best plan found.
        plan: PurchasePlan,

        /// Proven lower bound on the optimal total, if reported.
        bound: Option<Money<'static, Currency>>,
    },

    /// No assignment satisfies all constraints. With coverage pre-checked
    /// upstream this indicates a model-builder defect.
    Infeasible,

    /// The budget expired before any feasible assignment was found.
    NoSolutionFound {
        /// Proven lower bound on the optimal total, if reported.
        bound: Option<Money<'static, Currency>>,
    },
}

impl Outcome {
    /// The plan carried by this outcome, if it produced one.
    pub fn plan(&self) -> Option<&PurchasePlan> {
        match self {
            Self::Optimal(plan) | Self::Feasible { plan, .. } => Some(plan),
            Self::Infeasible | Self::NoSolutionFound { .. } => None,
        }
    }

    /// Whether the outcome is proven optimal.
    pub fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal(_))
    }
}

/// Trait for solving an indexed offer set into a purchase plan.
pub trait Solver {
    /// Solve the offer-selection problem for the given index.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the solver encounters an error.
    fn solve(index: &OfferIndex<'_>, config: &PlanConfig) -> Result<Outcome, SolverError>;
}
