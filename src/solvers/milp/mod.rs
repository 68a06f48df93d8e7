//! MILP Solver
//!
//! Drives a branch-and-bound backend over the [`PlanModel`] formulation and
//! decodes the assignment back into a [`PurchasePlan`]. The backend is
//! selected at compile time: the bundled microlp solver by default, `HiGHS`
//! when the `solver-highs` feature is enabled.

use good_lp::{ResolutionError, Solution, SolverModel, Variable};
use num_traits::ToPrimitive;
use rustc_hash::FxHashSet;
use rusty_money::Money;

#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as default_solver;
#[cfg(all(not(feature = "solver-highs"), feature = "solver-microlp"))]
use good_lp::solvers::microlp::microlp as default_solver;

use crate::{
    config::PlanConfig,
    index::OfferIndex,
    plan::{Purchase, PurchasePlan},
    solvers::{Outcome, Solver, SolverError},
};

pub mod model;
pub mod observer;

pub use model::PlanModel;
pub use observer::{ModelObserver, ModelStats, NoopObserver};

use model::{ConstraintRelation, PlanConstraint};

/// Solver using Mixed Integer Linear Programming (MILP)
#[derive(Debug)]
pub struct MilpSolver;

impl MilpSolver {
    /// Solve with an observer that receives the formulation as it is built.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if model construction or the backend fails
    /// in a way that is not a terminal [`Outcome`].
    pub fn solve_with_observer(
        index: &OfferIndex<'_>,
        config: &PlanConfig,
        observer: &mut dyn ModelObserver,
    ) -> Result<Outcome, SolverError> {
        // An empty index means an empty want list: nothing to buy, nothing
        // to ship.
        if index.is_empty() {
            return Ok(Outcome::Optimal(PurchasePlan::empty(config.currency())));
        }

        let plan_model = PlanModel::from_index(index, config, observer)?;
        let (pb, cost, offer_vars, seller_vars, constraints) = plan_model.into_parts();

        let mut model = pb.minimise(cost).using(default_solver);
        model = apply_recorded_constraints(model, constraints);

        let (model, exact) = apply_solver_controls(model, config)?;

        match model.solve() {
            Ok(solution) => {
                let plan = decode(index, config, &solution, &offer_vars, &seller_vars)?;

                if exact {
                    Ok(Outcome::Optimal(plan))
                } else {
                    Ok(Outcome::Feasible { plan, bound: None })
                }
            }
            Err(ResolutionError::Infeasible) => Ok(Outcome::Infeasible),
            Err(err) => classify_failure(err),
        }
    }
}

impl Solver for MilpSolver {
    fn solve(index: &OfferIndex<'_>, config: &PlanConfig) -> Result<Outcome, SolverError> {
        let mut observer = NoopObserver;

        Self::solve_with_observer(index, config, &mut observer)
    }
}

fn apply_recorded_constraints<S: SolverModel>(mut model: S, constraints: Vec<PlanConstraint>) -> S {
    for constraint in constraints {
        model = match constraint.relation {
            ConstraintRelation::Leq => model.with(constraint.lhs.leq(constraint.rhs)),
            ConstraintRelation::Geq => model.with(constraint.lhs.geq(constraint.rhs)),
        };
    }

    model
}

/// Apply the time budget and optimality gap where the backend supports them.
///
/// Returns the model plus whether the solve is exact: `true` means the
/// backend will prove optimality, so a returned solution is `Optimal` rather
/// than `Feasible`.
#[cfg(all(not(feature = "solver-highs"), feature = "solver-microlp"))]
fn apply_solver_controls<S: SolverModel>(
    model: S,
    _config: &PlanConfig,
) -> Result<(S, bool), SolverError> {
    // microlp has no time-limit or gap controls; it runs to proven
    // optimality, which also keeps zero-budget solves terminal.
    Ok((model, true))
}

/// Apply the time budget and optimality gap where the backend supports them.
///
/// Returns the model plus whether the solve is exact: `true` means the
/// backend will prove optimality, so a returned solution is `Optimal` rather
/// than `Feasible`.
#[cfg(feature = "solver-highs")]
fn apply_solver_controls(
    model: good_lp::solvers::highs::HighsProblem,
    config: &PlanConfig,
) -> Result<(good_lp::solvers::highs::HighsProblem, bool), SolverError> {
    use good_lp::WithMipGap;

    let mut model = model.set_time_limit(config.time_budget.as_secs_f64());

    #[expect(
        clippy::cast_possible_truncation,
        reason = "gap tolerance has no meaningful precision beyond f32"
    )]
    let gap = config.optimality_gap.max(0.0) as f32;

    if gap > 0.0 {
        model = model
            .with_mip_gap(gap)
            .map_err(|_err| SolverError::InvariantViolation {
                message: "backend rejected a non-negative optimality gap",
            })?;
    }

    // The time budget or gap can stop the search early, so a returned
    // solution is not proven optimal.
    Ok((model, false))
}

/// Classify a backend failure that is not plain infeasibility.
///
/// Budget exhaustion without an incumbent is the terminal
/// [`Outcome::NoSolutionFound`]; anything else is a hard error. Backends
/// report budget exhaustion through their free-text error variants, so the
/// message probe applies to those alone and never reclassifies a structured
/// error such as [`ResolutionError::Unbounded`].
fn classify_failure(err: ResolutionError) -> Result<Outcome, SolverError> {
    match err {
        ResolutionError::Other(message) if is_time_exhaustion(message) => {
            Ok(Outcome::NoSolutionFound { bound: None })
        }
        ResolutionError::Str(ref message) if is_time_exhaustion(message) => {
            Ok(Outcome::NoSolutionFound { bound: None })
        }
        other => Err(SolverError::from(other)),
    }
}

fn is_time_exhaustion(message: &str) -> bool {
    message.to_ascii_lowercase().contains("time")
}

/// Decode a backend assignment into a purchase plan.
///
/// Offer variables valued at or above `1 - zero_tolerance` are purchased;
/// indices are resolved back to identities through the offer index, and the
/// total is recomputed exactly in minor units rather than read from the float
/// objective.
///
/// # Errors
///
/// Returns a [`SolverError`] if an index cannot be resolved or if a selected
/// offer's seller carries no shipping charge in the assignment (a violated
/// linking constraint, which is a bug).
fn decode(
    index: &OfferIndex<'_>,
    config: &PlanConfig,
    solution: &impl Solution,
    offer_vars: &[Variable],
    seller_vars: &[Variable],
) -> Result<PurchasePlan, SolverError> {
    let threshold = 1.0 - config.zero_tolerance;

    let mut purchases = Vec::new();
    let mut sellers_used: FxHashSet<usize> = FxHashSet::default();
    let mut items_minor: i64 = 0;

    for (var, row) in offer_vars.iter().copied().zip(index.rows()) {
        if solution.value(var) < threshold {
            continue;
        }

        let seller_var = seller_vars.get(row.seller).copied().ok_or(
            SolverError::InvariantViolation {
                message: "selected offer references a seller with no variable",
            },
        )?;

        // Linking constraints force the surcharge on; a selected offer with
        // an inactive seller means the model is wrong, not the data.
        if solution.value(seller_var) < 0.5 {
            return Err(SolverError::InvariantViolation {
                message: "selected offer from a seller with no active shipping charge",
            });
        }

        let source = index.offer(row.source)?;

        purchases.push(Purchase::new(
            index.seller_name(row.seller)?,
            index.item_name(row.item)?,
            *source.price(),
            source.reference().map(str::to_string),
        ));

        sellers_used.insert(row.seller);
        items_minor += row.price_minor;
    }

    let shipping_minor = config.shipping_cost.to_minor_units();
    let used = i64::try_from(sellers_used.len()).map_err(|_err| {
        SolverError::InvariantViolation {
            message: "seller count does not fit in a minor-unit total",
        }
    })?;

    let total_minor = items_minor + shipping_minor * used;

    Ok(PurchasePlan::new(
        purchases,
        sellers_used.len(),
        Money::from_minor(total_minor, config.currency()),
    ))
}

/// Convert an `i64` to an `f64` if it can be represented exactly.
pub fn i64_to_f64_exact(v: i64) -> Option<f64> {
    let f = v.to_f64()?;

    (f.to_i64() == Some(v)).then_some(f)
}
