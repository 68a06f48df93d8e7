//! Planner
//!
//! End-to-end pipeline: filter the offer table to the want list, normalize
//! and prune it, pre-check coverage, index it, solve, and hand back the
//! terminal outcome. Each run owns its own index and model, so independent
//! planners can run in parallel without coordination.

use thiserror::Error;

use crate::{
    config::PlanConfig,
    index::OfferIndex,
    normalize::prepare,
    offers::{Offer, OfferError},
    solvers::{
        Outcome, SolverError,
        milp::{MilpSolver, observer::{ModelObserver, NoopObserver}},
    },
    wants::WantList,
};

/// Errors that abort a planning run.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Wrapped ingestion error.
    #[error(transparent)]
    Offer(#[from] OfferError),

    /// A wanted item has no surviving offer after normalization. Raised
    /// before any solve is attempted.
    #[error("item {item:?} has no offers after normalization")]
    UncoveredItem {
        /// The wanted item with no offers.
        item: String,
    },

    /// The solver proved the model infeasible. Coverage is pre-checked, so
    /// this indicates a model-builder defect rather than missing offers.
    #[error("model proved infeasible despite coverage pre-check")]
    InfeasibleModel,

    /// Wrapped solver error.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Purchase planner over an offer table.
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlanConfig,
}

impl Planner {
    /// Create a planner with the given configuration.
    pub fn new(config: PlanConfig) -> Self {
        Self { config }
    }

    /// The planner's configuration.
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Plan the cheapest way to buy every wanted item at least once.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UncoveredItem`] when a wanted item has no
    /// surviving offer (before any solve), [`PlanError::InfeasibleModel`]
    /// when the solver disproves a model that passed the pre-check, or a
    /// wrapped [`SolverError`].
    pub fn plan(&self, offers: &[Offer], wants: &WantList) -> Result<Outcome, PlanError> {
        let mut observer = NoopObserver;

        self.plan_with_observer(offers, wants, &mut observer)
    }

    /// Plan with an observer receiving the model formulation as it is built.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Planner::plan`].
    pub fn plan_with_observer(
        &self,
        offers: &[Offer],
        wants: &WantList,
        observer: &mut dyn ModelObserver,
    ) -> Result<Outcome, PlanError> {
        // Offers for items nobody asked for only inflate the model.
        let wanted_offers: Vec<Offer> = offers
            .iter()
            .filter(|offer| wants.contains(offer.item()))
            .cloned()
            .collect();

        let reduced = prepare(&wanted_offers);

        // Surface missing coverage as its own error, never as a solver
        // infeasibility.
        for item in wants.iter() {
            if !reduced.iter().any(|offer| offer.item() == item) {
                return Err(PlanError::UncoveredItem {
                    item: item.to_string(),
                });
            }
        }

        let index = OfferIndex::new(&reduced);

        match MilpSolver::solve_with_observer(&index, &self.config, observer)? {
            Outcome::Infeasible => Err(PlanError::InfeasibleModel),
            outcome => Ok(outcome),
        }
    }
}
