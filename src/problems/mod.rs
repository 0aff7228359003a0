//! Problem variants and the routing strategies that solve them.
//!
//! [`ProblemVariant::select`] inspects the catalog once before solving and
//! picks the [`RoutingStrategy`] every worker runs:
//!
//! - [`UncapacitatedSingleRoute`](ProblemVariant::UncapacitatedSingleRoute) —
//!   one vehicle, no capacity to honour: a TSP handled by [`TspStrategy`].
//! - [`CapacitatedMultiRoute`](ProblemVariant::CapacitatedMultiRoute) —
//!   everything else, handled by [`CvrpStrategy`].

mod cvrp;
mod state;
mod tsp;
mod view;

pub use cvrp::CvrpStrategy;
pub use state::{RawSolution, RouteState};
pub use tsp::TspStrategy;
pub use view::ProblemView;

use crate::error::Result;
use crate::models::{Job, Vehicle};
use crate::solver::SolverConfig;

/// Construction and improvement of routes for one problem variant.
///
/// A strategy is shared by every worker thread; all per-run state lives in
/// the [`RawSolution`] it returns. The result of a worker must depend only
/// on the view and the worker index.
pub trait RoutingStrategy: Send + Sync {
    /// Builds an initial solution serving every job.
    fn construct(&self, view: &ProblemView<'_>, worker: usize) -> Result<RawSolution>;

    /// Improves `raw` without ever increasing its cost.
    fn improve(&self, view: &ProblemView<'_>, raw: RawSolution, worker: usize) -> RawSolution;
}

/// Problem family of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemVariant {
    /// Single vehicle, all amounts zero.
    UncapacitatedSingleRoute,
    /// Capacities matter or several vehicles share the jobs.
    CapacitatedMultiRoute,
}

impl ProblemVariant {
    /// Selects the variant for a catalog.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_vrp::models::{Amount, Job, Location, Vehicle};
    /// use u_vrp::problems::ProblemVariant;
    ///
    /// let vehicles = vec![Vehicle::new(0, Location::new(0)).with_capacity(Amount::new(vec![0]))];
    /// let jobs = vec![Job::new(1, Location::new(1)).with_amount(Amount::new(vec![0]))];
    /// assert_eq!(
    ///     ProblemVariant::select(&vehicles, &jobs),
    ///     ProblemVariant::UncapacitatedSingleRoute
    /// );
    ///
    /// let loaded = vec![Job::new(1, Location::new(1)).with_amount(Amount::new(vec![3]))];
    /// assert_eq!(
    ///     ProblemVariant::select(&vehicles, &loaded),
    ///     ProblemVariant::CapacitatedMultiRoute
    /// );
    /// ```
    pub fn select(vehicles: &[Vehicle], jobs: &[Job]) -> Self {
        let zero_jobs = jobs.iter().all(|j| j.amount().is_zero());
        let zero_capacity = vehicles
            .iter()
            .all(|v| v.capacity().is_none_or(|c| c.is_zero()));
        if vehicles.len() == 1 && zero_jobs && zero_capacity {
            ProblemVariant::UncapacitatedSingleRoute
        } else {
            ProblemVariant::CapacitatedMultiRoute
        }
    }

    /// The strategy solving this variant.
    pub fn strategy(self, config: &SolverConfig) -> Box<dyn RoutingStrategy> {
        match self {
            ProblemVariant::UncapacitatedSingleRoute => Box::new(TspStrategy::new(config.clone())),
            ProblemVariant::CapacitatedMultiRoute => Box::new(CvrpStrategy::new(config.clone())),
        }
    }
}
