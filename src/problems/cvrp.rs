//! Multi-route strategy for capacitated fleets.

use std::cmp::Reverse;

use rand::Rng;

use super::{ProblemView, RawSolution, RoutingStrategy};
use crate::constructive::cheapest_insertion;
use crate::error::Result;
use crate::local_search::Neighborhood;
use crate::solver::{self, SolverConfig};

/// Cheapest insertion followed by intra- and inter-route local search.
///
/// Worker 0 inserts jobs by decreasing demand, breaking ties by proximity
/// to the nearest compatible vehicle start. The other workers insert in a
/// random order drawn from their own seed and fall back to the worker 0
/// order when that random order gets stuck.
#[derive(Debug, Clone)]
pub struct CvrpStrategy {
    config: SolverConfig,
}

impl CvrpStrategy {
    /// Creates the strategy.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Jobs sorted by decreasing total demand, then by increasing distance
    /// from the nearest compatible vehicle start, then by index.
    pub fn demand_order(view: &ProblemView<'_>) -> Vec<usize> {
        let mut order: Vec<usize> = (0..view.num_jobs()).collect();
        order.sort_by_cached_key(|&j| {
            let demand = view
                .demand(j)
                .as_slice()
                .iter()
                .fold(0i64, |acc, &d| acc.saturating_add(d));
            let nearest = (0..view.num_vehicles())
                .filter(|&v| view.compatible(v, j))
                .map(|v| view.cost(view.start(v), view.job_location(j)))
                .min()
                .unwrap_or(u64::MAX);
            (Reverse(demand), nearest, j)
        });
        order
    }
}

impl RoutingStrategy for CvrpStrategy {
    fn construct(&self, view: &ProblemView<'_>, worker: usize) -> Result<RawSolution> {
        let order = Self::demand_order(view);
        if worker == 0 {
            return cheapest_insertion(view, &order);
        }

        let mut rng = u_numflow::random::create_rng(self.config.worker_seed(worker));
        let mut shuffled = order.clone();
        // Fisher-Yates shuffle
        for i in (1..shuffled.len()).rev() {
            let j = rng.random_range(0..=i as u64) as usize;
            shuffled.swap(i, j);
        }

        cheapest_insertion(view, &shuffled).or_else(|err| {
            log::warn!("worker {worker}: random insertion order failed ({err}), using demand order");
            cheapest_insertion(view, &order)
        })
    }

    fn improve(&self, view: &ProblemView<'_>, raw: RawSolution, worker: usize) -> RawSolution {
        solver::improve(view, raw, Neighborhood::ALL, &self.config, worker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::local_search::testkit::{compat, fleet, line};
    use crate::models::{Amount, Job, Location};

    #[test]
    fn test_demand_order() {
        let (mut jobs, m) = line(3);
        jobs[2] = Job::new(3, Location::new(3)).with_amount(Amount::new(vec![5]));
        let vehicles = fleet(1, 10);
        let c = compat(&vehicles, &jobs);
        let view = ProblemView::new(&jobs, &vehicles, &c, m, |i| i, 1);
        assert_eq!(CvrpStrategy::demand_order(&view), vec![2, 0, 1]);
    }

    #[test]
    fn test_three_jobs_two_vehicles() {
        let (mut jobs, m) = line(3);
        for (i, job) in jobs.iter_mut().enumerate() {
            *job = Job::new(i as u64 + 1, Location::new(i + 1)).with_amount(Amount::new(vec![4]));
        }
        let vehicles = fleet(2, 10);
        let c = compat(&vehicles, &jobs);
        let view = ProblemView::new(&jobs, &vehicles, &c, m, |i| i, 1);
        let strategy = CvrpStrategy::new(SolverConfig::default());

        for worker in 0..3 {
            let raw = strategy.construct(&view, worker).expect("feasible");
            let improved = strategy.improve(&view, raw.clone(), worker);
            assert!(improved.cost() <= raw.cost());
            assert_eq!(improved.num_assigned(), 3);
            for route in improved.routes() {
                assert!(route.load()[0] <= 10);
            }
        }
    }

    #[test]
    fn test_infeasible_capacity() {
        let (jobs, m) = line(3);
        let vehicles = fleet(1, 2);
        let c = compat(&vehicles, &jobs);
        let view = ProblemView::new(&jobs, &vehicles, &c, m, |i| i, 1);
        let strategy = CvrpStrategy::new(SolverConfig::default());
        assert!(matches!(
            strategy.construct(&view, 1),
            Err(Error::InfeasibleProblem(_))
        ));
    }
}
