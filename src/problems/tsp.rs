//! Single-route strategy: one vehicle visits every job.

use rand::Rng;

use super::{ProblemView, RawSolution, RoutingStrategy};
use crate::constructive::nearest_neighbor_tour;
use crate::error::Result;
use crate::local_search::Neighborhood;
use crate::solver::{self, SolverConfig};

/// Nearest-neighbour construction followed by 2-opt and Or-opt.
///
/// Worker 0 builds the plain nearest-neighbour tour from the vehicle start;
/// the other workers start from a random permutation drawn from their own
/// seed.
#[derive(Debug, Clone)]
pub struct TspStrategy {
    config: SolverConfig,
}

impl TspStrategy {
    /// Creates the strategy.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl RoutingStrategy for TspStrategy {
    fn construct(&self, view: &ProblemView<'_>, worker: usize) -> Result<RawSolution> {
        let jobs: Vec<usize> = (0..view.num_jobs()).collect();
        let tour = if worker == 0 {
            nearest_neighbor_tour(view, 0, &jobs)
        } else {
            let mut rng = u_numflow::random::create_rng(self.config.worker_seed(worker));
            let mut perm = jobs;
            // Fisher-Yates shuffle
            for i in (1..perm.len()).rev() {
                let j = rng.random_range(0..=i as u64) as usize;
                perm.swap(i, j);
            }
            perm
        };
        Ok(RawSolution::from_sequences(view, vec![tour]))
    }

    fn improve(&self, view: &ProblemView<'_>, raw: RawSolution, worker: usize) -> RawSolution {
        solver::improve(view, raw, Neighborhood::INTRA, &self.config, worker)
    }
}
