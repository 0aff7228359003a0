//! Parallel construction and local search.
//!
//! [`solve`] runs `thread_count` independent workers on a dedicated rayon
//! pool. Each worker constructs a solution with the variant's
//! [`RoutingStrategy`], improves it, and hands it back; the cheapest result
//! wins, the lowest worker index breaking ties. A worker's result depends
//! only on the view, the configuration and its index, so adding workers can
//! only match or improve the best cost.

mod perturbation;

use rayon::prelude::*;

use crate::distance::Cost;
use crate::error::{Error, Result};
use crate::evaluation::RouteEvaluator;
use crate::local_search::{LocalSearch, Neighborhood};
use crate::problems::{ProblemView, RawSolution, RoutingStrategy};

/// Tuning knobs of the solve loop.
///
/// # Examples
///
/// ```
/// use u_vrp::solver::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_max_iterations(500)
///     .with_perturbation_rounds(10)
///     .with_seed(7);
/// assert_eq!(config.max_iterations(), 500);
/// assert_eq!(config.worker_seed(2), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    max_iterations: usize,
    perturbation_rounds: usize,
    seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            perturbation_rounds: 0,
            seed: 42,
        }
    }
}

impl SolverConfig {
    /// Caps the number of moves applied by one local search run.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Enables Variable Neighborhood Search for `rounds` iterations after
    /// local search; `0` disables it.
    pub fn with_perturbation_rounds(mut self, rounds: usize) -> Self {
        self.perturbation_rounds = rounds;
        self
    }

    /// Base seed of the worker random streams.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Move cap per local search run.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// VNS iterations, `0` when disabled.
    pub fn perturbation_rounds(&self) -> usize {
        self.perturbation_rounds
    }

    /// Base seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seed of worker `worker`.
    pub fn worker_seed(&self, worker: usize) -> u64 {
        self.seed.wrapping_add(worker as u64)
    }
}

/// Local search, then optional perturbation kept only when strictly cheaper.
pub(crate) fn improve(
    view: &ProblemView<'_>,
    mut raw: RawSolution,
    neighborhoods: &[Neighborhood],
    config: &SolverConfig,
    worker: usize,
) -> RawSolution {
    let moves = LocalSearch::new(view, neighborhoods)
        .with_max_iterations(config.max_iterations())
        .run(&mut raw);
    log::debug!("worker {worker}: local search applied {moves} moves");

    if config.perturbation_rounds() > 0 {
        let candidate = perturbation::perturb(view, &raw, neighborhoods, config, worker);
        if candidate.cost() < raw.cost() {
            raw = candidate;
        }
    }
    raw
}

/// Runs `thread_count` workers and returns the cheapest solution.
///
/// Fails with [`Error::InvalidThreadCount`] for zero threads, with
/// [`Error::ThreadPool`] when the pool cannot be built, and with the
/// lowest-index worker error when no worker succeeds.
pub fn solve(
    view: &ProblemView<'_>,
    strategy: &dyn RoutingStrategy,
    thread_count: usize,
) -> Result<RawSolution> {
    if thread_count == 0 {
        return Err(Error::InvalidThreadCount);
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))?;

    let results: Vec<Result<RawSolution>> = pool.install(|| {
        (0..thread_count)
            .into_par_iter()
            .map(|worker| run_worker(view, strategy, worker))
            .collect()
    });

    let mut best: Option<(Cost, usize, RawSolution)> = None;
    let mut first_error = None;
    for (worker, result) in results.into_iter().enumerate() {
        match result {
            Ok(raw) => {
                let cost = raw.cost();
                if best.as_ref().is_none_or(|(c, _, _)| cost < *c) {
                    best = Some((cost, worker, raw));
                }
            }
            Err(err) => {
                log::debug!("worker {worker}: {err}");
                first_error.get_or_insert(err);
            }
        }
    }

    match (best, first_error) {
        (Some((cost, worker, raw)), _) => {
            log::debug!("best solution from worker {worker} with cost {cost}");
            Ok(raw)
        }
        (None, Some(err)) => Err(err),
        (None, None) => Err(Error::InvalidThreadCount),
    }
}

fn run_worker(
    view: &ProblemView<'_>,
    strategy: &dyn RoutingStrategy,
    worker: usize,
) -> Result<RawSolution> {
    let constructed = strategy.construct(view, worker)?;
    let initial = constructed.cost();
    let improved = strategy.improve(view, constructed, worker);
    debug_assert!(improved.cost() <= initial);
    debug_assert!(RouteEvaluator::new(view).is_feasible(&improved));
    log::debug!(
        "worker {worker}: construction {initial}, after local search {}",
        improved.cost()
    );
    Ok(improved)
}
