//! Variable Neighborhood Search around a local optimum.
//!
//! Shaking applies `k + 1` random feasible relocations between routes (or
//! random segment reversals when there is a single route), then local
//! search brings the shaken solution back to a local optimum. The runner
//! keeps the best solution seen, so the result is never worse than the
//! incumbent.

use rand::Rng;
use u_metaheur::vns::{VnsConfig, VnsProblem, VnsRunner};

use super::SolverConfig;
use crate::local_search::{LocalSearch, Neighborhood};
use crate::problems::{ProblemView, RawSolution};

/// Number of shaking strengths.
const SHAKE_LEVELS: usize = 3;

struct Perturbation<'v, 'a> {
    view: &'v ProblemView<'a>,
    incumbent: RawSolution,
    neighborhoods: &'v [Neighborhood],
    max_iterations: usize,
}

impl VnsProblem for Perturbation<'_, '_> {
    type Solution = RawSolution;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> RawSolution {
        self.incumbent.clone()
    }

    fn cost(&self, solution: &RawSolution) -> f64 {
        solution.cost() as f64
    }

    fn neighborhood_count(&self) -> usize {
        SHAKE_LEVELS
    }

    fn shake<R: Rng>(&self, solution: &RawSolution, k: usize, rng: &mut R) -> RawSolution {
        let mut next = solution.clone();
        for _ in 0..=k {
            if !random_relocation(self.view, &mut next, rng) {
                random_reversal(self.view, &mut next, rng);
            }
        }
        next
    }

    fn local_search(&self, solution: &RawSolution) -> RawSolution {
        let mut next = solution.clone();
        LocalSearch::new(self.view, self.neighborhoods)
            .with_max_iterations(self.max_iterations)
            .run(&mut next);
        next
    }
}

/// Runs VNS from `incumbent` and returns the best solution found.
pub(crate) fn perturb(
    view: &ProblemView<'_>,
    incumbent: &RawSolution,
    neighborhoods: &[Neighborhood],
    config: &SolverConfig,
    worker: usize,
) -> RawSolution {
    let problem = Perturbation {
        view,
        incumbent: incumbent.clone(),
        neighborhoods,
        max_iterations: config.max_iterations(),
    };
    let vns = VnsConfig::default()
        .with_max_iterations(config.perturbation_rounds())
        .with_max_no_improve(config.perturbation_rounds())
        .with_seed(config.worker_seed(worker));
    let result = VnsRunner::run(&problem, &vns);
    log::debug!(
        "worker {worker}: perturbation best {} after {} iterations",
        result.best_cost,
        result.iterations
    );
    result.best
}

/// Moves a random job to a random compatible route that can carry it.
///
/// Returns `false` when the drawn job has nowhere else to go.
fn random_relocation<R: Rng>(view: &ProblemView<'_>, solution: &mut RawSolution, rng: &mut R) -> bool {
    let sources: Vec<usize> = solution
        .routes()
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_empty())
        .map(|(i, _)| i)
        .collect();
    if sources.is_empty() || solution.routes().len() < 2 {
        return false;
    }

    let from = sources[rng.random_range(0..sources.len() as u64) as usize];
    let from_pos = rng.random_range(0..solution.routes()[from].len() as u64) as usize;
    let job = solution.routes()[from].jobs()[from_pos];

    let targets: Vec<usize> = solution
        .routes()
        .iter()
        .enumerate()
        .filter(|&(i, r)| {
            let mut load = r.load().clone();
            load += view.demand(job);
            i != from && view.compatible(r.vehicle(), job) && view.fits(r.vehicle(), &load)
        })
        .map(|(i, _)| i)
        .collect();
    if targets.is_empty() {
        return false;
    }

    let to = targets[rng.random_range(0..targets.len() as u64) as usize];
    let to_pos = rng.random_range(0..=solution.routes()[to].len() as u64) as usize;
    let (source, target) = solution.pair_mut(from, to);
    source.update(view, |jobs| {
        jobs.remove(from_pos);
    });
    target.update(view, |jobs| jobs.insert(to_pos, job));
    true
}

/// Reverses a random segment of a random route with at least two jobs.
fn random_reversal<R: Rng>(view: &ProblemView<'_>, solution: &mut RawSolution, rng: &mut R) {
    let candidates: Vec<usize> = solution
        .routes()
        .iter()
        .enumerate()
        .filter(|(_, r)| r.len() >= 2)
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        return;
    }

    let route = candidates[rng.random_range(0..candidates.len() as u64) as usize];
    let n = solution.routes()[route].len() as u64;
    let i = rng.random_range(0..n - 1) as usize;
    let j = rng.random_range(i as u64 + 1..n) as usize;
    solution.routes_mut()[route].update(view, |jobs| jobs[i..=j].reverse());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_search::testkit::{compat, fleet, line};

    #[test]
    fn test_perturbation_never_worse() {
        let (jobs, m) = line(6);
        let vehicles = fleet(2, 4);
        let c = compat(&vehicles, &jobs);
        let view = ProblemView::new(&jobs, &vehicles, &c, m, |i| i, 1);

        let mut start = RawSolution::from_sequences(&view, vec![vec![5, 0, 3], vec![1, 4, 2]]);
        LocalSearch::new(&view, Neighborhood::ALL).run(&mut start);

        let config = SolverConfig::default().with_perturbation_rounds(20);
        let result = perturb(&view, &start, Neighborhood::ALL, &config, 0);
        assert!(result.cost() <= start.cost());
        assert_eq!(result.num_assigned(), 6);
        for route in result.routes() {
            assert!(route.load()[0] <= 4);
        }
    }

    #[test]
    fn test_shake_keeps_every_job() {
        let (jobs, m) = line(5);
        let vehicles = fleet(2, 10);
        let c = compat(&vehicles, &jobs);
        let view = ProblemView::new(&jobs, &vehicles, &c, m, |i| i, 1);
        let problem = Perturbation {
            view: &view,
            incumbent: RawSolution::from_sequences(&view, vec![vec![0, 1, 2, 3, 4]]),
            neighborhoods: Neighborhood::ALL,
            max_iterations: 100,
        };

        let mut rng = u_numflow::random::create_rng(3);
        for k in 0..SHAKE_LEVELS {
            let shaken = problem.shake(&problem.incumbent, k, &mut rng);
            let mut served: Vec<usize> = shaken.sequences().concat();
            served.sort_unstable();
            assert_eq!(served, vec![0, 1, 2, 3, 4]);
        }
    }
}
