//! Cheapest-insertion construction for capacitated fleets.
//!
//! # Algorithm
//!
//! Jobs are taken in the given order. Each job is inserted at the position,
//! over every route whose vehicle is compatible with it and can carry the
//! extra load, that increases the total cost the least. Ties go to the
//! lowest vehicle index, then the lowest position.
//!
//! # Complexity
//!
//! O(n² × R) where n = number of jobs, R = number of vehicles.

use crate::error::{Error, Result};
use crate::local_search::insertion_cost;
use crate::problems::{ProblemView, RawSolution};

/// Inserts every job of `order` at its cheapest feasible position.
///
/// Fails with [`Error::InfeasibleProblem`] naming the first job that no
/// route can take.
pub fn cheapest_insertion(view: &ProblemView<'_>, order: &[usize]) -> Result<RawSolution> {
    let mut solution = RawSolution::empty(view);

    for &job in order {
        let loc = view.job_location(job);
        let mut best: Option<(i64, usize, usize)> = None;

        for (v, route) in solution.routes().iter().enumerate() {
            if !view.compatible(v, job) {
                continue;
            }
            let mut load = route.load().clone();
            load += view.demand(job);
            if !view.fits(v, &load) {
                continue;
            }
            for pos in 0..=route.len() {
                let delta = insertion_cost(view, route, loc, pos);
                if best.is_none_or(|(d, _, _)| delta < d) {
                    best = Some((delta, v, pos));
                }
            }
        }

        let Some((_, v, pos)) = best else {
            return Err(Error::InfeasibleProblem(format!(
                "job {} fits no remaining vehicle capacity",
                view.job(job).id()
            )));
        };
        solution.routes_mut()[v].update(view, |jobs| jobs.insert(pos, job));
    }

    Ok(solution)
}
