//! Nearest-neighbor tour construction.
//!
//! Builds a single route greedily: starting from the vehicle start, always
//! visit the nearest unvisited job. Used for the uncapacitated single-route
//! variant, where every job fits the one vehicle.
//!
//! # Complexity
//!
//! O(n²) where n = number of jobs.
//!
//! # Reference
//!
//! This is the simplest constructive heuristic for TSP. While solution
//! quality is typically 15-25% above optimal, it provides a fast baseline.

use crate::problems::ProblemView;

/// Orders `jobs` by repeatedly moving to the nearest unvisited one.
///
/// The tour starts at the start location of `vehicle`. Ties go to the job
/// listed first in `jobs`.
pub fn nearest_neighbor_tour(view: &ProblemView<'_>, vehicle: usize, jobs: &[usize]) -> Vec<usize> {
    let mut remaining = jobs.to_vec();
    let mut tour = Vec::with_capacity(jobs.len());
    let mut current = view.start(vehicle);

    loop {
        let Some(pos) = remaining
            .iter()
            .enumerate()
            .min_by_key(|&(_, &j)| view.cost(current, view.job_location(j)))
            .map(|(pos, _)| pos)
        else {
            break;
        };
        let job = remaining.remove(pos);
        current = view.job_location(job);
        tour.push(job);
    }

    tour
}
