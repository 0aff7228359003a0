//! Inter-route job relocation operator.
//!
//! # Algorithm
//!
//! Tries moving each job from its current route to the best insertion
//! position in another route. A move is only considered when the receiving
//! vehicle is compatible with the job and can carry the extra load. Emptying
//! a route saves its whole cost; filling an empty one pays the trip from the
//! vehicle start and back to its end.
//!
//! # Complexity
//!
//! O(n² × R) per pass where n = jobs per route, R = number of routes.
//!
//! # Reference
//!
//! Savelsbergh, M.W.P. (1992). "The Vehicle Routing Problem with Time
//! Windows: Minimizing Route Duration", *ORSA Journal on Computing* 4(2),
//! 146-154.

use super::{insertion_cost, keep_best, removal_cost, Move};
use crate::problems::{ProblemView, RawSolution};

pub(super) fn best_move(view: &ProblemView<'_>, solution: &RawSolution) -> Option<(i64, Move)> {
    let routes = solution.routes();
    if routes.len() < 2 {
        return None;
    }

    let mut best = None;
    for (from_route, source) in routes.iter().enumerate() {
        for (from_pos, &job) in source.jobs().iter().enumerate() {
            let removal = removal_cost(view, source, from_pos);
            let loc = view.job_location(job);

            for (to_route, target) in routes.iter().enumerate() {
                if to_route == from_route || !view.compatible(target.vehicle(), job) {
                    continue;
                }
                let load = target.load().clone() + view.demand(job).clone();
                if !view.fits(target.vehicle(), &load) {
                    continue;
                }

                for to_pos in 0..=target.len() {
                    let delta = removal + insertion_cost(view, target, loc, to_pos);
                    keep_best(
                        &mut best,
                        delta,
                        Move::Relocate {
                            from_route,
                            from_pos,
                            to_route,
                            to_pos,
                        },
                    );
                }
            }
        }
    }
    best
}

pub(super) fn apply(
    view: &ProblemView<'_>,
    solution: &mut RawSolution,
    from_route: usize,
    from_pos: usize,
    to_route: usize,
    to_pos: usize,
) {
    let (source, target) = solution.pair_mut(from_route, to_route);
    let job = source.jobs()[from_pos];
    source.update(view, |jobs| {
        jobs.remove(from_pos);
    });
    target.update(view, |jobs| jobs.insert(to_pos, job));
}

#[cfg(test)]
mod tests {
    use super::super::testkit::*;
    use super::*;
    use crate::models::{Amount, Job, Location};

    #[test]
    fn test_relocate_merges_routes() {
        let (jobs, m) = line(2);
        let vehicles = fleet(2, 10);
        let c = compat(&vehicles, &jobs);
        let view = ProblemView::new(&jobs, &vehicles, &c, m, |i| i, 1);

        // 0→1→0 and 0→2→0 cost 2 + 4; one route 0→1→2→0 costs 4
        let mut sol = RawSolution::from_sequences(&view, vec![vec![0], vec![1]]);
        assert_eq!(sol.cost(), 6);
        let (delta, mv) = best_move(&view, &sol).expect("improving");
        assert_eq!(delta, -2);
        mv.apply(&view, &mut sol);
        assert_eq!(sol.cost(), 4);
        assert_eq!(sol.num_assigned(), 2);
    }

    #[test]
    fn test_relocate_respects_capacity() {
        let (jobs, m) = line(2);
        let vehicles = fleet(2, 1);
        let c = compat(&vehicles, &jobs);
        let view = ProblemView::new(&jobs, &vehicles, &c, m, |i| i, 1);

        let sol = RawSolution::from_sequences(&view, vec![vec![0], vec![1]]);
        assert!(best_move(&view, &sol).is_none());
    }

    #[test]
    fn test_relocate_respects_skills() {
        let (mut jobs, m) = line(2);
        jobs[1] = Job::new(2, Location::new(2))
            .with_amount(Amount::new(vec![1]))
            .with_skills([7]);
        let mut vehicles = fleet(2, 10);
        vehicles[1] = vehicles[1].clone().with_skills([7]);
        let c = compat(&vehicles, &jobs);
        let view = ProblemView::new(&jobs, &vehicles, &c, m, |i| i, 1);

        // job 1 may only ride vehicle 1, so job 0 has to join it
        let mut sol = RawSolution::from_sequences(&view, vec![vec![0], vec![1]]);
        let (_, mv) = best_move(&view, &sol).expect("improving");
        mv.apply(&view, &mut sol);
        assert!(sol.routes()[0].is_empty());
        assert_eq!(sol.routes()[1].len(), 2);
    }
}
