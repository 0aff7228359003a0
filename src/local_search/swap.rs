//! Inter-route job swap operator.
//!
//! # Algorithm
//!
//! For every pair of jobs served by two different routes, exchange their
//! positions. Both vehicles must be compatible with the job they receive
//! and carry the resulting load.
//!
//! # Complexity
//!
//! O(n² × R²) per pass.

use super::{at_or_end, before, keep_best, signed, Move};
use crate::problems::{ProblemView, RawSolution, RouteState};

pub(super) fn best_move(view: &ProblemView<'_>, solution: &RawSolution) -> Option<(i64, Move)> {
    let routes = solution.routes();
    let mut best = None;

    for (a_route, a) in routes.iter().enumerate() {
        for (b_route, b) in routes.iter().enumerate().skip(a_route + 1) {
            if a.is_empty() || b.is_empty() {
                continue;
            }
            for (a_pos, &ja) in a.jobs().iter().enumerate() {
                if !view.compatible(b.vehicle(), ja) {
                    continue;
                }
                for (b_pos, &jb) in b.jobs().iter().enumerate() {
                    if !view.compatible(a.vehicle(), jb) || !loads_fit(view, a, ja, b, jb) {
                        continue;
                    }
                    let delta = replacement_cost(view, a, a_pos, view.job_location(jb))
                        + replacement_cost(view, b, b_pos, view.job_location(ja));
                    keep_best(
                        &mut best,
                        delta,
                        Move::Swap {
                            a_route,
                            a_pos,
                            b_route,
                            b_pos,
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
    a_route: usize,
    a_pos: usize,
    b_route: usize,
    b_pos: usize,
) {
    let (a, b) = solution.pair_mut(a_route, b_route);
    let ja = a.jobs()[a_pos];
    let jb = b.jobs()[b_pos];
    a.update(view, |jobs| jobs[a_pos] = jb);
    b.update(view, |jobs| jobs[b_pos] = ja);
}

fn loads_fit(view: &ProblemView<'_>, a: &RouteState, ja: usize, b: &RouteState, jb: usize) -> bool {
    let mut load_a = a.load().clone();
    load_a -= view.demand(ja);
    load_a += view.demand(jb);

    let mut load_b = b.load().clone();
    load_b -= view.demand(jb);
    load_b += view.demand(ja);

    view.fits(a.vehicle(), &load_a) && view.fits(b.vehicle(), &load_b)
}

/// Cost change of serving matrix row `loc` instead of the job at `pos`.
fn replacement_cost(view: &ProblemView<'_>, route: &RouteState, pos: usize, loc: usize) -> i64 {
    let old = view.job_location(route.jobs()[pos]);
    let prev = before(view, route, pos);
    let next = at_or_end(view, route, pos + 1);
    signed(view.cost(prev, loc)) + signed(view.arc(loc, next))
        - signed(view.cost(prev, old))
        - signed(view.arc(old, next))
}
