//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of positions i < j in a route, compute the change in cost
//! from reversing the segment `[i..=j]`:
//!
//! ```text
//! before: prev → r[i] → r[i+1] → … → r[j] → next
//! after:  prev → r[j] → r[j-1] → … → r[i] → next
//! ```
//!
//! Costs may be asymmetric, so the reversed segment is priced with a
//! backward prefix sum instead of being assumed equal to the forward one.
//! `next` is the vehicle end, or nothing for open routes.
//!
//! # Complexity
//!
//! O(n²) per pass.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::{keep_best, signed, Move};
use crate::problems::{ProblemView, RawSolution};

pub(super) fn best_move(view: &ProblemView<'_>, solution: &RawSolution) -> Option<(i64, Move)> {
    let mut best = None;
    for (route, state) in solution.routes().iter().enumerate() {
        if let Some((delta, i, j)) = best_reversal(view, state.vehicle(), state.jobs()) {
            keep_best(&mut best, delta, Move::TwoOpt { route, i, j });
        }
    }
    best
}

pub(super) fn apply(view: &ProblemView<'_>, solution: &mut RawSolution, route: usize, i: usize, j: usize) {
    solution.routes_mut()[route].update(view, |jobs| jobs[i..=j].reverse());
}

/// Best improving reversal `(delta, i, j)` of one route.
fn best_reversal(view: &ProblemView<'_>, vehicle: usize, jobs: &[usize]) -> Option<(i64, usize, usize)> {
    let n = jobs.len();
    if n < 2 {
        return None;
    }

    let locs: Vec<usize> = jobs.iter().map(|&j| view.job_location(j)).collect();
    // fwd[k]: cost of locs[0] → … → locs[k]; bwd[k]: same path walked backwards.
    let mut fwd = vec![0i64; n];
    let mut bwd = vec![0i64; n];
    for k in 1..n {
        fwd[k] = fwd[k - 1] + signed(view.cost(locs[k - 1], locs[k]));
        bwd[k] = bwd[k - 1] + signed(view.cost(locs[k], locs[k - 1]));
    }

    let start = view.start(vehicle);
    let end = view.end(vehicle);
    let mut best: Option<(i64, usize, usize)> = None;

    for i in 0..n - 1 {
        let prev = if i == 0 { start } else { locs[i - 1] };
        for j in (i + 1)..n {
            let next = if j + 1 < n { Some(locs[j + 1]) } else { end };

            let old = signed(view.cost(prev, locs[i]))
                + (fwd[j] - fwd[i])
                + signed(view.arc(locs[j], next));
            let new = signed(view.cost(prev, locs[j]))
                + (bwd[j] - bwd[i])
                + signed(view.arc(locs[i], next));

            let delta = new - old;
            if delta < 0 && best.is_none_or(|(d, _, _)| delta < d) {
                best = Some((delta, i, j));
            }
        }
    }
    best
}
