//! Intra-route Or-opt improvement.
//!
//! # Algorithm
//!
//! Tries moving segments of 1, 2 or 3 consecutive jobs to a different
//! position within the same route, keeping their order. The gain is the
//! cost of closing the gap left by the segment plus the cost of opening a
//! gap at the insertion point.
//!
//! # Complexity
//!
//! O(n²) per pass.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::{at_or_end, before, keep_best, signed, Move};
use crate::problems::{ProblemView, RawSolution};

/// Longest segment moved at once.
const MAX_SEGMENT: usize = 3;

pub(super) fn best_move(view: &ProblemView<'_>, solution: &RawSolution) -> Option<(i64, Move)> {
    let mut best = None;

    for (route, state) in solution.routes().iter().enumerate() {
        let jobs = state.jobs();
        let n = jobs.len();
        let vehicle = state.vehicle();

        for len in 1..=MAX_SEGMENT.min(n.saturating_sub(1)) {
            for from in 0..=(n - len) {
                let first = view.job_location(jobs[from]);
                let last = view.job_location(jobs[from + len - 1]);
                let prev = before(view, state, from);
                let next = at_or_end(view, state, from + len);
                let removal = signed(view.arc(prev, next))
                    - signed(view.cost(prev, first))
                    - signed(view.arc(last, next));

                // Route without the segment; never empty since len < n.
                let rest: Vec<usize> = jobs[..from]
                    .iter()
                    .chain(&jobs[from + len..])
                    .map(|&j| view.job_location(j))
                    .collect();

                for to in 0..=rest.len() {
                    if to == from {
                        continue;
                    }
                    let p = if to == 0 {
                        view.start(vehicle)
                    } else {
                        rest[to - 1]
                    };
                    let q = rest.get(to).copied().or_else(|| view.end(vehicle));
                    let insertion = signed(view.cost(p, first)) + signed(view.arc(last, q))
                        - signed(view.arc(p, q));

                    keep_best(
                        &mut best,
                        removal + insertion,
                        Move::OrOpt {
                            route,
                            from,
                            len,
                            to,
                        },
                    );
                }
            }
        }
    }
    best
}

/// Moves `jobs[from..from + len]` so that it starts at position `to` of the
/// route without the segment.
pub(super) fn apply(
    view: &ProblemView<'_>,
    solution: &mut RawSolution,
    route: usize,
    from: usize,
    len: usize,
    to: usize,
) {
    solution.routes_mut()[route].update(view, |jobs| {
        let segment: Vec<usize> = jobs.drain(from..from + len).collect();
        jobs.splice(to..to, segment);
    });
}
