//! Local search operators for improving routes.
//!
//! - [`Neighborhood::TwoOpt`] — Intra-route segment reversal
//! - [`Neighborhood::OrOpt`] — Intra-route move of 1 to 3 consecutive jobs
//! - [`Neighborhood::Relocate`] — Inter-route job relocation
//! - [`Neighborhood::Swap`] — Inter-route job exchange
//! - [`Neighborhood::Exchange`] — Inter-route tail exchange (2-opt*)
//!
//! Every operator searches its whole neighbourhood and reports the best
//! strictly improving move. [`LocalSearch`] applies the best move across the
//! configured neighbourhoods until none improves, so the solution cost never
//! increases.

mod exchange;
mod or_opt;
mod relocate;
mod swap;
mod two_opt;

use crate::distance::Cost;
use crate::problems::{ProblemView, RawSolution, RouteState};

/// A neighbourhood explored by [`LocalSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neighborhood {
    /// Reverse a segment of one route.
    TwoOpt,
    /// Move a short segment to another position of the same route.
    OrOpt,
    /// Move one job to another route.
    Relocate,
    /// Exchange two jobs between routes.
    Swap,
    /// Exchange the tails of two routes.
    Exchange,
}

impl Neighborhood {
    /// Intra-route neighbourhoods only.
    pub const INTRA: &'static [Neighborhood] = &[Neighborhood::TwoOpt, Neighborhood::OrOpt];

    /// Every neighbourhood.
    pub const ALL: &'static [Neighborhood] = &[
        Neighborhood::TwoOpt,
        Neighborhood::OrOpt,
        Neighborhood::Relocate,
        Neighborhood::Swap,
        Neighborhood::Exchange,
    ];

    fn best_move(self, view: &ProblemView<'_>, solution: &RawSolution) -> Option<(i64, Move)> {
        match self {
            Neighborhood::TwoOpt => two_opt::best_move(view, solution),
            Neighborhood::OrOpt => or_opt::best_move(view, solution),
            Neighborhood::Relocate => relocate::best_move(view, solution),
            Neighborhood::Swap => swap::best_move(view, solution),
            Neighborhood::Exchange => exchange::best_move(view, solution),
        }
    }
}

/// A move found by one of the operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    TwoOpt {
        route: usize,
        i: usize,
        j: usize,
    },
    OrOpt {
        route: usize,
        from: usize,
        len: usize,
        to: usize,
    },
    Relocate {
        from_route: usize,
        from_pos: usize,
        to_route: usize,
        to_pos: usize,
    },
    Swap {
        a_route: usize,
        a_pos: usize,
        b_route: usize,
        b_pos: usize,
    },
    Exchange {
        a_route: usize,
        a_cut: usize,
        b_route: usize,
        b_cut: usize,
    },
}

impl Move {
    fn apply(self, view: &ProblemView<'_>, solution: &mut RawSolution) {
        match self {
            Move::TwoOpt { route, i, j } => two_opt::apply(view, solution, route, i, j),
            Move::OrOpt {
                route,
                from,
                len,
                to,
            } => or_opt::apply(view, solution, route, from, len, to),
            Move::Relocate {
                from_route,
                from_pos,
                to_route,
                to_pos,
            } => relocate::apply(view, solution, from_route, from_pos, to_route, to_pos),
            Move::Swap {
                a_route,
                a_pos,
                b_route,
                b_pos,
            } => swap::apply(view, solution, a_route, a_pos, b_route, b_pos),
            Move::Exchange {
                a_route,
                a_cut,
                b_route,
                b_cut,
            } => exchange::apply(view, solution, a_route, a_cut, b_route, b_cut),
        }
    }
}

/// Best-improvement descent over a set of neighbourhoods.
///
/// Each iteration applies the single best move found across every
/// neighbourhood. The solver drives it with [`Neighborhood::INTRA`] for
/// single-route problems and [`Neighborhood::ALL`] otherwise.
#[derive(Debug, Clone)]
pub struct LocalSearch<'v, 'a> {
    view: &'v ProblemView<'a>,
    neighborhoods: &'v [Neighborhood],
    max_iterations: usize,
}

impl<'v, 'a> LocalSearch<'v, 'a> {
    /// Creates a descent over `neighborhoods`, in priority order for ties.
    pub fn new(view: &'v ProblemView<'a>, neighborhoods: &'v [Neighborhood]) -> Self {
        Self {
            view,
            neighborhoods,
            max_iterations: 10_000,
        }
    }

    /// Caps the number of applied moves.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Improves `solution` in place and returns the number of applied moves.
    pub fn run(&self, solution: &mut RawSolution) -> usize {
        let mut applied = 0;
        while applied < self.max_iterations {
            let best = self
                .neighborhoods
                .iter()
                .filter_map(|n| n.best_move(self.view, solution))
                .min_by_key(|&(delta, _)| delta);
            let Some((delta, mv)) = best else {
                break;
            };

            let before = solution.cost();
            mv.apply(self.view, solution);
            debug_assert_eq!(
                solution.cost() as i64,
                before as i64 + delta,
                "{mv:?} changed the cost by an unexpected amount"
            );
            applied += 1;
        }
        applied
    }
}

/// Signed cost, for move deltas.
#[inline]
fn signed(c: Cost) -> i64 {
    c as i64
}

/// Matrix row visited just before position `pos` of `route`.
fn before(view: &ProblemView<'_>, route: &RouteState, pos: usize) -> usize {
    if pos == 0 {
        view.start(route.vehicle())
    } else {
        view.job_location(route.jobs()[pos - 1])
    }
}

/// Matrix row visited at position `pos` of `route`, or its end past the
/// last job.
fn at_or_end(view: &ProblemView<'_>, route: &RouteState, pos: usize) -> Option<usize> {
    route
        .jobs()
        .get(pos)
        .map(|&j| view.job_location(j))
        .or_else(|| view.end(route.vehicle()))
}

/// Cost change of removing the job at `pos` from `route`.
pub(crate) fn removal_cost(view: &ProblemView<'_>, route: &RouteState, pos: usize) -> i64 {
    if route.len() == 1 {
        return -signed(route.cost());
    }
    let loc = view.job_location(route.jobs()[pos]);
    let prev = before(view, route, pos);
    let next = at_or_end(view, route, pos + 1);
    signed(view.arc(prev, next)) - signed(view.cost(prev, loc)) - signed(view.arc(loc, next))
}

/// Cost change of inserting matrix row `loc` at `pos` of `route`.
pub(crate) fn insertion_cost(
    view: &ProblemView<'_>,
    route: &RouteState,
    loc: usize,
    pos: usize,
) -> i64 {
    let prev = before(view, route, pos);
    let next = at_or_end(view, route, pos);
    let old = if route.is_empty() {
        0
    } else {
        signed(view.arc(prev, next))
    };
    signed(view.cost(prev, loc)) + signed(view.arc(loc, next)) - old
}

/// Keeps the lower of two candidate moves, the first one on ties.
fn keep_best(best: &mut Option<(i64, Move)>, delta: i64, mv: Move) {
    if delta < 0 && best.is_none_or(|(d, _)| delta < d) {
        *best = Some((delta, mv));
    }
}

#[cfg(test)]
pub(crate) mod testkit {
    use crate::distance::CostMatrix;
    use crate::input::CompatibilityMatrix;
    use crate::models::{Amount, Job, Location, Vehicle};

    /// Jobs at locations `1..=n` of a line, depot at 0, cost = |i - j|.
    pub(crate) fn line(n: usize) -> (Vec<Job>, CostMatrix) {
        let jobs = (1..=n)
            .map(|i| Job::new(i as u64, Location::new(i)).with_amount(Amount::new(vec![1])))
            .collect();
        let rows = (0..=n)
            .map(|i| (0..=n).map(|j| i.abs_diff(j) as u64).collect())
            .collect();
        (jobs, CostMatrix::from_rows(rows).expect("square"))
    }

    pub(crate) fn fleet(count: usize, capacity: i64) -> Vec<Vehicle> {
        (0..count)
            .map(|v| {
                Vehicle::new(v as u64, Location::new(0))
                    .with_end(Location::new(0))
                    .with_capacity(Amount::new(vec![capacity]))
            })
            .collect()
    }

    pub(crate) fn compat(vehicles: &[Vehicle], jobs: &[Job]) -> CompatibilityMatrix {
        CompatibilityMatrix::compute(vehicles, jobs)
    }
}
