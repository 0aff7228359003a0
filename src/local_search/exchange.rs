//! Inter-route tail exchange operator (2-opt*).
//!
//! # Algorithm
//!
//! Swaps tail segments between two routes. Given routes
//! A = [a₀, …, aᵢ₋₁ | aᵢ, …, aₙ₋₁] and B = [b₀, …, bⱼ₋₁ | bⱼ, …, bₘ₋₁],
//! produce:
//!
//! A' = [a₀, …, aᵢ₋₁, bⱼ, …, bₘ₋₁]
//! B' = [b₀, …, bⱼ₋₁, aᵢ, …, aₙ₋₁]
//!
//! Each vehicle keeps its own start and end. Cuts range over `0..=len`, so
//! a whole route may be handed over or appended to the other one.
//! Head costs, tail costs, tail compatibility and prefix loads are
//! precomputed per route so every cut pair is priced in O(D).
//!
//! # Complexity
//!
//! O(n × m × R²) per pass.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use super::{keep_best, signed, Move};
use crate::models::Amount;
use crate::problems::{ProblemView, RawSolution, RouteState};

/// Per-route tables used to price cuts.
struct Side {
    vehicle: usize,
    locs: Vec<usize>,
    /// `head[i]`: cost from the start through the first `i` jobs.
    head: Vec<i64>,
    /// `tail[j]`: cost of the arcs between jobs `j..`.
    tail: Vec<i64>,
    /// `prefix_load[i]`: load of the first `i` jobs.
    prefix_load: Vec<Amount>,
    cost: i64,
}

impl Side {
    fn new(view: &ProblemView<'_>, route: &RouteState) -> Self {
        let vehicle = route.vehicle();
        let locs: Vec<usize> = route.jobs().iter().map(|&j| view.job_location(j)).collect();
        let n = locs.len();

        let mut head = vec![0i64; n + 1];
        for i in 0..n {
            let from = if i == 0 {
                view.start(vehicle)
            } else {
                locs[i - 1]
            };
            head[i + 1] = head[i] + signed(view.cost(from, locs[i]));
        }

        let mut tail = vec![0i64; n + 1];
        for j in (0..n.saturating_sub(1)).rev() {
            tail[j] = tail[j + 1] + signed(view.cost(locs[j], locs[j + 1]));
        }

        let mut prefix_load = Vec::with_capacity(n + 1);
        let mut load = view.empty_load();
        prefix_load.push(load.clone());
        for &j in route.jobs() {
            load += view.demand(j);
            prefix_load.push(load.clone());
        }

        Self {
            vehicle,
            locs,
            head,
            tail,
            prefix_load,
            cost: signed(route.cost()),
        }
    }

    fn len(&self) -> usize {
        self.locs.len()
    }

    fn total_load(&self) -> &Amount {
        &self.prefix_load[self.len()]
    }

    /// `ok[j]`: every job from `j` on may ride `vehicle`.
    fn tail_compatible(&self, view: &ProblemView<'_>, route: &RouteState, vehicle: usize) -> Vec<bool> {
        let n = self.len();
        let mut ok = vec![true; n + 1];
        for j in (0..n).rev() {
            ok[j] = ok[j + 1] && view.compatible(vehicle, route.jobs()[j]);
        }
        ok
    }
}

/// Cost of the route driven by `own.vehicle` serving the first `i` jobs of
/// `own` followed by the jobs `j..` of `other`.
fn joined_cost(view: &ProblemView<'_>, own: &Side, i: usize, other: &Side, j: usize) -> i64 {
    let end = view.end(own.vehicle);
    let tail_empty = j == other.len();
    match (i == 0, tail_empty) {
        (true, true) => 0,
        (false, true) => own.head[i] + signed(view.arc(own.locs[i - 1], end)),
        (head_empty, false) => {
            let from = if head_empty {
                view.start(own.vehicle)
            } else {
                own.locs[i - 1]
            };
            let last = other.locs[other.len() - 1];
            own.head[i]
                + signed(view.cost(from, other.locs[j]))
                + other.tail[j]
                + signed(view.arc(last, end))
        }
    }
}

/// Load of the first `i` jobs of `own` plus the jobs `j..` of `other`.
fn joined_load(own: &Side, i: usize, other: &Side, j: usize) -> Amount {
    let mut load = own.prefix_load[i].clone();
    load += other.total_load();
    load -= &other.prefix_load[j];
    load
}

pub(super) fn best_move(view: &ProblemView<'_>, solution: &RawSolution) -> Option<(i64, Move)> {
    let routes = solution.routes();
    let sides: Vec<Side> = routes.iter().map(|r| Side::new(view, r)).collect();
    let mut best = None;

    for a_route in 0..routes.len() {
        for b_route in (a_route + 1)..routes.len() {
            let (a, b) = (&sides[a_route], &sides[b_route]);
            if a.len() + b.len() == 0 {
                continue;
            }
            let a_ok_for_b = a.tail_compatible(view, &routes[a_route], b.vehicle);
            let b_ok_for_a = b.tail_compatible(view, &routes[b_route], a.vehicle);

            for a_cut in 0..=a.len() {
                for b_cut in 0..=b.len() {
                    if a_cut == a.len() && b_cut == b.len() {
                        continue;
                    }
                    if !b_ok_for_a[b_cut] || !a_ok_for_b[a_cut] {
                        continue;
                    }
                    if !view.fits(a.vehicle, &joined_load(a, a_cut, b, b_cut))
                        || !view.fits(b.vehicle, &joined_load(b, b_cut, a, a_cut))
                    {
                        continue;
                    }

                    let delta = joined_cost(view, a, a_cut, b, b_cut)
                        + joined_cost(view, b, b_cut, a, a_cut)
                        - a.cost
                        - b.cost;
                    keep_best(
                        &mut best,
                        delta,
                        Move::Exchange {
                            a_route,
                            a_cut,
                            b_route,
                            b_cut,
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
    a_cut: usize,
    b_route: usize,
    b_cut: usize,
) {
    let (a, b) = solution.pair_mut(a_route, b_route);
    let a_tail = a.jobs()[a_cut..].to_vec();
    let b_tail = b.jobs()[b_cut..].to_vec();
    a.update(view, |jobs| {
        jobs.truncate(a_cut);
        jobs.extend(b_tail);
    });
    b.update(view, |jobs| {
        jobs.truncate(b_cut);
        jobs.extend(a_tail);
    });
}
