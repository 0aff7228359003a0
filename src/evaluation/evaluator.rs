//! Feasibility checking of raw solutions.

use crate::distance::Cost;
use crate::models::Amount;
use crate::problems::{ProblemView, RawSolution};

/// A type of constraint violation in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationType {
    /// Route load exceeds the vehicle capacity.
    CapacityExceeded {
        /// Vehicle index.
        vehicle: usize,
        /// Load carried.
        load: Amount,
    },
    /// A vehicle serves a job it is not compatible with.
    IncompatibleJob {
        /// Vehicle index.
        vehicle: usize,
        /// Job index.
        job: usize,
    },
    /// A job is missing from every route.
    JobNotServed {
        /// Job index.
        job: usize,
    },
    /// A job appears more than once.
    JobServedTwice {
        /// Job index.
        job: usize,
    },
    /// Cached route cost disagrees with the matrix.
    CostMismatch {
        /// Vehicle index.
        vehicle: usize,
        /// Cached cost.
        cached: Cost,
        /// Cost recomputed from the matrix.
        actual: Cost,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// Checks solutions against the capacity, compatibility and coverage
/// constraints of a problem view.
pub struct RouteEvaluator<'v, 'a> {
    view: &'v ProblemView<'a>,
}

impl<'v, 'a> RouteEvaluator<'v, 'a> {
    /// Creates a new evaluator for the given problem view.
    pub fn new(view: &'v ProblemView<'a>) -> Self {
        Self { view }
    }

    /// Returns every violation found in `solution`, empty when feasible.
    pub fn evaluate_solution(&self, solution: &RawSolution) -> Vec<Violation> {
        let view = self.view;
        let mut violations = Vec::new();
        let mut seen = vec![0usize; view.num_jobs()];

        for route in solution.routes() {
            let v = route.vehicle();
            for &j in route.jobs() {
                seen[j] += 1;
                if !view.compatible(v, j) {
                    violations.push(Violation::new(ViolationType::IncompatibleJob {
                        vehicle: v,
                        job: j,
                    }));
                }
            }

            let load = view.route_load(route.jobs());
            if !view.fits(v, &load) {
                violations.push(Violation::new(ViolationType::CapacityExceeded {
                    vehicle: v,
                    load,
                }));
            }

            let actual = view.route_cost(v, route.jobs());
            if actual != route.cost() {
                violations.push(Violation::new(ViolationType::CostMismatch {
                    vehicle: v,
                    cached: route.cost(),
                    actual,
                }));
            }
        }

        for (job, &count) in seen.iter().enumerate() {
            match count {
                0 => violations.push(Violation::new(ViolationType::JobNotServed { job })),
                1 => {}
                _ => violations.push(Violation::new(ViolationType::JobServedTwice { job })),
            }
        }

        violations
    }

    /// Returns `true` if `solution` has no violation.
    pub fn is_feasible(&self, solution: &RawSolution) -> bool {
        self.evaluate_solution(solution).is_empty()
    }
}
