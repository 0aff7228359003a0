//! Mutable per-worker route state.

use super::ProblemView;
use crate::distance::Cost;
use crate::models::Amount;

/// Jobs assigned to one vehicle, with cached load and cost.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteState {
    vehicle: usize,
    jobs: Vec<usize>,
    load: Amount,
    cost: Cost,
}

impl RouteState {
    /// An empty route for vehicle `v`.
    pub fn new(view: &ProblemView<'_>, vehicle: usize) -> Self {
        Self {
            vehicle,
            jobs: Vec::new(),
            load: view.empty_load(),
            cost: 0,
        }
    }

    /// A route serving `jobs` in order.
    pub fn with_jobs(view: &ProblemView<'_>, vehicle: usize, jobs: Vec<usize>) -> Self {
        let mut route = Self {
            vehicle,
            jobs,
            load: view.empty_load(),
            cost: 0,
        };
        route.refresh(view);
        route
    }

    /// Vehicle index.
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// Job indices in visiting order.
    pub fn jobs(&self) -> &[usize] {
        &self.jobs
    }

    /// Sum of the demands served.
    pub fn load(&self) -> &Amount {
        &self.load
    }

    /// Travel cost.
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns `true` if the vehicle serves nothing.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Replaces the job sequence and recomputes load and cost.
    pub fn set_jobs(&mut self, view: &ProblemView<'_>, jobs: Vec<usize>) {
        self.jobs = jobs;
        self.refresh(view);
    }

    /// Edits the job sequence in place, then recomputes load and cost.
    pub fn update<F>(&mut self, view: &ProblemView<'_>, edit: F)
    where
        F: FnOnce(&mut Vec<usize>),
    {
        edit(&mut self.jobs);
        self.refresh(view);
    }

    fn refresh(&mut self, view: &ProblemView<'_>) {
        self.load = view.route_load(&self.jobs);
        self.cost = view.route_cost(self.vehicle, &self.jobs);
    }
}

/// One route per vehicle, the unit exchanged between solver stages.
///
/// `routes()[v]` always belongs to vehicle `v`; unused vehicles keep an
/// empty route.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    routes: Vec<RouteState>,
}

impl RawSolution {
    /// A solution with every vehicle idle.
    pub fn empty(view: &ProblemView<'_>) -> Self {
        Self {
            routes: (0..view.num_vehicles())
                .map(|v| RouteState::new(view, v))
                .collect(),
        }
    }

    /// Builds routes from per-vehicle job sequences.
    ///
    /// Vehicles beyond `sequences.len()` stay idle.
    pub fn from_sequences(view: &ProblemView<'_>, mut sequences: Vec<Vec<usize>>) -> Self {
        sequences.resize(view.num_vehicles(), Vec::new());
        Self {
            routes: sequences
                .into_iter()
                .enumerate()
                .map(|(v, jobs)| RouteState::with_jobs(view, v, jobs))
                .collect(),
        }
    }

    /// Routes indexed by vehicle.
    pub fn routes(&self) -> &[RouteState] {
        &self.routes
    }

    /// Mutable routes indexed by vehicle.
    pub fn routes_mut(&mut self) -> &mut [RouteState] {
        &mut self.routes
    }

    /// Two distinct routes borrowed mutably.
    ///
    /// # Panics
    ///
    /// Panics if `a == b`.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut RouteState, &mut RouteState) {
        assert_ne!(a, b, "pair_mut needs two distinct routes");
        if a < b {
            let (left, right) = self.routes.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.routes.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// Total travel cost.
    pub fn cost(&self) -> Cost {
        self.routes.iter().map(RouteState::cost).sum()
    }

    /// Number of jobs served.
    pub fn num_assigned(&self) -> usize {
        self.routes.iter().map(RouteState::len).sum()
    }

    /// Per-vehicle job sequences.
    pub fn sequences(&self) -> Vec<Vec<usize>> {
        self.routes.iter().map(|r| r.jobs.clone()).collect()
    }
}
