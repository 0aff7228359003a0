//! Solution types handed back to callers.

use serde::Serialize;

use super::{Amount, Coordinates};
use crate::distance::Cost;

/// Kind of a route step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Departure from the vehicle start.
    Start,
    /// Service of a job.
    Job,
    /// Arrival at the vehicle end.
    End,
}

/// One stop of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    /// What happens at this stop.
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Index in the caller's cost matrix.
    pub location_index: usize,
    /// Coordinates, only when every location of the model has them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Served job id (job steps only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<u64>,
}

/// The ordered stops of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Vehicle id.
    pub vehicle: u64,
    /// Travel cost of the route in matrix units.
    pub cost: Cost,
    /// Sum of the demands served.
    pub amount: Amount,
    /// Start, job and end steps in visiting order.
    pub steps: Vec<Step>,
    /// Polyline of the route when geometry was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<Coordinates>>,
}

impl Route {
    /// Ids of the served jobs in visiting order.
    pub fn job_ids(&self) -> Vec<u64> {
        self.steps.iter().filter_map(|s| s.job).collect()
    }
}

/// Wall-clock time spent in each phase, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ComputingTimes {
    /// From model creation to the end of validation.
    pub loading: u64,
    /// Construction and local search.
    pub solving: u64,
    /// Route geometry and formatting.
    pub routing: u64,
}

/// Aggregate figures of a solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Total travel cost.
    pub cost: Cost,
    /// Number of non-empty routes.
    pub routes: usize,
    /// Number of unassigned jobs.
    pub unassigned: usize,
    /// Total amount served.
    pub amount: Amount,
    /// Time spent per phase.
    pub computing_times: ComputingTimes,
}

/// A complete solution to a routing problem.
///
/// Only vehicles that serve at least one job get a route.
///
/// # Examples
///
/// ```
/// use u_vrp::distance::CostMatrix;
/// use u_vrp::input::Input;
/// use u_vrp::models::{Job, Location, Vehicle};
///
/// let mut input = Input::new();
/// input.add_vehicle(Vehicle::new(0, Location::new(0))).unwrap();
/// input.add_job(Job::new(1, Location::new(1))).unwrap();
/// input
///     .set_matrix(CostMatrix::from_rows(vec![vec![0, 4], vec![4, 0]]).unwrap())
///     .unwrap();
///
/// let solution = input.solve(1).unwrap();
/// assert_eq!(solution.code, 0);
/// assert_eq!(solution.routes.len(), 1);
/// assert_eq!(solution.routes[0].job_ids(), vec![1]);
/// assert_eq!(solution.summary.cost, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    /// Status code, `0` on success.
    pub code: u32,
    /// Aggregate figures.
    pub summary: Summary,
    /// One route per used vehicle.
    pub routes: Vec<Route>,
    /// Ids of jobs left out.
    pub unassigned: Vec<u64>,
}

impl Solution {
    /// Total number of jobs served across routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.job_ids().len()).sum()
    }

    /// Route served by the given vehicle, if it was used.
    pub fn route_of(&self, vehicle: u64) -> Option<&Route> {
        self.routes.iter().find(|r| r.vehicle == vehicle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(kind: StepKind, location_index: usize, job: Option<u64>) -> Step {
        Step {
            kind,
            location_index,
            coordinates: None,
            job,
        }
    }

    fn sample() -> Solution {
        let route = Route {
            vehicle: 4,
            cost: 12,
            amount: Amount::new(vec![3]),
            steps: vec![
                step(StepKind::Start, 0, None),
                step(StepKind::Job, 2, Some(10)),
                step(StepKind::Job, 1, Some(11)),
                step(StepKind::End, 0, None),
            ],
            geometry: None,
        };
        Solution {
            code: 0,
            summary: Summary {
                cost: 12,
                routes: 1,
                unassigned: 0,
                amount: Amount::new(vec![3]),
                computing_times: ComputingTimes::default(),
            },
            routes: vec![route],
            unassigned: vec![],
        }
    }

    #[test]
    fn test_job_ids_and_lookup() {
        let sol = sample();
        assert_eq!(sol.routes[0].job_ids(), vec![10, 11]);
        assert_eq!(sol.num_served(), 2);
        assert!(sol.route_of(4).is_some());
        assert!(sol.route_of(5).is_none());
    }

    #[test]
    fn test_serialize_shape() {
        let value = serde_json::to_value(sample()).expect("serializable");
        assert_eq!(value["summary"]["cost"], 12);
        assert_eq!(value["routes"][0]["steps"][0]["type"], "start");
        assert_eq!(value["routes"][0]["steps"][1]["job"], 10);
        assert!(value["routes"][0]["steps"][0].get("coordinates").is_none());
        assert!(value["routes"][0].get("geometry").is_none());
    }
}
