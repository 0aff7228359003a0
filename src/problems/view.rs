//! Read-only problem snapshot shared by solver workers.

use crate::distance::{Cost, CostMatrix};
use crate::input::CompatibilityMatrix;
use crate::models::{Amount, Job, Vehicle};

/// Everything a worker needs to build and improve routes.
///
/// Locations are expressed in the solving matrix, which is the sub-matrix
/// of the locations actually referenced by jobs and vehicles. The view is
/// immutable and `Sync`, so workers share it by reference.
#[derive(Debug)]
pub struct ProblemView<'a> {
    jobs: &'a [Job],
    vehicles: &'a [Vehicle],
    compatibility: &'a CompatibilityMatrix,
    matrix: CostMatrix,
    job_locations: Vec<usize>,
    starts: Vec<usize>,
    ends: Vec<Option<usize>>,
    amount_size: usize,
}

impl<'a> ProblemView<'a> {
    /// Builds a view.
    ///
    /// `remap` translates a caller matrix index into a row of `matrix`.
    pub(crate) fn new(
        jobs: &'a [Job],
        vehicles: &'a [Vehicle],
        compatibility: &'a CompatibilityMatrix,
        matrix: CostMatrix,
        remap: impl Fn(usize) -> usize,
        amount_size: usize,
    ) -> Self {
        Self {
            jobs,
            vehicles,
            compatibility,
            job_locations: jobs.iter().map(|j| remap(j.location().index())).collect(),
            starts: vehicles.iter().map(|v| remap(v.start().index())).collect(),
            ends: vehicles
                .iter()
                .map(|v| v.end().map(|e| remap(e.index())))
                .collect(),
            matrix,
            amount_size,
        }
    }

    /// Number of jobs.
    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    /// Job by catalog index.
    pub fn job(&self, j: usize) -> &Job {
        &self.jobs[j]
    }

    /// Vehicle by catalog index.
    pub fn vehicle(&self, v: usize) -> &Vehicle {
        &self.vehicles[v]
    }

    /// Dimension of amounts (0 when no amount was declared).
    pub fn amount_size(&self) -> usize {
        self.amount_size
    }

    /// Zero load.
    pub fn empty_load(&self) -> Amount {
        Amount::zero(self.amount_size)
    }

    /// Demand of job `j`.
    pub fn demand(&self, j: usize) -> &Amount {
        self.jobs[j].amount()
    }

    /// Returns `true` if vehicle `v` may serve job `j`.
    pub fn compatible(&self, v: usize, j: usize) -> bool {
        self.compatibility.get(v, j)
    }

    /// Returns `true` if vehicle `v` can carry `load`.
    pub fn fits(&self, v: usize, load: &Amount) -> bool {
        self.vehicles[v].can_carry(load)
    }

    /// The solving matrix.
    pub fn matrix(&self) -> &CostMatrix {
        &self.matrix
    }

    /// Matrix row of job `j`.
    pub fn job_location(&self, j: usize) -> usize {
        self.job_locations[j]
    }

    /// Matrix row of the start of vehicle `v`.
    pub fn start(&self, v: usize) -> usize {
        self.starts[v]
    }

    /// Matrix row of the end of vehicle `v`, if any.
    pub fn end(&self, v: usize) -> Option<usize> {
        self.ends[v]
    }

    /// Cost between two matrix rows.
    pub fn cost(&self, from: usize, to: usize) -> Cost {
        self.matrix.get(from, to)
    }

    /// Cost of travelling from job `a` to job `b`.
    pub fn job_cost(&self, a: usize, b: usize) -> Cost {
        self.cost(self.job_locations[a], self.job_locations[b])
    }

    /// Cost from a matrix row to an optional one; open ends are free.
    pub fn arc(&self, from: usize, to: Option<usize>) -> Cost {
        to.map_or(0, |t| self.cost(from, t))
    }

    /// Travel cost of vehicle `v` serving `jobs` in order.
    ///
    /// An empty route costs nothing: the vehicle stays home.
    pub fn route_cost(&self, v: usize, jobs: &[usize]) -> Cost {
        let (Some(&first), Some(&last)) = (jobs.first(), jobs.last()) else {
            return 0;
        };
        let inner: Cost = jobs.windows(2).map(|w| self.job_cost(w[0], w[1])).sum();
        self.cost(self.starts[v], self.job_locations[first])
            + inner
            + self.arc(self.job_locations[last], self.ends[v])
    }

    /// Sum of the demands of `jobs`.
    pub fn route_load(&self, jobs: &[usize]) -> Amount {
        let mut load = self.empty_load();
        for &j in jobs {
            load += self.demand(j);
        }
        load
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    #[test]
    fn test_route_cost_open_and_closed() {
        let jobs = vec![Job::new(1, Location::new(1)), Job::new(2, Location::new(2))];
        let vehicles = vec![
            Vehicle::new(0, Location::new(0)).with_end(Location::new(0)),
            Vehicle::new(1, Location::new(0)),
        ];
        let compat = CompatibilityMatrix::compute(&vehicles, &jobs);
        let m = CostMatrix::from_rows(vec![vec![0, 1, 5], vec![2, 0, 3], vec![4, 6, 0]])
            .expect("square");
        let view = ProblemView::new(&jobs, &vehicles, &compat, m, |i| i, 0);

        // 0→1→2→0 = 1 + 3 + 4
        assert_eq!(view.route_cost(0, &[0, 1]), 8);
        // open: 0→1→2 = 1 + 3
        assert_eq!(view.route_cost(1, &[0, 1]), 4);
        assert_eq!(view.route_cost(0, &[]), 0);
    }

    #[test]
    fn test_route_load() {
        let jobs = vec![
            Job::new(1, Location::new(0)).with_amount(Amount::new(vec![2, 3])),
            Job::new(2, Location::new(0)).with_amount(Amount::new(vec![1, 0])),
        ];
        let vehicles = vec![Vehicle::new(0, Location::new(0))];
        let compat = CompatibilityMatrix::compute(&vehicles, &jobs);
        let view = ProblemView::new(&jobs, &vehicles, &compat, CostMatrix::new(1), |i| i, 2);
        assert_eq!(view.route_load(&[0, 1]).as_slice(), &[3, 3]);
        assert_eq!(view.route_load(&[]), Amount::zero(2));
    }
}
