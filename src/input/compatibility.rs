//! Vehicle-to-job compatibility.

use crate::models::{Job, Vehicle};

/// Returns `true` if `vehicle` may serve `job`.
///
/// The vehicle must provide every skill the job requires and its capacity
/// must cover the job demand in every dimension. Unconstrained vehicles
/// pass the capacity side.
///
/// # Examples
///
/// ```
/// use u_vrp::input::vehicle_ok_with_job;
/// use u_vrp::models::{Amount, Job, Location, Vehicle};
///
/// let v = Vehicle::new(0, Location::new(0))
///     .with_capacity(Amount::new(vec![5]))
///     .with_skills([1, 2]);
/// let small = Job::new(1, Location::new(1)).with_amount(Amount::new(vec![5])).with_skills([2]);
/// let big = Job::new(2, Location::new(1)).with_amount(Amount::new(vec![6]));
/// let picky = Job::new(3, Location::new(1)).with_amount(Amount::new(vec![1])).with_skills([3]);
/// assert!(vehicle_ok_with_job(&v, &small));
/// assert!(!vehicle_ok_with_job(&v, &big));
/// assert!(!vehicle_ok_with_job(&v, &picky));
/// ```
pub fn vehicle_ok_with_job(vehicle: &Vehicle, job: &Job) -> bool {
    job.skills().is_subset(vehicle.skills()) && vehicle.can_carry(job.amount())
}

/// Dense vehicles × jobs compatibility table.
///
/// Computed once before solving; the solver queries it for every
/// candidate move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityMatrix {
    num_vehicles: usize,
    num_jobs: usize,
    table: Vec<bool>,
}

impl CompatibilityMatrix {
    /// Evaluates [`vehicle_ok_with_job`] for every pair.
    pub fn compute(vehicles: &[Vehicle], jobs: &[Job]) -> Self {
        let table = vehicles
            .iter()
            .flat_map(|v| jobs.iter().map(move |j| vehicle_ok_with_job(v, j)))
            .collect();
        Self {
            num_vehicles: vehicles.len(),
            num_jobs: jobs.len(),
            table,
        }
    }

    /// Entry for vehicle `v` and job `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, v: usize, j: usize) -> bool {
        assert!(j < self.num_jobs, "job index {j} out of range");
        self.table[v * self.num_jobs + j]
    }

    /// Number of vehicle rows.
    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Number of job columns.
    pub fn num_jobs(&self) -> usize {
        self.num_jobs
    }

    /// Vehicles able to serve job `j`, in catalog order.
    pub fn vehicles_for(&self, j: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_vehicles()).filter(move |&v| self.get(v, j))
    }

    /// Returns the first job no vehicle can serve, if any.
    pub fn first_orphan_job(&self) -> Option<usize> {
        (0..self.num_jobs).find(|&j| self.vehicles_for(j).next().is_none())
    }
}
