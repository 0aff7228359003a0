//! The problem model: jobs, vehicles and the cost matrix.
//!
//! An [`Input`] is built incrementally with [`Input::add_job`],
//! [`Input::add_vehicle`] and [`Input::set_matrix`], then solved once with
//! [`Input::solve`]. Every mutating call validates eagerly and leaves the
//! model unchanged on failure. Solving freezes the model.

mod compatibility;
mod format;

pub use compatibility::{vehicle_ok_with_job, CompatibilityMatrix};

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::time::Instant;

use crate::distance::{CostMatrix, CostMatrixProvider};
use crate::error::{Error, Result};
use crate::models::{Amount, Job, Location, Solution, Vehicle};
use crate::problems::{ProblemVariant, ProblemView};
use crate::solver::{self, SolverConfig};

use format::{RouteOptions, Timeline};

/// Largest solution-cost upper bound accepted by [`Input::solve`].
///
/// Move gains add and subtract a handful of route costs in `i64`.
const MAX_COST_BOUND: u128 = (i64::MAX / 4) as u128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Building,
    Frozen,
}

/// A vehicle routing problem under construction.
///
/// # Examples
///
/// ```
/// use u_vrp::distance::CostMatrix;
/// use u_vrp::input::Input;
/// use u_vrp::models::{Amount, Job, Location, Vehicle};
///
/// let mut input = Input::new();
/// input
///     .add_vehicle(
///         Vehicle::new(1, Location::new(0))
///             .with_end(Location::new(0))
///             .with_capacity(Amount::new(vec![10])),
///     )
///     .unwrap();
/// for (id, index) in [(1, 1), (2, 2), (3, 3)] {
///     input
///         .add_job(Job::new(id, Location::new(index)).with_amount(Amount::new(vec![3])))
///         .unwrap();
/// }
/// input
///     .set_matrix(
///         CostMatrix::from_rows(vec![
///             vec![0, 1, 2, 3],
///             vec![1, 0, 1, 2],
///             vec![2, 1, 0, 1],
///             vec![3, 2, 1, 0],
///         ])
///         .unwrap(),
///     )
///     .unwrap();
///
/// assert_eq!(input.amount_size(), Some(1));
/// assert!(input.vehicle_ok_with_job(0, 2).unwrap());
///
/// let solution = input.solve(2).unwrap();
/// assert_eq!(solution.num_served(), 3);
/// assert_eq!(solution.summary.cost, 6);
/// ```
pub struct Input {
    start_loading: Instant,
    geometry: bool,
    provider: Option<Box<dyn CostMatrixProvider>>,
    config: SolverConfig,
    phase: Phase,

    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
    job_ids: HashSet<u64>,
    vehicle_ids: HashSet<u64>,
    matrix: Option<CostMatrix>,

    amount_size: Option<usize>,
    amount_lower_bound: Amount,
    has_skills: bool,
    used_indices: BTreeSet<usize>,
    all_locations_have_coords: bool,
    compatibility: Option<CompatibilityMatrix>,
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("jobs", &self.jobs.len())
            .field("vehicles", &self.vehicles.len())
            .field("matrix", &self.matrix.as_ref().map(CostMatrix::size))
            .field("amount_size", &self.amount_size)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Input {
    /// Creates an empty model and starts the loading clock.
    pub fn new() -> Self {
        Self {
            start_loading: Instant::now(),
            geometry: false,
            provider: None,
            config: SolverConfig::default(),
            phase: Phase::Building,
            jobs: Vec::new(),
            vehicles: Vec::new(),
            job_ids: HashSet::new(),
            vehicle_ids: HashSet::new(),
            matrix: None,
            amount_size: None,
            amount_lower_bound: Amount::default(),
            has_skills: false,
            used_indices: BTreeSet::new(),
            all_locations_have_coords: true,
            compatibility: None,
        }
    }

    /// Requests route geometry in the solution.
    pub fn with_geometry(mut self, geometry: bool) -> Self {
        self.geometry = geometry;
        self
    }

    /// Installs the provider used when no matrix is set, and for geometry.
    pub fn with_provider(mut self, provider: Box<dyn CostMatrixProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replaces the solver configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a job.
    ///
    /// # Errors
    ///
    /// - [`Error::ModelFrozen`] once solving began
    /// - [`Error::DuplicateId`] for a job id already registered
    /// - [`Error::DimensionMismatch`] when the demand dimension differs from
    ///   the one fixed by the first amount
    /// - [`Error::InvalidMatrix`] when a matrix is set and the location is
    ///   outside it
    pub fn add_job(&mut self, job: Job) -> Result<()> {
        self.ensure_building()?;
        if self.job_ids.contains(&job.id()) {
            return Err(Error::DuplicateId {
                kind: "job",
                id: job.id(),
            });
        }
        self.check_dimension(job.amount())?;
        self.check_in_matrix(job.location())?;

        self.record_amount(job.amount());
        self.record_location(job.location());
        self.has_skills |= !job.skills().is_empty();
        self.job_ids.insert(job.id());
        self.jobs.push(job);
        Ok(())
    }

    /// Registers a vehicle.
    ///
    /// A vehicle without capacity is unconstrained and does not fix the
    /// amount dimension.
    ///
    /// # Errors
    ///
    /// Same as [`Input::add_job`], checked on the capacity and on both the
    /// start and end locations.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<()> {
        self.ensure_building()?;
        if self.vehicle_ids.contains(&vehicle.id()) {
            return Err(Error::DuplicateId {
                kind: "vehicle",
                id: vehicle.id(),
            });
        }
        if let Some(capacity) = vehicle.capacity() {
            self.check_dimension(capacity)?;
        }
        self.check_in_matrix(vehicle.start())?;
        if let Some(end) = vehicle.end() {
            self.check_in_matrix(end)?;
        }

        if let Some(capacity) = vehicle.capacity() {
            self.record_amount(capacity);
        }
        self.record_location(vehicle.start());
        if let Some(end) = vehicle.end() {
            self.record_location(end);
        }
        self.has_skills |= !vehicle.skills().is_empty();
        self.vehicle_ids.insert(vehicle.id());
        self.vehicles.push(vehicle);
        Ok(())
    }

    /// Installs the cost matrix, indexed by location index.
    ///
    /// # Errors
    ///
    /// [`Error::MatrixAlreadySet`] on a second call, [`Error::InvalidMatrix`]
    /// when a registered location lies outside the matrix, and
    /// [`Error::ModelFrozen`] once solving began.
    pub fn set_matrix(&mut self, matrix: CostMatrix) -> Result<()> {
        self.ensure_building()?;
        if self.matrix.is_some() {
            return Err(Error::MatrixAlreadySet);
        }
        check_indices(&self.used_indices, &matrix)?;
        self.matrix = Some(matrix);
        Ok(())
    }

    /// Amount dimension, `None` until the first amount is registered.
    pub fn amount_size(&self) -> Option<usize> {
        self.amount_size
    }

    /// Component-wise minimum of zero and every registered amount.
    ///
    /// Empty until the dimension is fixed.
    pub fn get_amount_lower_bound(&self) -> Amount {
        self.amount_lower_bound.clone()
    }

    /// Returns `true` if vehicle `v` may serve job `j` (catalog indices).
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when either index is out of bounds.
    pub fn vehicle_ok_with_job(&self, v: usize, j: usize) -> Result<bool> {
        if v >= self.vehicles.len() {
            return Err(Error::IndexOutOfRange {
                index: v,
                len: self.vehicles.len(),
            });
        }
        if j >= self.jobs.len() {
            return Err(Error::IndexOutOfRange {
                index: j,
                len: self.jobs.len(),
            });
        }
        Ok(match &self.compatibility {
            Some(table) => table.get(v, j),
            None => vehicle_ok_with_job(&self.vehicles[v], &self.jobs[j]),
        })
    }

    /// The matrix installed with [`Input::set_matrix`].
    ///
    /// A matrix fetched from the provider only covers the used locations and
    /// is not kept.
    pub fn get_matrix(&self) -> Result<&CostMatrix> {
        self.matrix.as_ref().ok_or(Error::MissingMatrix)
    }

    /// The installed matrix restricted to `indices`, in order.
    pub fn get_sub_matrix(&self, indices: &[usize]) -> Result<CostMatrix> {
        self.get_matrix()?.sub_matrix(indices)
    }

    /// Registered jobs, in insertion order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Registered vehicles, in insertion order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Returns `true` if any job or vehicle declares a skill.
    pub fn has_skills(&self) -> bool {
        self.has_skills
    }

    /// Returns `true` if every registered location has coordinates.
    pub fn all_locations_have_coords(&self) -> bool {
        self.all_locations_have_coords
    }

    /// Location indices referenced by jobs and vehicles, ascending.
    pub fn used_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.used_indices.iter().copied()
    }

    /// Solves the problem with `thread_count` parallel workers.
    ///
    /// The model is frozen by the call, whether it succeeds or not.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidThreadCount`] for zero threads (model left intact)
    /// - [`Error::AlreadySolved`] on a second call
    /// - [`Error::EmptyProblem`] / [`Error::NoVehicle`] on an empty catalog
    /// - [`Error::MissingMatrix`] without matrix nor provider
    /// - [`Error::InvalidMatrix`] when a location lies outside the matrix
    /// - [`Error::CostOverflow`] when route costs could overflow
    /// - [`Error::AmountOverflow`] when summed job amounts could overflow
    /// - [`Error::InfeasibleProblem`] when some job cannot be served
    pub fn solve(&mut self, thread_count: usize) -> Result<Solution> {
        if thread_count == 0 {
            return Err(Error::InvalidThreadCount);
        }
        if self.phase == Phase::Frozen {
            return Err(Error::AlreadySolved);
        }
        self.phase = Phase::Frozen;

        if self.jobs.is_empty() {
            return Err(Error::EmptyProblem);
        }
        if self.vehicles.is_empty() {
            return Err(Error::NoVehicle);
        }
        let indices: Vec<usize> = self.used_indices.iter().copied().collect();
        let sub = match &self.matrix {
            Some(matrix) => {
                check_indices(&self.used_indices, matrix)?;
                matrix.sub_matrix(&indices)?
            }
            None => self.fetch_matrix()?,
        };
        self.check_cost_bound(&sub)?;
        self.check_amount_range()?;
        self.check_amount_bound()?;

        let compatibility = self
            .compatibility
            .insert(CompatibilityMatrix::compute(&self.vehicles, &self.jobs));
        if let Some(j) = compatibility.first_orphan_job() {
            return Err(Error::InfeasibleProblem(format!(
                "no vehicle can serve job {}",
                self.jobs[j].id()
            )));
        }
        let end_loading = Instant::now();
        log::debug!(
            "loaded {} jobs, {} vehicles over {} locations",
            self.jobs.len(),
            self.vehicles.len(),
            indices.len()
        );

        let amount_size = self.amount_size.unwrap_or(0);
        let rank = |i: usize| indices.binary_search(&i).unwrap_or_else(|pos| pos);
        let view = ProblemView::new(
            &self.jobs,
            &self.vehicles,
            compatibility,
            sub,
            rank,
            amount_size,
        );
        let variant = ProblemVariant::select(&self.vehicles, &self.jobs);
        log::info!("solving as {variant:?} with {thread_count} threads");
        let strategy = variant.strategy(&self.config);
        let raw = solver::solve(&view, strategy.as_ref(), thread_count)?;
        let end_solving = Instant::now();

        // a fetched matrix only covers the used locations
        let identity = |i: usize| i;
        let (matrix, row): (&CostMatrix, &dyn Fn(usize) -> usize) = match &self.matrix {
            Some(m) => (m, &identity as &dyn Fn(usize) -> usize),
            None => (view.matrix(), &rank as &dyn Fn(usize) -> usize),
        };
        let options = RouteOptions {
            matrix,
            row,
            provider: self.provider.as_deref(),
            geometry: self.geometry,
            coordinates: self.all_locations_have_coords,
        };
        let routes = format::build_routes(&view, &raw, &options)?;
        let timeline = Timeline {
            start_loading: self.start_loading,
            end_loading,
            end_solving,
            end_routing: Instant::now(),
        };
        let solution = format::solution(routes, amount_size, &timeline);
        log::info!(
            "solution cost {} over {} routes",
            solution.summary.cost,
            solution.summary.routes
        );
        Ok(solution)
    }

    fn ensure_building(&self) -> Result<()> {
        match self.phase {
            Phase::Building => Ok(()),
            Phase::Frozen => Err(Error::ModelFrozen),
        }
    }

    fn check_dimension(&self, amount: &Amount) -> Result<()> {
        match self.amount_size {
            Some(expected) if expected != amount.len() => Err(Error::DimensionMismatch {
                expected,
                found: amount.len(),
            }),
            _ => Ok(()),
        }
    }

    fn check_in_matrix(&self, location: &Location) -> Result<()> {
        match &self.matrix {
            Some(m) if location.index() >= m.size() => Err(out_of_matrix(location.index(), m)),
            _ => Ok(()),
        }
    }

    fn record_amount(&mut self, amount: &Amount) {
        if self.amount_size.is_none() {
            self.amount_size = Some(amount.len());
            self.amount_lower_bound = Amount::zero(amount.len());
        }
        self.amount_lower_bound.min_assign(amount);
    }

    fn record_location(&mut self, location: &Location) {
        self.used_indices.insert(location.index());
        self.all_locations_have_coords &= location.has_coordinates();
    }

    /// Asks the provider for a matrix over the used locations, in ascending
    /// index order.
    fn fetch_matrix(&self) -> Result<CostMatrix> {
        let provider = self.provider.as_deref().ok_or(Error::MissingMatrix)?;
        let locations: Vec<Location> = self
            .jobs
            .iter()
            .map(|j| *j.location())
            .chain(self.vehicles.iter().flat_map(|v| {
                std::iter::once(*v.start()).chain(v.end().copied())
            }))
            .map(|l| (l.index(), l))
            .collect::<BTreeMap<usize, Location>>()
            .into_values()
            .collect();
        let size = locations.len();
        log::debug!("fetching a {size}x{size} matrix from the provider");
        let matrix = provider.cost_matrix(&locations)?;
        if matrix.size() != size {
            return Err(Error::InvalidMatrix(format!(
                "provider returned a {0}x{0} matrix for {size} locations",
                matrix.size()
            )));
        }
        Ok(matrix)
    }

    /// Rejects models whose total route cost could leave the `i64` range
    /// used for move gains.
    ///
    /// Every arc of a solution leaves a job or a vehicle start, and reaches
    /// a job or a vehicle end, so both sums of per-location maxima bound the
    /// total cost.
    fn check_cost_bound(&self, sub: &CostMatrix) -> Result<()> {
        let n = sub.size();
        let mut max_out = vec![0u128; n];
        let mut max_in = vec![0u128; n];
        for (i, out) in max_out.iter_mut().enumerate() {
            for (j, &c) in sub.row(i).iter().enumerate() {
                let c = u128::from(c);
                *out = (*out).max(c);
                max_in[j] = max_in[j].max(c);
            }
        }
        let rank = |index: usize| self.used_indices.range(..index).count();

        let mut departures: u128 = 0;
        let mut arrivals: u128 = 0;
        for job in &self.jobs {
            let r = rank(job.location().index());
            departures += max_out[r];
            arrivals += max_in[r];
        }
        for vehicle in &self.vehicles {
            departures += max_out[rank(vehicle.start().index())];
            if let Some(end) = vehicle.end() {
                arrivals += max_in[rank(end.index())];
            }
        }

        let bound = departures.min(arrivals);
        if bound > MAX_COST_BOUND {
            return Err(Error::CostOverflow(bound));
        }
        Ok(())
    }

    /// Rejects job amounts whose sums could leave the `i64` range.
    ///
    /// Route loads and the solution total add up a subset of jobs, so they
    /// stay between the summed negative and summed positive components.
    fn check_amount_range(&self) -> Result<()> {
        let size = self.amount_size.unwrap_or(0);
        let mut positive = vec![0i128; size];
        let mut negative = vec![0i128; size];
        for job in &self.jobs {
            for (d, &v) in job.amount().as_slice().iter().enumerate().take(size) {
                if v > 0 {
                    positive[d] += i128::from(v);
                } else {
                    negative[d] += i128::from(v);
                }
            }
        }
        let fits = |d: usize| {
            positive[d] <= i128::from(i64::MAX) && negative[d] >= i128::from(i64::MIN)
        };
        match (0..size).find(|&d| !fits(d)) {
            Some(d) => Err(Error::AmountOverflow(d)),
            None => Ok(()),
        }
    }

    /// Rejects fleets whose total capacity cannot carry the total demand.
    ///
    /// Skipped when any vehicle is unconstrained. Together with the
    /// per-job compatibility check that follows, this subsumes a check
    /// against [`Input::get_amount_lower_bound`]: a job no vehicle can carry
    /// on its own is reported as an orphan.
    fn check_amount_bound(&self) -> Result<()> {
        let size = self.amount_size.unwrap_or(0);
        let mut capacity = vec![0i128; size];
        for vehicle in &self.vehicles {
            let Some(c) = vehicle.capacity() else {
                return Ok(());
            };
            for (total, &v) in capacity.iter_mut().zip(c.as_slice()) {
                *total += i128::from(v);
            }
        }
        let mut demand = vec![0i128; size];
        for job in &self.jobs {
            for (total, &v) in demand.iter_mut().zip(job.amount().as_slice()) {
                *total += i128::from(v);
            }
        }
        match (0..size).find(|&d| demand[d] > capacity[d]) {
            Some(d) => Err(Error::InfeasibleProblem(format!(
                "total demand {} exceeds fleet capacity {} in dimension {d}",
                demand[d], capacity[d]
            ))),
            None => Ok(()),
        }
    }
}

fn out_of_matrix(index: usize, matrix: &CostMatrix) -> Error {
    Error::InvalidMatrix(format!(
        "location index {index} outside {0}x{0} matrix",
        matrix.size()
    ))
}

fn check_indices(used: &BTreeSet<usize>, matrix: &CostMatrix) -> Result<()> {
    match used.last() {
        Some(&i) if i >= matrix.size() => Err(out_of_matrix(i, matrix)),
        _ => Ok(()),
    }
}
