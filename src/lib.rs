//! # u-vrp
//!
//! Vehicle routing problem model and local-search solver. Jobs with
//! multi-dimensional demands and required skills are assigned to vehicles
//! with capacities and skills, then sequenced to minimize travel cost.
//!
//! ## Modules
//!
//! - [`input`] — Problem model (`Input`), compatibility, solution formatting
//! - [`models`] — Domain types (Job, Vehicle, Amount, SkillSet, Solution)
//! - [`distance`] — Cost matrix and cost-matrix providers
//! - [`problems`] — Variant selection and routing strategies
//! - [`constructive`] — Nearest-neighbor and cheapest-insertion construction
//! - [`local_search`] — 2-opt, Or-opt, relocate, swap and 2-opt* operators
//! - [`solver`] — Parallel workers and VNS perturbation
//! - [`evaluation`] — Solution feasibility checking
//!
//! ## Example
//!
//! ```
//! use u_vrp::distance::CostMatrix;
//! use u_vrp::input::Input;
//! use u_vrp::models::{Amount, Job, Location, Vehicle};
//!
//! let mut input = Input::new();
//! for id in 0..2 {
//!     input
//!         .add_vehicle(
//!             Vehicle::new(id, Location::new(0))
//!                 .with_end(Location::new(0))
//!                 .with_capacity(Amount::new(vec![10])),
//!         )
//!         .unwrap();
//! }
//! for index in 1..=3 {
//!     input
//!         .add_job(Job::new(index as u64, Location::new(index)).with_amount(Amount::new(vec![4])))
//!         .unwrap();
//! }
//! let rows = (0..4usize)
//!     .map(|i| (0..4usize).map(|j| i.abs_diff(j) as u64 * 10).collect())
//!     .collect();
//! input.set_matrix(CostMatrix::from_rows(rows).unwrap()).unwrap();
//!
//! let solution = input.solve(2).unwrap();
//! assert_eq!(solution.num_served(), 3);
//! assert!(solution.routes.iter().all(|r| r.amount[0] <= 10));
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod input;
pub mod local_search;
pub mod models;
pub mod problems;
pub mod solver;

pub use error::{Error, Result};
