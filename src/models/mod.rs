//! Domain model types for vehicle routing problems.
//!
//! Jobs with demands and required skills, vehicles with capacity, start/end
//! locations and provided skills, and the solution value returned by
//! [`Input::solve`](crate::input::Input::solve).

mod amount;
mod job;
mod location;
mod skills;
mod solution;
mod vehicle;

pub use amount::Amount;
pub use job::Job;
pub use location::{Coordinates, Location};
pub use skills::SkillSet;
pub use solution::{ComputingTimes, Route, Solution, Step, StepKind, Summary};
pub use vehicle::Vehicle;
