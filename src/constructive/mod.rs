//! Constructive heuristics for building initial routes.
//!
//! - [`nearest_neighbor_tour`] — Greedy nearest-neighbor tour for one vehicle, O(n²)
//! - [`cheapest_insertion`] — Cheapest feasible insertion over a fleet, O(n²R)

mod insertion;
mod nearest_neighbor;

pub use insertion::cheapest_insertion;
pub use nearest_neighbor::nearest_neighbor_tour;
