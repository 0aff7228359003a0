//! Solution feasibility checking.

mod evaluator;

pub use evaluator::{RouteEvaluator, Violation, ViolationType};
