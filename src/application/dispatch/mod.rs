//! Single-solve pipeline: LP model builder and solve service.

pub mod builder;
pub mod solve;

pub use builder::{build, ConstraintRows, LpFormulation};
pub use solve::DispatchSolver;
