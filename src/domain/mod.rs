//! Transport-agnostic domain types: model descriptors, LP rows, results.

pub mod constraint;
pub mod limits;
pub mod model;
pub mod result;

pub use constraint::{Constraint, ConstraintSense, VariableBounds};
pub use model::{
    ConstraintKind, ConstraintSpec, Correlation, MetricKind, ModelDescriptor, ObjectiveMode,
    Outage, Perturbation, PerturbationKind, Route,
};
pub use result::{
    Distribution, MonteCarloResult, RouteAllocation, Sensitivity, Signal, SolveResult,
    SolveStatus,
};
