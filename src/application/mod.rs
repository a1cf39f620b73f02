//! Application services (use cases).
//!
//! These services orchestrate domain logic and drive the solver port:
//!
//! - [`dispatch`] - LP model builder and single-solve translation
//! - [`montecarlo`] - Scenario generation, parallel solving, aggregation
//! - [`service`] - Validated entry points shared by every transport

pub mod dispatch;
pub mod montecarlo;
pub mod service;

pub use service::DispatchService;
