//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Architecture
//!
//! ```text
//!   ┌──────────────┐     ┌─────────────────────────┐     ┌──────────────┐
//!   │ Frame stream │────▶│ Application             │────▶│ LP engine    │
//!   │ (stdio, TCP) │     │ builder / Monte Carlo   │     │ (HiGHS)      │
//!   └──────────────┘     └─────────────────────────┘     └──────────────┘
//!      FrameChannel                                          Solver
//! ```
//!
//! # Available Ports
//!
//! - [`FrameChannel`] - Length-delimited request/response transport
//! - [`Solver`] - LP optimization backend

pub mod inbound;
pub mod outbound;

pub use inbound::channel::FrameChannel;
pub use outbound::solver::{LpProblem, LpSolution, OptimizationSense, SolutionStatus, Solver};
