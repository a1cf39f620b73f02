//! Outbound adapters (driven side).

pub mod solver;
