//! Driving adapters: how requests reach the application.

pub mod cli;
pub mod wire;
