//! CLI module graph.

pub mod command;
pub mod config;
pub mod serve;
pub mod solve;
