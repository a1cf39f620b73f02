//! Dispatch optimizer - LP dispatch and correlated Monte Carlo risk worker.
//!
//! A long-lived numerical worker for a commodity trading desk. It decodes a
//! binary model descriptor (routes, constraints, perturbation specs), solves
//! the resulting linear program against HiGHS, and runs correlated Monte Carlo
//! simulation over the same model to produce a profit/risk distribution and a
//! sensitivity ranking.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Model descriptor, LP rows, results, hard limits
//! - **`port`** - Solver and frame-channel traits
//! - **`application`** - LP builder, solve translation, Monte Carlo engine
//! - **`adapter`** - Binary wire protocol, CLI, HiGHS backend
//! - **`infrastructure`** - Configuration, logging, wiring
//!
//! # Objectives
//!
//! - `MaxProfit` / `MinCost` - plain LPs over route margins or unit costs
//! - `MaxRoi` - linear-fractional, solved via Charnes–Cooper substitution
//! - `CvarAdjusted` / `MinRisk` - tail-risk objectives; a single solve uses the
//!   point estimate with a zero CVaR term
//!
//! # Example
//!
//! ```no_run
//! use dispatch_optimizer::infrastructure::bootstrap::build_service;
//! use dispatch_optimizer::infrastructure::config::settings::Config;
//!
//! let service = build_service(&Config::default());
//! assert_eq!(service.max_scenarios(), 10_000);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
