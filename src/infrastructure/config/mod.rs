//! Infrastructure configuration modules.

pub mod logging;
pub mod monte_carlo;
pub mod settings;
pub mod worker;
