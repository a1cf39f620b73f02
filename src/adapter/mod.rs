//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Binary wire protocol and command-line interface
//! - [`outbound`] - LP engine backends

pub mod inbound;
pub mod outbound;
