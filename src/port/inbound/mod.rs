//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`channel`]: Framed request/response channel driven by the worker loop

pub mod channel;
