//! Binary wire protocol: framing plus request and response payload codecs.
//!
//! ```text
//! Request:  [u32 length, big-endian][u8 command][payload...]
//! Response: [u32 length, big-endian][u8 status][payload...]
//! ```

pub mod cursor;
pub mod descriptor;
pub mod frame;
pub mod request;
pub mod response;
pub mod server;

pub use descriptor::{decode_descriptor, encode_descriptor, ABSENT};
pub use frame::StreamChannel;
pub use request::{Request, COMMAND_MONTE_CARLO, COMMAND_SOLVE};
pub use response::{decode_monte_carlo_result, decode_solve_result, Response, ResponseStatus};
pub use server::Worker;
