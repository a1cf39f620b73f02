//! Request worker: strict read → process → write loop over a frame channel.

use std::sync::Arc;

use tracing::{debug, warn};

use super::request::Request;
use super::response::Response;
use crate::application::DispatchService;
use crate::error::ProtocolError;
use crate::port::FrameChannel;

/// Serves binary requests against a shared [`DispatchService`].
///
/// One request is in flight per channel. Rejected requests produce an error
/// response and the loop continues; framing errors end the connection.
#[derive(Clone)]
pub struct Worker {
    service: Arc<DispatchService>,
}

impl Worker {
    pub fn new(service: Arc<DispatchService>) -> Self {
        Self { service }
    }

    /// Process one frame body into a response.
    pub fn handle(&self, body: &[u8]) -> Response {
        let outcome = Request::decode(body).and_then(|request| match request {
            Request::Solve { model, vars } => {
                self.service.solve(&model, &vars).map(Response::Solve)
            }
            Request::MonteCarlo {
                scenarios,
                model,
                vars,
            } => self
                .service
                .simulate(&model, &vars, scenarios)
                .map(Response::MonteCarlo),
        });
        outcome.unwrap_or_else(|e| {
            warn!(error = %e, bytes = body.len(), "request rejected");
            Response::Rejected(e)
        })
    }

    /// Serve frames until the peer closes the stream.
    ///
    /// Returns the number of requests answered.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] on malformed framing or stream failure.
    pub fn serve<C: FrameChannel>(&self, channel: &mut C) -> Result<u64, ProtocolError> {
        let mut served = 0;
        while let Some(body) = channel.read_frame()? {
            let response = self.handle(&body);
            channel.write_frame(&response.encode())?;
            served += 1;
            debug!(served, status = ?response.status(), "response sent");
        }
        Ok(served)
    }
}
