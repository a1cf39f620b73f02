//! Handler for the `serve` command.
//!
//! Without `--listen` the worker reads frames from stdin and writes responses
//! to stdout. With `--listen` it accepts TCP connections and serves each one
//! on a blocking task; the scenario loop is CPU-bound and must stay off the
//! async workers.

use std::io::{self, BufReader, BufWriter};
use std::net::TcpStream;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::adapter::inbound::wire::{StreamChannel, Worker};
use crate::error::{ProtocolError, Result};

/// Pause after a failed accept so fd exhaustion does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Serve until stdin closes or, in TCP mode, until the task is cancelled.
pub async fn execute(worker: Worker, listen: Option<&str>, max_frame_bytes: usize) -> Result<()> {
    match listen {
        Some(addr) => serve_tcp(worker, addr, max_frame_bytes).await,
        None => serve_stdio(worker, max_frame_bytes).await,
    }
}

async fn serve_stdio(worker: Worker, max_frame_bytes: usize) -> Result<()> {
    info!("serving on stdio");
    let served = tokio::task::spawn_blocking(move || {
        let mut channel = StreamChannel::new(
            io::stdin().lock(),
            BufWriter::new(io::stdout().lock()),
            max_frame_bytes,
        );
        worker.serve(&mut channel)
    })
    .await
    .map_err(io::Error::other)??;
    info!(served, "stdin closed");
    Ok(())
}

async fn serve_tcp(worker: Worker, addr: &str, max_frame_bytes: usize) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    accept_loop(worker, listener, max_frame_bytes).await
}

async fn accept_loop(worker: Worker, listener: TcpListener, max_frame_bytes: usize) -> Result<()> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        let stream = match stream.into_std() {
            Ok(stream) => stream,
            Err(e) => {
                warn!(%peer, error = %e, "connection setup failed");
                continue;
            }
        };
        let worker = worker.clone();
        info!(%peer, "connection accepted");
        tokio::task::spawn_blocking(move || {
            match serve_connection(&worker, stream, max_frame_bytes) {
                Ok(served) => info!(%peer, served, "connection closed"),
                Err(e) => warn!(%peer, error = %e, "connection dropped"),
            }
        });
    }
}

fn serve_connection(
    worker: &Worker,
    stream: TcpStream,
    max_frame_bytes: usize,
) -> std::result::Result<u64, ProtocolError> {
    // Tokio hands over sockets in non-blocking mode.
    stream.set_nonblocking(false)?;
    let reader = BufReader::new(stream.try_clone()?);
    let mut channel = StreamChannel::new(reader, BufWriter::new(stream), max_frame_bytes);
    worker.serve(&mut channel)
}
