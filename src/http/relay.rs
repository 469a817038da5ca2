//! Streaming of upstream response bodies to the client.
//!
//! # Responsibilities
//! - Read the upstream body frame by frame
//! - Hand it to the client connection in chunks of at most [`CHUNK_SIZE`]
//! - Stop on end of stream, on client disconnect, or on upstream failure
//!
//! # Design Decisions
//! - A capacity-1 channel sits between the pump and the client body, so at
//!   most one chunk is in flight and the client's pace throttles the upstream
//!   read
//! - hyper writes and flushes each chunk as soon as the client body yields
//!   it, which keeps event streams low-latency
//! - Client disconnect is detected both on send and while waiting for the
//!   next upstream frame; it is not an error
//! - The upstream body is owned by the pump and dropped when it returns,
//!   which releases the upstream connection on every exit path

use std::io;

use axum::body::Bytes;
use http_body_util::BodyExt;
use hyper::body::Body as HttpBody;
use tokio::sync::mpsc;

/// Maximum bytes handed to the client in one write.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Items consumed by the client-facing body.
pub type ChunkSender = mpsc::Sender<Result<Bytes, io::Error>>;

/// How a relay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Upstream body reached end of stream and every byte was handed over.
    Completed { bytes: u64 },
    /// The client went away before the body finished.
    ClientGone { bytes: u64 },
    /// Reading the upstream body failed; the client connection is aborted.
    UpstreamFailed { bytes: u64 },
}

impl RelayOutcome {
    pub fn bytes(&self) -> u64 {
        match *self {
            RelayOutcome::Completed { bytes }
            | RelayOutcome::ClientGone { bytes }
            | RelayOutcome::UpstreamFailed { bytes } => bytes,
        }
    }
}

/// Copy `body` into `tx` chunk by chunk until one side is done.
///
/// Trailers from upstream are discarded.
pub async fn pump<B>(mut body: B, tx: ChunkSender) -> RelayOutcome
where
    B: HttpBody<Data = Bytes> + Unpin,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut bytes = 0u64;

    loop {
        let frame = tokio::select! {
            biased;
            _ = tx.closed() => return RelayOutcome::ClientGone { bytes },
            frame = body.frame() => frame,
        };

        let frame = match frame {
            None => return RelayOutcome::Completed { bytes },
            Some(Ok(frame)) => frame,
            Some(Err(e)) => {
                let err = io::Error::other(e);
                tracing::warn!(error = %err, bytes, "Upstream body read failed");
                // The client may already be gone; either way we are done.
                let _ = tx.send(Err(err)).await;
                return RelayOutcome::UpstreamFailed { bytes };
            }
        };

        let Ok(mut data) = frame.into_data() else {
            continue;
        };

        while !data.is_empty() {
            let chunk = data.split_to(data.len().min(CHUNK_SIZE));
            let len = chunk.len() as u64;
            if tx.send(Ok(chunk)).await.is_err() {
                return RelayOutcome::ClientGone { bytes };
            }
            bytes += len;
        }
    }
}
