//! JSON in and out of the HTTP layer.
//!
//! Inbound bodies decode into an untyped `serde_json::Value`. Outbound
//! documents are either handed to `axum::Json` in one piece, or written
//! chunk by chunk through a `ChunkWriter` into a streamed response body.

use std::io;

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Request},
};
use futures_util::{pin_mut, Stream, TryStreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Request document. `None` when the request carried no body.
///
/// A body that is not UTF-8 JSON rejects the request with `MalformedJson`
/// before the handler runs.
#[derive(Debug)]
pub struct JsonBody(pub Option<Value>);

#[axum::async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Body {
                status: e.status(),
                message: e.body_text(),
            })?;
        decode(&bytes).map(JsonBody)
    }
}

/// Empty input means "no document". serde_json rejects invalid UTF-8 too.
pub fn decode(bytes: &[u8]) -> Result<Option<Value>> {
    if bytes.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(AppError::MalformedJson)
}

// ---------------------------------------------------------------------------
// Outbound, streamed
// ---------------------------------------------------------------------------

type Chunk = std::result::Result<Bytes, io::Error>;

/// Producer half of a streamed response body.
///
/// Each write waits for channel capacity, so a slow client slows the producer
/// down instead of letting chunks pile up in memory.
pub struct ChunkWriter {
    tx: mpsc::Sender<Chunk>,
}

/// Creates a streamed body and the writer that feeds it. The body ends when
/// the writer is dropped.
pub fn streamed_body(capacity: usize) -> (ChunkWriter, Body) {
    let (tx, rx) = mpsc::channel::<Chunk>(capacity);
    let chunks = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (chunk, rx))
    });
    (ChunkWriter { tx }, Body::from_stream(chunks))
}

impl ChunkWriter {
    /// Writes literal JSON syntax such as `{"stats":`.
    pub async fn raw(&self, token: &'static str) -> Result<()> {
        self.send(Bytes::from_static(token.as_bytes())).await
    }

    /// Encodes `value` in one piece.
    pub async fn value<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let buf = serde_json::to_vec(value)?;
        self.send(Bytes::from(buf)).await
    }

    /// Writes a JSON object whose entries are pulled from `entries` one at a
    /// time. Returns the number of entries written.
    pub async fn map<S, V>(&self, entries: S) -> Result<usize>
    where
        S: Stream<Item = Result<(String, V)>>,
        V: Serialize,
    {
        pin_mut!(entries);
        self.raw("{").await?;

        let mut count = 0usize;
        while let Some((key, value)) = entries.try_next().await? {
            let mut buf = Vec::with_capacity(64);
            if count > 0 {
                buf.push(b',');
            }
            serde_json::to_writer(&mut buf, &key)?;
            buf.push(b':');
            serde_json::to_writer(&mut buf, &value)?;
            self.send(Bytes::from(buf)).await?;
            count += 1;
        }

        self.raw("}").await?;
        Ok(count)
    }

    /// Ends the body with an error so the client sees a broken transfer
    /// rather than a silently truncated document.
    pub async fn abort(&self, err: &AppError) {
        if self.tx.send(Err(io::Error::other(err.to_string()))).await.is_err() {
            debug!("Client already gone, stream error not delivered");
        }
    }

    async fn send(&self, chunk: Bytes) -> Result<()> {
        self.tx.send(Ok(chunk)).await.map_err(|_| AppError::ClientGone)
    }
}
