use crate::error::SendError;
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode};
use std::io;
use std::mem;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

/// A buffered response handle.
///
/// `ResponseWriter` is the mutable side of the handler contract: handlers and
/// response helpers write the status line, headers and body through it, and
/// the platform finalizes it into an [`http::Response`] once the handler
/// chain returns. The handle is cheap to clone; clones share the same
/// underlying response state.
///
/// The status line follows a first-write-wins discipline: once a status has
/// been written, later status writes are ignored. Body writes append. This is
/// what makes the double-write hazard (a handler that writes a response *and*
/// returns an error) deterministic rather than detected: the first status
/// stands and the failure body is appended after the partial one.
#[derive(Debug, Clone)]
pub struct ResponseWriter {
    inner: Arc<Mutex<State>>,
}

#[derive(Debug)]
struct State {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
    closed: bool,
}

impl ResponseWriter {
    pub fn new() -> Self {
        let state = State { status: None, headers: HeaderMap::new(), body: BytesMut::new(), closed: false };
        Self { inner: Arc::new(Mutex::new(state)) }
    }

    /// Inserts a response header, replacing any previous value.
    pub async fn insert_header(&self, name: HeaderName, value: HeaderValue) {
        let mut state = self.inner.lock().await;
        state.headers.insert(name, value);
    }

    /// Writes the status line.
    ///
    /// Only the first status write takes effect; later ones are ignored.
    pub async fn write_status(&self, status: StatusCode) {
        let mut state = self.inner.lock().await;
        if state.status.is_some() {
            warn!(%status, "superfluous status write ignored");
            return;
        }
        state.status = Some(status);
    }

    /// Appends bytes to the response body.
    ///
    /// An unset status is written as 200 first, so a body-only handler still
    /// produces a well-formed response. Fails once the client side of the
    /// connection is gone.
    pub async fn write(&self, data: &[u8]) -> Result<(), SendError> {
        let mut state = self.inner.lock().await;
        if state.closed {
            return Err(SendError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "connection closed by peer")));
        }
        if state.status.is_none() {
            state.status = Some(StatusCode::OK);
        }
        state.body.extend_from_slice(data);
        Ok(())
    }

    /// Marks the underlying transport as gone. Subsequent body writes fail.
    pub async fn close(&self) {
        let mut state = self.inner.lock().await;
        state.closed = true;
    }

    /// Returns the status written so far, if any.
    pub async fn status(&self) -> Option<StatusCode> {
        let state = self.inner.lock().await;
        state.status
    }

    /// Returns a snapshot of the headers written so far.
    pub async fn headers(&self) -> HeaderMap {
        let state = self.inner.lock().await;
        state.headers.clone()
    }

    /// Returns a snapshot of the body written so far.
    pub async fn body(&self) -> Bytes {
        let state = self.inner.lock().await;
        Bytes::copy_from_slice(&state.body)
    }

    /// Finalizes the recorded state into a response.
    ///
    /// A response that never got a status line becomes a 200 with an empty
    /// body, matching the platform convention for handlers that decline to
    /// write anything.
    pub async fn into_response(self) -> Response<Bytes> {
        let mut state = self.inner.lock().await;
        let mut response = Response::new(mem::take(&mut state.body).freeze());
        *response.status_mut() = state.status.take().unwrap_or(StatusCode::OK);
        *response.headers_mut() = mem::take(&mut state.headers);
        response
    }
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}
