//! Response and request body helpers.
//!
//! These are the only functions that touch the wire format: JSON bodies are
//! encoded with a trailing newline (stream-encoder framing), plain text is
//! written as-is, failure bodies are the bare error message.

use crate::body::ReqBody;
use crate::error::{ParseError, SendError};
use crate::response::ResponseWriter;
use http::{header, HeaderName, HeaderValue, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;

/// Writes `value` as a JSON response with status 200.
///
/// The status line goes out before the value is encoded, so an encoding
/// failure cannot retract the 200 that was already written; the error is
/// returned to the caller regardless.
pub async fn send_json<T>(w: &ResponseWriter, value: &T) -> Result<(), SendError>
where
    T: Serialize + ?Sized,
{
    w.insert_header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref().parse().unwrap()).await;
    w.write_status(StatusCode::OK).await;

    let mut buf = serde_json::to_vec(value)?;
    buf.push(b'\n');
    w.write(&buf).await
}

/// Writes `message` as a plain text response with status 200.
pub async fn send_string(w: &ResponseWriter, message: &str) -> Result<(), SendError> {
    w.insert_header(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref().parse().unwrap()).await;
    w.write_status(StatusCode::OK).await;
    w.write(message.as_bytes()).await
}

/// Writes a failure response: the given status and the cause's message as the
/// body, without any framing or trailing newline.
///
/// For handlers that want a custom failure response without returning an
/// error up to the adapter.
pub async fn send_error<E>(w: &ResponseWriter, status: StatusCode, cause: &E) -> Result<(), SendError>
where
    E: Display + ?Sized,
{
    w.write_status(status).await;
    w.write(cause.to_string().as_bytes()).await
}

/// Writes a failure response the way the platform default error writer does:
/// plain text content type, nosniff, and a newline-terminated message.
pub(crate) async fn write_error_line(w: &ResponseWriter, status: StatusCode, message: &str) -> Result<(), SendError> {
    w.insert_header(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref().parse().unwrap()).await;
    w.insert_header(HeaderName::from_static("x-content-type-options"), HeaderValue::from_static("nosniff")).await;
    w.write_status(status).await;
    w.write(message.as_bytes()).await?;
    w.write(b"\n").await
}

/// Deserializes the request body as JSON into `T`.
///
/// The body is consumed by this call and cannot be read again.
pub async fn parse_json<T>(req: &Request<ReqBody>) -> Result<T, ParseError>
where
    T: DeserializeOwned,
{
    let bytes = req.body().take().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
