use crate::body::ReqBody;
use crate::error::{BoxError, StatusError};
use crate::helpers::{send_error, write_error_line};
use crate::response::ResponseWriter;
use async_trait::async_trait;
use http::{Request, StatusCode};
use std::future::Future;
use tracing::{debug, error};

/// The error-returning handler shape.
///
/// A handler receives a response handle and the request, does its work,
/// optionally writes a response through one of the helpers, and returns
/// `Ok(())` or an error. It must do one or the other, never both: a handler
/// that writes a response and then also returns an error produces a second
/// write attempt in the adapter (see [`Wrap`]).
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn call(&self, w: ResponseWriter, req: Request<ReqBody>) -> Result<(), BoxError>;
}

/// The plain handler shape the platform dispatches to.
///
/// Routers register values of this contract directly against routes; it has
/// no error channel, which is exactly what [`Wrap`] bridges.
#[async_trait]
pub trait HttpHandler: Send + Sync {
    async fn serve(&self, w: ResponseWriter, req: Request<ReqBody>);
}

#[async_trait]
impl<T: ErrorHandler + ?Sized> ErrorHandler for std::sync::Arc<T> {
    async fn call(&self, w: ResponseWriter, req: Request<ReqBody>) -> Result<(), BoxError> {
        (**self).call(w, req).await
    }
}

/// An [`ErrorHandler`] backed by an async function.
pub struct FnHandler<F> {
    f: F,
}

/// Lifts an async function or closure into an [`ErrorHandler`].
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(ResponseWriter, Request<ReqBody>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxError>> + Send,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut> ErrorHandler for FnHandler<F>
where
    F: Fn(ResponseWriter, Request<ReqBody>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxError>> + Send,
{
    async fn call(&self, w: ResponseWriter, req: Request<ReqBody>) -> Result<(), BoxError> {
        (self.f)(w, req).await
    }
}

/// Adapts an [`ErrorHandler`] into the plain [`HttpHandler`] shape.
///
/// On `Ok(())` the adapter writes nothing: the handler is assumed to have
/// already written (or intentionally declined to write) its response. On an
/// error it writes exactly one failure response:
///
/// - an error that is a [`StatusError`] produces that status with the cause's
///   message as the body;
/// - any other error produces a 500 with the error's message, terminated with
///   a newline the way the platform default error writer frames it.
///
/// The adapter never swallows, retries or enriches an error, and it does not
/// guard against a handler that already wrote a response before failing; in
/// that case the response handle's first-status-wins discipline decides what
/// the client sees.
pub struct Wrap<H> {
    handler: H,
}

impl<H: ErrorHandler> Wrap<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }
}

impl<H: ErrorHandler> From<H> for Wrap<H> {
    fn from(handler: H) -> Self {
        Self::new(handler)
    }
}

#[async_trait]
impl<H: ErrorHandler> HttpHandler for Wrap<H> {
    async fn serve(&self, w: ResponseWriter, req: Request<ReqBody>) {
        let Err(err) = self.handler.call(w.clone(), req).await else {
            return;
        };

        let write_result = match err.downcast_ref::<StatusError>() {
            Some(status_err) => {
                debug!(status = %status_err.status(), "handler failed: {err}");
                send_error(&w, status_err.status(), &err).await
            }
            None => {
                error!("handler failed: {err}");
                write_error_line(&w, StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()).await
            }
        };

        if let Err(write_err) = write_result {
            error!("writing failure response: {write_err}");
        }
    }
}
