//! Error-returning HTTP handlers, adapted to the plain handler shape.
//!
//! Handlers written against this crate take a response handle and a request
//! and return a `Result`, so failure paths are a `?` instead of inline
//! error-response plumbing. [`Wrap`] adapts such a handler into the plain
//! [`HttpHandler`] contract a router dispatches to, translating a returned
//! error into a status code and body: a [`StatusError`] keeps its explicit
//! status, anything else becomes a 500. [`chain`] composes middleware around
//! the error-returning shape in declaration order.
//!
//! # Example
//!
//! ```
//! use errhandler::{handler_fn, send_json, HttpHandler, ReqBody, ResponseWriter, StatusError, Wrap};
//! use http::{Request, StatusCode};
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() {
//!     let handler = Wrap::new(handler_fn(|w, req| async move {
//!         if req.uri().path() != "/products" {
//!             return Err(StatusError::msg(StatusCode::NOT_FOUND, "no such route").into());
//!         }
//!         send_json(&w, &HashMap::from([("price", 10.99)])).await?;
//!         Ok(())
//!     }));
//!
//!     let w = ResponseWriter::new();
//!     let request = Request::builder().uri("/products").body(ReqBody::empty()).unwrap();
//!     handler.serve(w.clone(), request).await;
//!
//!     assert_eq!(w.status().await, Some(StatusCode::OK));
//!     assert_eq!(w.body().await.as_ref(), b"{\"price\":10.99}\n");
//! }
//! ```

mod body;
mod error;
mod handler;
mod helpers;
mod middleware;
mod response;

pub use body::ReqBody;
pub use error::{BoxError, ParseError, SendError, StatusError};
pub use handler::{handler_fn, ErrorHandler, FnHandler, HttpHandler, Wrap};
pub use helpers::{parse_json, send_error, send_json, send_string};
pub use middleware::{chain, middleware_fn, next_fn, Middleware, Next};
pub use response::ResponseWriter;
