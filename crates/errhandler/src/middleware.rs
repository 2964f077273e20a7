//! Middleware over error-returning handlers.
//!
//! A middleware transforms one handler into another of the same shape, so
//! layers nest: the first middleware in a chain observes the request first on
//! the way in and the response last on the way out. Composition is a pure
//! function of the declared order; there is no shared state between chain
//! invocations. State captured by a middleware closure is shared across every
//! request that passes through it and must be concurrency-safe.

use crate::body::ReqBody;
use crate::error::BoxError;
use crate::handler::{handler_fn, ErrorHandler};
use crate::response::ResponseWriter;
use http::Request;
use std::future::Future;
use std::sync::Arc;

/// A shared error-returning handler, as passed between middleware layers.
pub type Next = Arc<dyn ErrorHandler>;

/// A transformation from one handler to another of the same shape.
pub type Middleware = Arc<dyn Fn(Next) -> Next + Send + Sync>;

/// Lifts a closure into a [`Middleware`].
pub fn middleware_fn<F>(f: F) -> Middleware
where
    F: Fn(Next) -> Next + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Lifts an async function into a [`Next`], for middleware bodies that wrap
/// the inner handler in a closure of their own.
pub fn next_fn<F, Fut>(f: F) -> Next
where
    F: Fn(ResponseWriter, Request<ReqBody>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    Arc::new(handler_fn(f))
}

/// Composes an ordered sequence of middleware into a single middleware.
///
/// `chain([m1, m2, ..., mn])` applied to a handler `h` is equivalent to
/// `m1(m2(...mn(h)...))`: declaration order is outer-to-inner wrapping order.
/// An empty chain is the identity middleware.
pub fn chain<I>(middlewares: I) -> Middleware
where
    I: IntoIterator<Item = Middleware>,
{
    let middlewares: Vec<Middleware> = middlewares.into_iter().collect();
    Arc::new(move |handler: Next| {
        middlewares.iter().rev().fold(handler, |next, middleware| middleware(next))
    })
}

#[cfg(test)]
mod tests {
    use super::{chain, middleware_fn, next_fn, Middleware, Next};
    use crate::body::ReqBody;
    use crate::handler::{HttpHandler, Wrap};
    use crate::helpers::send_json;
    use crate::response::ResponseWriter;
    use http::{Method, Request, StatusCode};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct CtxValue(i64);

    fn request() -> Request<ReqBody> {
        Request::builder().method(Method::GET).uri("http://example.com/foo").body(ReqBody::empty()).unwrap()
    }

    /// Echoes the [`CtxValue`] request extension as `{"value": n}`.
    fn echo_value() -> Next {
        next_fn(|w, req| async move {
            let value = req.extensions().get::<CtxValue>().map(|v| v.0);
            send_json(&w, &HashMap::from([("value", value)])).await?;
            Ok(())
        })
    }

    fn inject_value(value: i64) -> Middleware {
        middleware_fn(move |next: Next| {
            next_fn(move |w, mut req| {
                let next = next.clone();
                async move {
                    req.extensions_mut().insert(CtxValue(value));
                    next.call(w, req).await
                }
            })
        })
    }

    fn add_to_value(amount: i64) -> Middleware {
        middleware_fn(move |next: Next| {
            next_fn(move |w, mut req| {
                let next = next.clone();
                async move {
                    let value = req.extensions().get::<CtxValue>().expect("expected a context value").0;
                    req.extensions_mut().insert(CtxValue(value + amount));
                    next.call(w, req).await
                }
            })
        })
    }

    async fn serve(handler: Next) -> (Option<StatusCode>, String) {
        let w = ResponseWriter::new();
        Wrap::new(handler).serve(w.clone(), request()).await;
        let body = String::from_utf8(w.body().await.to_vec()).unwrap();
        (w.status().await, body)
    }

    #[tokio::test]
    async fn single_middleware_injects_context() {
        let handler = inject_value(1)(echo_value());

        let (status, body) = serve(handler).await;
        assert_eq!(status, Some(StatusCode::OK));
        assert_eq!(body, "{\"value\":1}\n");
    }

    #[tokio::test]
    async fn chain_applies_left_to_right() {
        let chained = chain([inject_value(1), add_to_value(2)]);
        let handler = chained(echo_value());

        let (status, body) = serve(handler).await;
        assert_eq!(status, Some(StatusCode::OK));
        assert_eq!(body, "{\"value\":3}\n");
    }

    #[tokio::test]
    async fn chain_matches_manual_nesting() {
        let m1 = inject_value(1);
        let m2 = add_to_value(2);

        let (_, chained_body) = serve(chain([m1.clone(), m2.clone()])(echo_value())).await;
        let (_, nested_body) = serve(m1(m2(echo_value()))).await;
        assert_eq!(chained_body, nested_body);
    }

    #[tokio::test]
    async fn empty_chain_is_identity() {
        let handler = chain([])(echo_value());

        let (status, body) = serve(handler).await;
        assert_eq!(status, Some(StatusCode::OK));
        assert_eq!(body, "{\"value\":null}\n");
    }

    #[tokio::test]
    async fn chain_is_rebuildable() {
        let middlewares = [inject_value(1), add_to_value(2)];

        let (_, first) = serve(chain(middlewares.clone())(echo_value())).await;
        let (_, second) = serve(chain(middlewares)(echo_value())).await;
        assert_eq!(first, "{\"value\":3}\n");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn outer_layer_runs_first_and_finishes_last() {
        let order = Arc::new(Mutex::new(Vec::new()));

        let observe = |name: &'static str| {
            let order = order.clone();
            middleware_fn(move |next: Next| {
                let order = order.clone();
                next_fn(move |w, req| {
                    let next = next.clone();
                    let order = order.clone();
                    async move {
                        order.lock().unwrap().push(format!("{name} in"));
                        let result = next.call(w, req).await;
                        order.lock().unwrap().push(format!("{name} out"));
                        result
                    }
                })
            })
        };

        let handler = chain([observe("outer"), observe("inner")])(next_fn(|_w, _req| async { Ok(()) }));
        serve(handler).await;

        let order = order.lock().unwrap();
        assert_eq!(*order, ["outer in", "inner in", "inner out", "outer out"]);
    }
}
