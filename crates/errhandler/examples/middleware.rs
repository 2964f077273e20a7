//! Logging middleware chained around an error-returning handler.
//!
//! Run with: cargo run --example middleware

use errhandler::{chain, middleware_fn, next_fn, send_string, HttpHandler, Middleware, Next, ReqBody, ResponseWriter, Wrap};
use http::Request;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// A middleware that logs the request line before handing it on.
fn request_logger(name: &'static str) -> Middleware {
    middleware_fn(move |next: Next| {
        next_fn(move |w, req| {
            let next = next.clone();
            async move {
                info!("{name} {} {}", req.method(), req.uri().path());
                next.call(w, req).await
            }
        })
    })
}

async fn hello(w: ResponseWriter, _req: Request<ReqBody>) -> Result<(), errhandler::BoxError> {
    send_string(&w, "hello world").await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let logged = chain([request_logger("1"), request_logger("2")]);
    let handler = Wrap::new(logged(next_fn(hello)));

    let request = Request::builder().uri("http://localhost:3000/").body(ReqBody::empty()).unwrap();
    let w = ResponseWriter::new();
    handler.serve(w.clone(), request).await;

    let response = w.into_response().await;
    println!("{} {}", response.status(), String::from_utf8_lossy(response.body()));
}
