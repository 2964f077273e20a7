//! A small product catalog served by error-returning handlers.
//!
//! Run with: cargo run --example products

use errhandler::{handler_fn, send_json, HttpHandler, ReqBody, ResponseWriter, StatusError, Wrap};
use http::{Request, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Serialize)]
struct Product {
    id: String,
    name: String,
    price: f64,
}

fn products() -> HashMap<String, Product> {
    HashMap::from([
        (
            "a32fb2bd-b402-4bea-93c2-4a0a567b2261".to_string(),
            Product { id: "a32fb2bd-b402-4bea-93c2-4a0a567b2261".to_string(), name: "a".to_string(), price: 10.99 },
        ),
        (
            "b68ed795-0604-4696-8eb2-5b4b927330a0".to_string(),
            Product { id: "b68ed795-0604-4696-8eb2-5b4b927330a0".to_string(), name: "b".to_string(), price: 20.99 },
        ),
    ])
}

async fn get_products(w: ResponseWriter, _req: Request<ReqBody>) -> Result<(), errhandler::BoxError> {
    send_json(&w, &products()).await?;
    Ok(())
}

async fn get_product(w: ResponseWriter, req: Request<ReqBody>) -> Result<(), errhandler::BoxError> {
    let id = req.uri().path().rsplit('/').next().unwrap_or_default();

    match products().get(id) {
        Some(product) => {
            send_json(&w, product).await?;
            Ok(())
        }
        None => Err(StatusError::msg(StatusCode::NOT_FOUND, format!("no product with id: {id}")).into()),
    }
}

/// Dispatches a request the way a router would and prints the result.
async fn dispatch<H: HttpHandler>(handler: &H, path: &str) {
    let request = Request::builder().uri(path).body(ReqBody::empty()).unwrap();
    let w = ResponseWriter::new();
    handler.serve(w.clone(), request).await;

    let response = w.into_response().await;
    println!("GET {path} -> {} {}", response.status(), String::from_utf8_lossy(response.body()));
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let list = Wrap::new(handler_fn(get_products));
    let get = Wrap::new(handler_fn(get_product));

    dispatch(&list, "/products").await;
    dispatch(&get, "/products/a32fb2bd-b402-4bea-93c2-4a0a567b2261").await;
    dispatch(&get, "/products/missing").await;
}
