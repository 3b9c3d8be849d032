pub mod adapters;
pub mod cli;
pub mod comparison;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod startup;
pub mod storage;
pub mod use_cases;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::use_cases::CompareFaces;

#[derive(Clone)]
pub struct AppState {
    pub compare_faces: Arc<CompareFaces>,
    /// Request body cap; `None` accepts uploads of any size.
    pub max_upload_bytes: Option<usize>,
}

impl AppState {
    pub fn new(compare_faces: CompareFaces, max_upload_bytes: Option<usize>) -> Self {
        Self {
            compare_faces: Arc::new(compare_faces),
            max_upload_bytes,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = match state.max_upload_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/face-recognition",
            post(handlers::face_recognition::face_recognition),
        )
        .layer(body_limit)
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(axum::middleware::from_fn(
            middleware::request_logger_middleware,
        ))
        .with_state(state)
}
