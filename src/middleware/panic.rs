use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// Turns a panic inside a handler into a 500 response so the server keeps running.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}
