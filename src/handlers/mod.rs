pub mod face_recognition;

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Greeting {
    #[serde(rename = "Hi!")]
    pub hi: &'static str,
}

/// Root page, doubles as a liveness check.
pub async fn root() -> Json<Greeting> {
    Json(Greeting {
        hi: "This is a Rust dev server for the face recognition API",
    })
}
