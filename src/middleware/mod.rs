pub mod panic;
pub mod request_logger;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use panic::handle_panic;
pub use request_logger::request_logger_middleware;

/// Permissive CORS unless a comma-separated origin list is configured.
pub fn cors_layer(allowed_origins: Option<&str>) -> anyhow::Result<CorsLayer> {
    let Some(raw) = allowed_origins else {
        return Ok(CorsLayer::permissive());
    };

    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        anyhow::bail!("CORS_ALLOWED_ORIGINS must be a comma-separated list of origins");
    }

    Ok(CorsLayer::new().allow_origin(AllowOrigin::list(origins)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_permissive_by_default() {
        assert!(cors_layer(None).is_ok());
    }

    #[test]
    fn test_cors_layer_origin_list() {
        assert!(cors_layer(Some("https://a.example, https://b.example")).is_ok());
        assert!(cors_layer(Some(" , ")).is_err());
        assert!(cors_layer(Some("https://bad\norigin")).is_err());
    }
}
