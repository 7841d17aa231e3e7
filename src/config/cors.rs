use axum::http::{header, HeaderValue, Method};
use std::env;
use tower_http::cors::{AllowOrigin, CorsLayer};

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

pub fn create_cors_layer() -> CorsLayer {
    let origins_str =
        env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string());
    cors_layer_for(&origins_str)
}

fn cors_layer_for(origins_str: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS));

    let origins = parse_origins(origins_str);
    if origins.is_empty() {
        // Wildcard origins cannot be combined with credentials.
        tracing::warn!(
            "CORS: No valid origins configured, using permissive settings for development"
        );
        layer.allow_origin(AllowOrigin::any())
    } else {
        tracing::info!("CORS: Configured with {} allowed origin(s)", origins.len());
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

fn parse_origins(origins_str: &str) -> Vec<HeaderValue> {
    origins_str
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => {
                tracing::debug!("CORS: Allowing origin: {}", origin);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}
