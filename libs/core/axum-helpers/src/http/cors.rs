use axum::http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::CorsLayer;

/// Creates a CORS layer restricted to one origin.
///
/// Allows the verbs the blog API serves plus `Content-Type` and `Authorization`
/// headers, cached by browsers for an hour.
pub fn create_cors_layer(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Creates a permissive CORS layer that allows any origin.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Restricted layer when an origin is configured, permissive otherwise.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, String> {
    match allowed_origin {
        Some(origin) => HeaderValue::from_str(origin)
            .map(create_cors_layer)
            .map_err(|e| format!("invalid CORS origin {origin:?}: {e}")),
        None => Ok(create_permissive_cors_layer()),
    }
}
