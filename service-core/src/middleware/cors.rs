use tower_http::cors::{Any, CorsLayer};

/// CORS layer allowing any origin, header and method.
///
/// `OPTIONS` requests are answered by the layer itself; every other response
/// gets `Access-Control-Allow-Origin: *`.
pub fn permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any)
}
