use crate::errors::AppError;
use crate::handlers::{self, AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// CORS policy for browser callers.
///
/// Preflight requests get an empty response. With an explicit origin list
/// the matching origin is echoed and credentials are allowed; an empty list
/// allows any origin without credentials.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// Routes that do real work and sit behind the body limit (and, in the
/// binary, the rate limiter).
pub fn scoring_routes(max_body_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/leads",
            post(handlers::score_leads).fallback(handlers::method_not_allowed),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
}

/// Rewrites the plain-text 413 and 429 bodies produced by the body limit
/// and the rate limiter into the `{"error": ...}` shape. Headers such as
/// `retry-after` are kept.
pub async fn json_error_bodies(response: Response) -> Response {
    let error = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
        StatusCode::TOO_MANY_REQUESTS => AppError::TooManyRequests,
        _ => return response,
    };

    let (parts, _) = response.into_parts();
    let mut rewritten = error.into_response();
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            rewritten.headers_mut().insert(name.clone(), value.clone());
        }
    }
    rewritten
}

/// Adds the health check, state, tracing and CORS around `routes`.
pub fn finish(routes: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route(
            "/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        .merge(routes)
        .with_state(state)
        .layer(middleware::map_response(json_error_bodies))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Full application router without rate limiting.
pub fn build_router(state: Arc<AppState>) -> Router {
    let routes = scoring_routes(state.config.max_body_bytes);
    finish(routes, state)
}
