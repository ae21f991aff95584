use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::database::models::{AddOn, Category, OrderType, Outlet, TenantWritable};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

const CORS_MAX_AGE_SECS: u64 = 86_400;

/// Full application router with global layers applied.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    let mut router = with_request_timeout(router, Duration::from_secs(config.api.request_timeout_secs))
        .layer(cors_layer(&config.security.cors_origins));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use axum::routing::post;
    use public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/whoami", get(protected::auth::whoami_get))
        .merge(catalog_routes::<Category>("/api/categories"))
        .merge(catalog_routes::<AddOn>("/api/add-ons"))
        .merge(catalog_routes::<OrderType>("/api/order-types"))
        .merge(catalog_routes::<Outlet>("/api/outlets"))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn catalog_routes<T: TenantWritable>(base: &str) -> Router<AppState> {
    use protected::catalog;

    Router::new()
        .route(base, get(catalog::list::<T>).post(catalog::create::<T>))
        .route(
            &format!("{}/:id", base),
            get(catalog::show::<T>)
                .put(catalog::update::<T>)
                .delete(catalog::destroy::<T>),
        )
}

/// Aborts requests that run past `timeout` and answers with the error envelope.
fn with_request_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::map_response(timeout_envelope))
}

// TimeoutLayer answers with an empty 408; no handler produces that status itself.
async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::request_timeout("Request timed out").into_response();
    }
    response
}

/// `*` allows any origin; otherwise only the listed origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(CORS_MAX_AGE_SECS))
}
