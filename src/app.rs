use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{elevated::admin, protected, public};
use crate::state::AppState;

/// Full application router: `/health`, `/uploads/*` and the `/api/v1` tree
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let uploads = ServeDir::new(state.images.root());

    Router::new()
        .route("/health", get(public::health::health))
        .nest("/api/v1", api_routes())
        .nest_service("/uploads", uploads)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config))
                .layer(DefaultBodyLimit::max(config.upload.max_size_bytes)),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes())
        .nest("/admin", admin_routes())
}

fn public_routes() -> Router<AppState> {
    use public::{auth, content, ui};

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/ui", get(ui::screen_get))
        .route("/ui/version", get(ui::version_get))
        .route("/ui/screens", get(ui::screens_get))
        .route("/content/categories", get(content::categories_get))
        .route("/content/brands", get(content::brands_get))
}

fn protected_routes() -> Router<AppState> {
    use protected::auth;

    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}

fn admin_routes() -> Router<AppState> {
    use admin::{cache, content, upload};

    Router::new()
        .route("/upload", post(upload::upload))
        .route("/cache/clear", post(cache::clear))
        .route(
            "/categories",
            get(content::categories_list).post(content::categories_create),
        )
        .route(
            "/categories/:id",
            get(content::categories_show)
                .put(content::categories_update)
                .delete(content::categories_delete),
        )
        .route(
            "/brands",
            get(content::brands_list).post(content::brands_create),
        )
        .route(
            "/brands/:id",
            get(content::brands_show)
                .put(content::brands_update)
                .delete(content::brands_delete),
        )
}

/// Permissive in development or when no origins are configured, otherwise
/// limited to `security.cors_origins`. Disabled CORS sends no CORS headers.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let security: &SecurityConfig = &config.security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if config.is_development() || security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
