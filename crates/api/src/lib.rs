//! Pressroom HTTP API
//!
//! Routing, request parsing and response shaping for the content API.
//! Business rules live in `pressroom_common::services`.

pub mod extract;
pub mod handlers;
pub mod middleware;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use pressroom_common::{auth::JwtManager, config::AppConfig, db::DbPool, media::MediaStore};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use handlers::{articles, categories, health, media, sections, tags};

/// Application state shared across handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub jwt: Arc<JwtManager>,
    pub media: Arc<MediaStore>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool, jwt: JwtManager) -> Self {
        let media = MediaStore::from_config(&config.media);
        Self {
            config: Arc::new(config),
            db,
            jwt: Arc::new(jwt),
            media: Arc::new(media),
        }
    }
}

/// Create the main application router
pub fn create_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let config = state.config.clone();

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Read endpoints (no auth)
    let public_routes = Router::new()
        .route("/articles/", get(articles::list_articles))
        .route("/articles/{slug}", get(articles::get_article))
        .route("/articles/id/{id}", get(articles::get_article_by_id))
        .route("/categories/", get(categories::list_categories))
        .route("/categories/{slug}", get(categories::get_category))
        .route("/categories/{slug}/articles", get(categories::category_articles))
        .route("/categories/id/{id}", get(categories::get_category_by_id))
        .route("/tags/", get(tags::list_tags))
        .route("/tags/{slug}", get(tags::get_tag))
        .route("/tags/{slug}/articles", get(tags::tag_articles))
        .route("/tags/id/{id}", get(tags::get_tag_by_id))
        .route("/media/", get(media::list_media))
        .route("/media/{id}", get(media::get_media))
        .route("/homepage_sections/", get(sections::list_sections))
        .route("/homepage_sections/{id}", get(sections::get_section))
        .route("/homepage_sections/key/{key}", get(sections::get_section_by_key))
        .route(
            "/homepage_section_items/section/{section_id}",
            get(sections::list_section_items),
        );

    // Mutating endpoints (admin role)
    let admin_routes = Router::new()
        .route("/articles/", post(articles::create_article))
        .route(
            "/articles/id/{id}",
            put(articles::update_article).delete(articles::delete_article),
        )
        .route("/categories/", post(categories::create_category))
        .route(
            "/categories/id/{id}",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route("/tags/", post(tags::create_tag))
        .route("/tags/id/{id}", put(tags::update_tag).delete(tags::delete_tag))
        .route(
            "/media/upload",
            post(media::upload_media).layer(DefaultBodyLimit::max(config.media.max_upload_bytes)),
        )
        .route("/media/{id}", axum::routing::delete(media::delete_media))
        .route("/homepage_sections/", post(sections::create_section))
        .route(
            "/homepage_sections/{id}",
            put(sections::update_section).delete(sections::delete_section),
        )
        .route("/homepage_section_items/", post(sections::create_section_item))
        .route(
            "/homepage_section_items/{id}",
            axum::routing::delete(sections::delete_section_item),
        )
        .route_layer(from_fn_with_state(state.clone(), middleware::auth::admin_only));

    let api_routes = public_routes.merge(admin_routes);

    let mut app = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .nest("/api", api_routes);

    if let Some(handle) = metrics {
        app = app.route("/metrics", get(move || std::future::ready(handle.render())));
    }

    // Uploaded files and other static assets
    let static_prefix = match config.media.static_url_prefix.trim_end_matches('/') {
        "" => "/static",
        prefix => prefix,
    };
    app = app.route(&format!("{}/{{*path}}", static_prefix), get(media::serve_file));

    // Compose the app
    app.layer(from_fn(middleware::metrics::track_metrics))
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}
