use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{middleware, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use common::types::Health;

use crate::auth;
use crate::state::ServerState;

pub mod listings;
pub mod uploads;

/// Generous multipart ceiling; the upload gateway applies the real 5 MiB
/// limit itself so oversize files get its JSON 413.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public pages, the JSON API, and the
/// Basic-auth-gated admin console.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public_pages = ServeDir::new("frontend/public")
        .fallback(ServeFile::new("frontend/public/index.html"));

    let admin_pages = Router::new()
        .fallback_service(
            ServeDir::new("frontend/admin").fallback(ServeFile::new("frontend/admin/index.html")),
        )
        .layer(middleware::from_fn_with_state(
            state.admin.clone(),
            auth::require_basic_auth,
        ));

    let api = Router::new()
        .route(
            "/api/listings",
            get(listings::search_listings).post(listings::create_listing),
        )
        .route(
            "/api/listings/:id",
            get(listings::get_listing)
                .patch(listings::update_listing)
                .delete(listings::delete_listing),
        )
        .route(
            "/api/uploads",
            get(uploads::probe).post(uploads::upload_image),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .nest("/admin", admin_pages)
        .fallback_service(public_pages)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
