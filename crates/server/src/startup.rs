use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;
use service::listings::ListingService;
use service::storage::supabase::SupabaseStorage;
use service::store::postgrest::PostgrestStore;
use service::uploads::UploadService;

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

/// Public entry: wire the gateways from configuration, build the app and
/// run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    let cfg = AppConfig::load_and_validate()?;

    let store = Arc::new(PostgrestStore::new(
        &cfg.store.url,
        &cfg.store.service_role_key,
    ));
    let storage = Arc::new(SupabaseStorage::new(
        &cfg.store.url,
        &cfg.store.service_role_key,
    ));
    let state = ServerState {
        listings: ListingService::new(store),
        uploads: UploadService::new(storage),
        admin: cfg.admin.clone(),
    };

    let app: Router = routes::build_router(state, build_cors());

    let addr = load_bind_addr(&cfg.server)?;
    info!(%addr, store = %cfg.store.url, "starting listings server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
