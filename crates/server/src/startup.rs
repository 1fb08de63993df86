use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use common::admin_http::spawn_admin_server;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, DatabaseConfig};
use service::cache::{MokaCacheStore, ReadThroughCache};
use service::notifier::{self, Notifier};
use service::repo::{MemoryStore, SeaOrmStore};
use service::repository::{ProviderRepository, ServiceRepository};
use service::{OfferingService, ProviderService};

use crate::admin;
use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Config file first; without one, defaults overridden by the environment.
fn load_config() -> Result<AppConfig, StartupError> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!(error = %e, "config file unavailable, using environment");
            let mut cfg = AppConfig::from_env();
            cfg.normalize_and_validate()
                .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
            Ok(cfg)
        }
    }
}

/// Postgres (migrated to the latest schema) or the in-process store for `memory://`.
pub async fn open_store(
    cfg: &DatabaseConfig,
) -> anyhow::Result<(Arc<dyn ProviderRepository>, Arc<dyn ServiceRepository>)> {
    if cfg.is_memory() {
        info!("using in-memory store");
        let store = Arc::new(MemoryStore::new());
        return Ok((store.clone(), store));
    }
    let db = models::db::connect_with_config(cfg).await?;
    migration::Migrator::up(&db, None).await?;
    let store = Arc::new(SeaOrmStore::new(db));
    Ok((store.clone(), store))
}

/// Wire the resource services around one shared cache.
pub fn build_state(
    cfg: &AppConfig,
    providers: Arc<dyn ProviderRepository>,
    services: Arc<dyn ServiceRepository>,
    notifier: Arc<dyn Notifier>,
) -> AppState {
    let cache = ReadThroughCache::new(Arc::new(MokaCacheStore::from_config(&cfg.cache)));
    let provider_service = ProviderService::new(providers.clone(), cache.clone(), notifier.clone());
    let offering_service =
        OfferingService::new(services, providers, cache.clone(), notifier, cfg.mail.admin_recipient.clone());
    AppState {
        providers: Arc::new(provider_service),
        offerings: Arc::new(offering_service),
        cache,
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;
    let (providers, services) = open_store(&cfg.database).await?;
    let notifier = notifier::from_config(&cfg.mail);
    let state = build_state(&cfg, providers, services, notifier);

    spawn_admin_server(&cfg.admin.addr, admin::admin_routes(state.cache.clone())).await?;

    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, ttl_secs = cfg.cache.ttl_secs, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
