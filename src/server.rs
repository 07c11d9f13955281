//! HTTP server initialization and runtime setup.
//!
//! Wires the connection pool, migrations, repositories, services, the
//! click worker and the Axum server lifecycle.

use crate::config::Config;
use crate::domain::click_worker::{ClickRecorder, run_click_worker};
use crate::infrastructure::geoip::{GeoResolver, IpApiResolver, NullGeoResolver};
use crate::infrastructure::page_title::HttpTitleProber;
use crate::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgTokenRepository, PgUserRepository,
};
use crate::routes::app_router;
use crate::state::AppState;
use crate::application::services::{AuthService, LinkService, StatsService};
use crate::domain::repositories::{ClickRepository, LinkRepository};

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Geolocation resolver (or a null resolver when disabled)
/// - Background click worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if the database connection, migration run or server
/// bind fails.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let pool = Arc::new(pool);
    let link_repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
    let click_repository: Arc<dyn ClickRepository> = Arc::new(PgClickRepository::new(pool.clone()));
    let token_repository = Arc::new(PgTokenRepository::new(pool.clone()));
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));

    let geo_resolver: Arc<dyn GeoResolver> = if config.geoip_enabled {
        tracing::info!("Geolocation enabled ({})", config.geoip_endpoint);
        Arc::new(IpApiResolver::new(config.geoip_endpoint.clone())?)
    } else {
        tracing::info!("Geolocation disabled");
        Arc::new(NullGeoResolver)
    };

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);

    let recorder = ClickRecorder::new(
        link_repository.clone(),
        click_repository.clone(),
        geo_resolver,
    );
    tokio::spawn(run_click_worker(click_rx, recorder));
    tracing::info!("Click worker started");

    let link_service = Arc::new(LinkService::new(
        link_repository.clone(),
        Arc::new(HttpTitleProber::new()?),
        config.base_url.clone(),
    ));
    let stats_service = Arc::new(StatsService::new(link_repository, click_repository));
    let auth_service = Arc::new(AuthService::new(
        token_repository,
        user_repository,
        config.token_signing_secret.clone(),
    ));

    let state = AppState {
        link_service,
        stats_service,
        auth_service,
        click_sender: click_tx,
        trust_proxy_headers: config.behind_proxy,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
