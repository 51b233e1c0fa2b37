use std::net::SocketAddr;
use std::sync::Arc;

use talentflow_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{
        cors::api_cors,
        fault::{fault_middleware, FaultState, RandomFaults},
    },
    routes::build_router,
    services::seed_service,
    AppState,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let pool = create_pool(&config.database_url).await?;
    let app_state = AppState::new(pool);

    if config.seed_data {
        let report = seed_service::seed(&app_state, config.seed_candidates).await?;
        info!(
            jobs = report.jobs,
            submissions = report.submissions_added,
            "sample data ready"
        );
    }

    let mut app = build_router(app_state.clone());
    if config.fault_rate > 0.0 || config.latency.is_some() {
        info!(
            fault_rate = config.fault_rate,
            latency = ?config.latency,
            "fault injection enabled"
        );
        let faults = FaultState::new(
            Arc::new(RandomFaults::new(config.fault_rate)),
            config.latency,
            Arc::new(app_state.notifications.clone()),
        );
        app = app.layer(axum::middleware::from_fn_with_state(faults, fault_middleware));
    }
    let app = app.layer(api_cors()).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
