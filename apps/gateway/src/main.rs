use actix_web::{web, App, HttpServer};
use gateway::config::GatewayConfig;
use gateway::infra::state::StateBuilder;
use gateway::middleware::{AuthGate, RequestTrace, StructuredLogger, TraceSpan};
use gateway::routes;
use gateway::telemetry;
use gateway::token_store::spawn_sweeper;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let app_state = match StateBuilder::from_config(&config).build().await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let _sweeper = spawn_sweeper(app_state.tokens.clone(), config.sweep_interval);

    info!(
        host = %config.host,
        port = config.port,
        persistent_tokens = config.database_url.is_some(),
        "starting gateway"
    );

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(AuthGate)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
