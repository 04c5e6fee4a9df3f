mod api;
mod dao;
mod model;
mod service;

use crate::api::endpoints::{district_add, district_delete, district_details, district_get, district_update, state_get, state_stats, states_list};
use crate::api::state::AppState;
use crate::dao::tracker::TrackerDao;
use crate::model::config::{ApplicationArguments, LoggingConfig};
use crate::service::tracker::TrackerService;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use sqlx::{Pool, Sqlite, sqlite::SqlitePoolOptions};
use tracing_subscriber::EnvFilter;

/**
 * Main entry point for the application.
 *
 * Reads the configuration, initializes logging, opens the database and runs
 * the server. A database that cannot be opened at startup is fatal and
 * terminates the process with a non-zero exit code.
 */
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = ApplicationArguments::parse();

    let config = get_config(&args.config_file)?;

    init_tracing(&config.logging)?;

    let connection_pool: Pool<Sqlite> = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(config.database.connection_string.as_str())
        .await
        .map_err(|err| std::io::Error::other(format!("Failed to open database: {err}")))?;

    let tracker_dao = TrackerDao::new();
    let tracker_service = TrackerService::new(tracker_dao, connection_pool);

    let state = web::Data::new(AppState::new(tracker_service));

    let server_init = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(states_list)
            .service(state_get)
            .service(district_add)
            .service(district_get)
            .service(district_delete)
            .service(district_update)
            .service(state_stats)
            .service(district_details)
    })
    .bind(("127.0.0.1", config.server.http_port))?
    .workers(config.server.workers);

    tracing::info!("Server is running on port {}", config.server.http_port);

    server_init.run().await
}

/**
 * Initializes the tracing subscriber for the application.
 *
 * #Arguments
 * `logging`: The logging configuration.
 *
 * #Returns
 * A `Result` indicating success or failure.
 */
fn init_tracing(logging: &LoggingConfig) -> Result<(), std::io::Error> {
    let mut env_filter = EnvFilter::from_default_env();
    for directive in &logging.directives {
        env_filter = env_filter.add_directive(directive.parse().map_err(|err| std::io::Error::other(format!("Failed to parse logging directive: {err}")))?);
    }
    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(logging.target).with_thread_ids(logging.thread_ids).with_level(logging.level).with_ansi(logging.ansi).init();
    Ok(())
}

/**
 * Reads the configuration from the specified file.
 *
 * #Arguments
 * `config_file`: The path to the configuration file.
 *
 * #Returns
 * A `Result` containing the parsed `Config` or an `std::io::Error` if reading or parsing fails.
*/
fn get_config(config_file: &str) -> Result<model::config::Config, std::io::Error> {
    let config_str: String = std::fs::read_to_string(config_file).map_err(|err| std::io::Error::other(format!("Failed to read config file: {err}")))?;
    let config: model::config::Config = toml::from_str(&config_str).map_err(|err| std::io::Error::other(format!("Failed to parse config file: {err}")))?;
    Ok(config)
}
