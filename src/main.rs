mod api;
mod dao;
mod model;
mod service;

use crate::api::endpoints::{
    create_contamination_rate, create_maladie, create_mosquito_report, create_traitement, delete_mosquito_report, read_config, read_contamination_rate, read_contamination_rates,
    read_contamination_rates_by_location, read_contamination_rates_by_species, read_last_mosquito_report, read_last_mosquito_report_by_location, read_maladie, read_maladie_by_nom, read_mosquito_report,
    read_mosquito_reports_by_date, read_mosquito_reports_by_species, read_root, read_traitement, read_traitements_by_maladie, update_mosquito_report,
};
use crate::api::rest::{json_error_handler, path_error_handler, query_error_handler};
use crate::api::state::AppState;
use crate::dao::contamination::ContaminationDao;
use crate::dao::maladie::MaladieDao;
use crate::dao::mosquito::MosquitoDao;
use crate::dao::traitement::TraitementDao;
use crate::model::config::{AppConfig, ApplicationArguments};
use crate::service::contamination::ContaminationService;
use crate::service::maladie::MaladieService;
use crate::service::mosquito::MosquitoService;
use crate::service::traitement::TraitementService;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use sqlx::{Pool, Postgres, pool};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/**
 * Main entry point for the application.
 */
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = ApplicationArguments::parse();

    let config = AppConfig::from_env().map_err(|err| std::io::Error::other(format!("Failed to load configuration: {err}")))?;

    init_tracing(&config);

    let connection_pool: Pool<Postgres> = pool::PoolOptions::new()
        .max_connections(args.max_connections)
        .connect(config.database_url.as_str())
        .await
        .map_err(|err| std::io::Error::other(format!("Failed to create database pool: {err}")))?;

    let mosquito_service = MosquitoService::new(MosquitoDao::new(), connection_pool.clone());
    let contamination_service = ContaminationService::new(ContaminationDao::new(), connection_pool.clone());
    let maladie_service = MaladieService::new(MaladieDao::new(), connection_pool.clone());
    let traitement_service = TraitementService::new(TraitementDao::new(), connection_pool);

    let state = web::Data::new(AppState::new(config, mosquito_service, contamination_service, maladie_service, traitement_service));

    let server_init = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .service(read_config)
            .service(read_root)
            .service(read_last_mosquito_report)
            .service(read_mosquito_reports_by_species)
            .service(read_mosquito_reports_by_date)
            .service(read_last_mosquito_report_by_location)
            .service(create_mosquito_report)
            .service(read_mosquito_report)
            .service(update_mosquito_report)
            .service(delete_mosquito_report)
            .service(read_contamination_rates)
            .service(create_contamination_rate)
            .service(read_contamination_rates_by_species)
            .service(read_contamination_rates_by_location)
            .service(read_contamination_rate)
            .service(create_traitement)
            .service(read_traitements_by_maladie)
            .service(read_traitement)
            .service(create_maladie)
            .service(read_maladie_by_nom)
            .service(read_maladie)
    });

    server_init.bind(("127.0.0.1", args.http_port))?.workers(args.workers).run().await
}

/**
 * Initializes logging for the application. The debug flag lowers the default
 * filter, an explicit RUST_LOG directive wins.
 *
 * # Arguments
 * `config`: The application configuration.
 */
fn init_tracing(config: &AppConfig) {
    let default_directive = if config.debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry().with(env_filter).with(tracing_subscriber::fmt::layer()).init();
}
