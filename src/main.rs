// src/main.rs
mod aggregator;
mod cftools;
mod config;
mod handlers;
mod mock;
mod models;
mod utils;

use actix_web::{web, App, HttpServer};
use env_logger::Env;
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::RateLimiter;
use log::info;
use std::net::IpAddr;

use crate::aggregator::StatusAggregator;
use crate::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger only once at the start
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    dotenv::dotenv().ok();

    // Load configuration
    let config = Config::from_env();

    // Get bind address and port from environment or use defaults
    let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let bind = format!("{}:{}", bind_address, port);

    let aggregator = StatusAggregator::new(&config).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to build CF Tools client: {}", e),
        )
    })?;
    let aggregator = web::Data::new(aggregator);

    // Set up rate limiter for the public status endpoint using config
    let status_rate_limiter: web::Data<
        RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>,
    > = web::Data::new(RateLimiter::keyed(config.status_quota()));

    let config = web::Data::new(config);

    info!("Starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(aggregator.clone())
            .app_data(status_rate_limiter.clone())
            .route("/", web::get().to(handlers::index::index))
            .route(
                "/api/server-status",
                web::get().to(handlers::status::server_status),
            )
            .route(
                "/api/server-status",
                web::method(actix_web::http::Method::OPTIONS)
                    .to(handlers::status::server_status_options),
            )
    })
        .bind(&bind)?
        .run().await
}
