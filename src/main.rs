use crate::config::Config;
use crate::state::AppState;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::io::Error;
use std::io::ErrorKind::Other;

mod admin;
mod api;
mod config;
mod error;
mod qr;
mod queues;
mod state;
mod stats;
mod storage;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    log::info!(
        "starting waitline on {}:{} (data dir: {})",
        config.host,
        config.port,
        config.data_dir.display()
    );

    let bind = (config.host.clone(), config.port);
    let state = AppState::build(config).map_err(|e| Error::new(Other, e.to_string()))?;

    HttpServer::new({
        move || {
            App::new()
                .wrap(Logger::default())
                .app_data(Data::new(state.clone()))
                .configure(api::configure)
        }
    })
    .workers(4)
    .bind(bind)?
    .run()
    .await
}
