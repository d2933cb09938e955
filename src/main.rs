use crate::config::Config;
use crate::db::connection::{get_pool_stats, init_db};
use crate::startup::{AppState, build_router, spawn_health_check};

#[macro_use]
extern crate tracing;

mod config;
mod db;
mod error;
mod polls;
mod projection;
mod startup;
mod views;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "INFO");
        }
    }
    // initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("Invalid configuration");

    let db = init_db(&config.database_url, config.db_max_connections)
        .await
        .expect("Unable to open database");
    info!("{}", get_pool_stats(&db).await);
    spawn_health_check(db.clone());

    let app_state = AppState::new(db).await.expect("Unable to load polls");
    let app = build_router(app_state);

    let addr = config.bind_addr;
    info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Unable to spawn tcp listener");

    axum::serve(listener, app).await.unwrap();
}
