use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use slotwise_server::config::{Config, StoreBackend};
use slotwise_server::routes::create_routes;
use slotwise_server::state::AppState;
use slotwise_server::store::{InMemoryStore, PgStore, SchedulerStore};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let store: Arc<dyn SchedulerStore> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store");
            Arc::new(InMemoryStore::new())
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set");
            let store = PgStore::connect(database_url, config.database_max_connections)
                .await
                .expect("Failed to connect to database");
            Arc::new(store)
        }
    };

    let app: Router = create_routes(AppState::new(store, config.store_timeout));

    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
