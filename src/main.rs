use std::sync::Arc;

use photo_cards_api::{app, config, store::mongo::MongoStore, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SECRET
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("starting Photo Cards API in {:?} mode", config.environment);

    let store = MongoStore::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to {}: {}", config.database.url, e));

    let app = app(AppState {
        store: Arc::new(store),
    });

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
