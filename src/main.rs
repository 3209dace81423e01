#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, ADMIN_*, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = immokraini_api::config::config();
    tracing::info!("Starting ImmoKraini API in {:?} mode", config.environment);

    let app = immokraini_api::routes::app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("IMMO_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("ImmoKraini API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
