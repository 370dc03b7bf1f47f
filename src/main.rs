use learngate::{config, routes, state};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::GatewayConfig::from_env().expect("gateway configuration");
    let port = config.port;

    let state = state::AppState::new(config).expect("http client init failed");

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "learngate listening");
    axum::serve(listener, app).await.expect("server failed");
}
