use anyhow::Result;
use axum::{
    extract::Path,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use axum_console_monitor::{monitor::middleware, ConsoleMonitor, MonitorConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let config = MonitorConfig::load()?;
    info!("Monitor configuration loaded successfully");

    let monitor = ConsoleMonitor::new(config);
    let app = create_app(monitor);

    let addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 Console monitor demo listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(monitor: ConsoleMonitor) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/items", get(list_items).post(create_item))
        .route("/v1/items/:id", get(get_item))
        .layer(
            ServiceBuilder::new()
                // `record` outermost gives the early entry firing; `observe`
                // overwrites it and flushes on completion.
                .layer(from_fn_with_state(monitor.clone(), middleware::record))
                .layer(from_fn_with_state(monitor, middleware::observe))
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(std::time::Duration::from_secs(30))),
        )
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "axum-console-monitor",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn list_items() -> Json<Value> {
    Json(json!({
        "items": ["alpha", "beta"],
        "total": 2,
    }))
}

async fn get_item(Path(id): Path<String>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if id == "missing" {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Not Found" })),
        ));
    }
    Ok(Json(json!({ "id": id, "name": "alpha" })))
}

async fn create_item(Json(payload): Json<Value>) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(json!({ "created": payload })))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
