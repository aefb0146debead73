use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, video::VideoController};
use crate::domain::video::VideoServiceApi;
use crate::infrastructure::config::Config;
use crate::infrastructure::middleware::request_id_middleware;

/// All routes with their middleware, ready to serve.
pub fn build_router(
    video_service: Arc<dyn VideoServiceApi>,
    video_controller: Arc<VideoController>,
) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(video_service);

    let video_routes = Router::new()
        .route("/api/videos", post(VideoController::create_video))
        .route("/api/voices", get(VideoController::list_voices))
        .with_state(video_controller);

    Router::new()
        .merge(health_routes)
        .merge(video_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    router: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    Ok(())
}
