use axum::response::IntoResponse;

pub async fn metrics_handler() -> impl IntoResponse {
    // The Prometheus recorder serves scrapes from the dedicated metrics port
    "Metrics available on metrics port"
}
