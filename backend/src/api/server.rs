//! HTTP server for the salescheck API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | POST   | `/api/upload`     | Upload a CSV file (multipart)        |
//! | POST   | `/api/validate`   | Validate CSV text (JSON body)        |
//! | POST   | `/api/export`     | Validated rows as CSV                |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |

use axum::{
    extract::{Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{error_response, CheckRequest, CheckResponse};
use crate::config::CheckOptions;
use crate::error::ServerResult;
use crate::pipeline::{check_bytes, check_text};

type ApiError = (StatusCode, Json<Value>);

/// Shared handler state.
#[derive(Clone)]
struct AppState {
    options: Arc<CheckOptions>,
}

/// Build the application router.
pub fn router(options: CheckOptions) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let state = AppState {
        options: Arc::new(options),
    };

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload_csv))
        .route("/api/validate", post(validate_csv))
        .route("/api/export", post(export_csv))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(port: u16, options: CheckOptions) -> ServerResult<()> {
    let app = router(options);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 salescheck server running on http://localhost:{}", port);
    println!("   POST /api/upload   - Upload CSV file");
    println!("   POST /api/validate - Validate CSV text");
    println!("   POST /api/export   - Export validated rows");
    println!("   GET  /api/logs     - SSE log stream");
    println!("   GET  /health       - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "salescheck",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "validate": "POST /api/validate",
            "export": "POST /api/export",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // lagged receivers skip what they missed
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(error_response(message)))
}

/// Multipart upload; the file goes in the `file` field.
async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CheckResponse>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request(&format!("Read error: {}", e)))?;
            file_data = Some(bytes.to_vec());
        }
    }

    let bytes = file_data.ok_or_else(|| bad_request("No file provided"))?;

    log_info(format!(
        "📄 Upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    ));

    let result = check_bytes(&bytes, None, &state.options).map_err(|e| {
        log_error(format!("Check failed: {}", e));
        bad_request(&e.to_string())
    })?;

    Ok(Json(result.into()))
}

/// Validate CSV text sent as JSON.
async fn validate_csv(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Json<CheckResponse> {
    Json(check_text(&request.csv, &state.options).into())
}

/// Validated rows as a downloadable CSV.
async fn export_csv(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Result<Response, ApiError> {
    let result = check_text(&request.csv, &state.options);
    let csv = result.to_csv(&state.options).map_err(|e| {
        log_error(format!("Export failed: {}", e));
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response(&e.to_string())),
        )
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"hasil_validasi.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
