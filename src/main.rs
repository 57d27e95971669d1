// Main entry point for the text-scribe processing workflow

use text_scribe::{
    core::{Config, types::{PipelineStage, ResultRecord}},
    orchestration::Pipeline,
    services::language::code_for_name,
    storage::ResultStore,
    ImagePayload, LanguageGuess, PipelineOutput, Translation,
};

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
    store: ResultStore,
    /// Re-entry guard: one pipeline run at a time
    busy: Arc<AtomicBool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Arc::new(Config::new()?);

    // Initialize logging
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new(format!(
        "text_scribe={}",
        match config.log_level() {
            tracing::Level::TRACE => "trace",
            tracing::Level::DEBUG => "debug",
            tracing::Level::INFO => "info",
            tracing::Level::WARN => "warn",
            tracing::Level::ERROR => "error",
        }
    ));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("=== TEXT SCRIBE BACKEND ===");
    info!(
        "Config: model={} data_dir={} min_text_length={}",
        config.model(),
        config.data_dir(),
        config.min_text_length()
    );

    // Initialize the result store and pipeline
    let store = ResultStore::new(config.data_dir()).await?;
    let pipeline = Arc::new(Pipeline::from_config(config.clone())?);

    let state = AppState {
        pipeline,
        store,
        busy: Arc::new(AtomicBool::new(false)),
    };

    // Setup CORS for the browser client
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/process", post(process_image))
        .route(
            "/summaries",
            get(list_summaries).post(save_summary).delete(clear_summaries),
        )
        .route("/summaries/:id", delete(delete_summary))
        .with_state(state)
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB uploads
        .layer(cors);

    let addr = format!("{}:{}", config.server_host(), config.server_port());
    info!("{}", "=".repeat(70));
    info!("Server starting on http://{}", addr);
    info!("{}", "-".repeat(70));
    info!("Endpoints:");
    info!("  GET    /               - Root endpoint");
    info!("  GET    /health         - Health check");
    info!("  POST   /process        - Run the pipeline on an image (multipart)");
    info!("  GET    /summaries      - List saved results");
    info!("  POST   /summaries      - Save a completed result");
    info!("  DELETE /summaries/:id  - Delete one result");
    info!("  DELETE /summaries      - Clear all results");
    info!("{}", "=".repeat(70));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn root() -> &'static str {
    "Text Scribe - image text extraction, translation and summarization"
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Clears the busy flag on drop. Axum drops handler futures when the
/// client disconnects mid-run, so the reset must not live after the
/// await.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A completed pipeline run as returned to the client. Not yet
/// persisted: saving is a separate, explicit POST /summaries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessResponse {
    original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    translated_text: Option<String>,
    summary: String,
    source_language: String,
    image_url: String,
}

/// Process an image through the pipeline
///
/// # Request Format:
/// - multipart/form-data
/// - Field "image": the image file (PNG/JPEG)
///
/// # Response:
/// - ProcessResponse JSON, or 409 while another run is in flight
async fn process_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>, (StatusCode, String)> {
    // Re-entry guard: a new run must not start while one is in flight
    if state
        .busy
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err((
            StatusCode::CONFLICT,
            "A processing run is already in flight".to_string(),
        ));
    }

    let _guard = BusyGuard(state.busy.clone());
    run_pipeline(&state, multipart).await.map(Json)
}

async fn run_pipeline(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<ProcessResponse, (StatusCode, String)> {
    let start_time = std::time::Instant::now();

    let mut image: Option<ImagePayload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("image") {
            let mime_type = field
                .content_type()
                .unwrap_or("image/png")
                .to_string();

            let data = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Read error: {}", e)))?;

            image = Some(ImagePayload::new(data.to_vec(), mime_type));
        }
    }

    let image = image.ok_or_else(|| (StatusCode::BAD_REQUEST, "No image provided".to_string()))?;

    info!("Processing image ({} bytes)", image.bytes.len());

    // Log advisory progress events as they arrive
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<PipelineStage>();
    tokio::spawn(async move {
        while let Some(stage) = rx.recv().await {
            info!("Stage: {}", stage.as_str());
        }
    });

    let output = state
        .pipeline
        .process(&image, Some(&tx))
        .await
        .map_err(|e| {
            error!("Pipeline run failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Processing failed: {}", e),
            )
        })?;

    info!(
        "Request completed in {:.2}s (language: {})",
        start_time.elapsed().as_secs_f64(),
        output.language.name
    );

    Ok(ProcessResponse {
        image_url: image.to_data_url(),
        original_text: output.original_text,
        translated_text: output.translation.into_option(),
        summary: output.summary,
        source_language: output.language.name,
    })
}

/// Explicit save of a completed result
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest {
    original_text: String,
    #[serde(default)]
    translated_text: Option<String>,
    summary: String,
    source_language: String,
    #[serde(default)]
    image_url: Option<String>,
}

/// Build a persistable record from a save request, rejecting payloads
/// that carry a translation for an English (or unrecognized) source —
/// a translation exists only for a detected non-English language.
fn build_record(request: SaveRequest) -> Result<ResultRecord, String> {
    let code = code_for_name(&request.source_language).to_string();

    let translation = match request.translated_text {
        Some(_) if code == "en" => {
            return Err(format!(
                "translatedText is not allowed for source language \"{}\"",
                request.source_language
            ));
        }
        Some(text) => Translation::Translated(text),
        None => Translation::NotNeeded,
    };

    let output = PipelineOutput {
        original_text: request.original_text,
        language: LanguageGuess {
            code,
            name: request.source_language,
        },
        translation,
        summary: request.summary,
    };

    Ok(output.into_record(request.image_url))
}

async fn save_summary(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<ResultRecord>, (StatusCode, String)> {
    let record =
        build_record(request).map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e))?;
    let response = record.clone();

    // The record stays in memory even when persistence fails; the
    // client decides how to notify the user.
    if let Err(e) = state.store.save(record).await {
        warn!("Persisting record failed: {}", e);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Result kept in memory but persisting it failed: {}", e),
        ));
    }

    Ok(Json(response))
}

async fn list_summaries(State(state): State<AppState>) -> Json<Vec<ResultRecord>> {
    Json(state.store.list())
}

async fn delete_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.store.delete(&id).await.map_err(|e| {
        error!("Delete failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(StatusCode::NO_CONTENT)
}

async fn clear_summaries(
    State(state): State<AppState>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.store.clear().await.map_err(|e| {
        error!("Clear failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_request(source_language: &str, translated_text: Option<&str>) -> SaveRequest {
        SaveRequest {
            original_text: "text".to_string(),
            translated_text: translated_text.map(|s| s.to_string()),
            summary: "summary".to_string(),
            source_language: source_language.to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_build_record_keeps_translation_for_non_english_source() {
        let record = build_record(save_request("French", Some("Hello"))).unwrap();
        assert_eq!(record.translated_text.as_deref(), Some("Hello"));
        assert_eq!(record.source_language, "French");
    }

    #[test]
    fn test_build_record_accepts_english_without_translation() {
        let record = build_record(save_request("English", None)).unwrap();
        assert!(record.translated_text.is_none());
    }

    #[test]
    fn test_build_record_rejects_translation_for_english_source() {
        assert!(build_record(save_request("English", Some("Hello"))).is_err());
        // Unrecognized names resolve to the "en" sentinel and get the
        // same treatment
        assert!(build_record(save_request("Klingon", Some("Hello"))).is_err());
    }

    #[test]
    fn test_busy_guard_resets_flag_on_drop() {
        let busy = Arc::new(AtomicBool::new(true));
        drop(BusyGuard(busy.clone()));
        assert!(!busy.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_busy_guard_resets_flag_when_future_is_dropped() {
        let busy = Arc::new(AtomicBool::new(true));
        let guard_busy = busy.clone();

        // A handler future cancelled mid-run must still release the
        // flag
        let future = async move {
            let _guard = BusyGuard(guard_busy);
            std::future::pending::<()>().await;
        };
        let handle = tokio::spawn(future);
        tokio::task::yield_now().await;
        handle.abort();
        let _ = handle.await;

        assert!(!busy.load(Ordering::SeqCst));
    }
}
