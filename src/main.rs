use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use house_price_service::features::RawListing;
use house_price_service::format_usd;
use house_price_service::predictor::PricePredictor;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    predictor: Option<Arc<PricePredictor>>,
}

#[derive(Serialize)]
struct PredictionResponse {
    success: bool,
    predicted_price: f64,
    predicted_price_formatted: String,
    message: String,
}

#[derive(Deserialize)]
struct BatchPredictionRequest {
    listings: Vec<RawListing>,
}

#[derive(Serialize)]
struct BatchPredictionResponse {
    success: bool,
    predictions: Vec<f64>,
    count: usize,
    message: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    timestamp: String,
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    info!("Starting house price API server");

    // A missing model is not fatal: the service starts and reports
    // unhealthy until an artifact shows up on restart
    let predictor = match PricePredictor::load() {
        Ok(predictor) => {
            info!("Model loaded: {:?}", predictor.model_info().model_path);
            Some(Arc::new(predictor))
        }
        Err(err) => {
            error!("Failed to load model: {}", err);
            None
        }
    };

    let state = AppState { predictor };

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/predict/batch", post(predict_batch))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind server address");
    axum::serve(listener, app).await.expect("server error");
}

async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "House Price Prediction API",
        "status": if state.predictor.is_some() { "running" } else { "error" },
        "endpoints": {
            "health": "/health",
            "predict": "/predict",
            "predict_batch": "/predict/batch"
        },
        "model": state.predictor.as_ref().map(|p| p.model_info()),
    }))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let healthy = state
        .predictor
        .as_ref()
        .map(|p| p.health_check())
        .unwrap_or(false);

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        model_loaded: state.predictor.is_some(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn predict(
    State(state): State<AppState>,
    Json(listing): Json<RawListing>,
) -> Result<Json<PredictionResponse>, (StatusCode, String)> {
    let predictor = require_model(&state)?;

    match predictor.predict(&listing) {
        Ok(price) => Ok(Json(PredictionResponse {
            success: true,
            predicted_price: price,
            predicted_price_formatted: format_usd(price),
            message: "prediction complete".to_string(),
        })),
        Err(err) => Err((StatusCode::BAD_REQUEST, err.to_string())),
    }
}

async fn predict_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchPredictionRequest>,
) -> Result<Json<BatchPredictionResponse>, (StatusCode, String)> {
    let predictor = require_model(&state)?;

    match predictor.predict_batch(&request.listings) {
        Ok(predictions) => {
            let count = predictions.len();
            Ok(Json(BatchPredictionResponse {
                success: true,
                predictions,
                count,
                message: "batch prediction complete".to_string(),
            }))
        }
        Err(err) => Err((StatusCode::BAD_REQUEST, err.to_string())),
    }
}

fn require_model(state: &AppState) -> Result<&Arc<PricePredictor>, (StatusCode, String)> {
    state
        .predictor
        .as_ref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "model not loaded".to_string()))
}
