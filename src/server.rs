//! HTTP API for the price-trend dashboard.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use common::{OffsetError, PricePoint, Provenance, RoutePair};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use trend::{BookingAdvice, RouteAnalysis, TrendAnalyzer};

const MISSING_ROUTE: &str = "Missing origin or destination";

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<TrendAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: Arc<TrendAnalyzer>) -> Self {
        Self { analyzer }
    }
}

/// Create the router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/price-trend", post(price_trend))
        .with_state(state);
    with_middleware(routes)
}

fn with_middleware(router: Router) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(cors::Any);

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

/// Route lookup body. Both fields are optional at the wire level so a
/// missing one yields the documented 400 instead of a generic rejection.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PriceTrendRequest {
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PriceTrendResponse {
    pub source: Provenance,
    pub data: Vec<PricePoint>,
    pub cached: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<OffsetError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<BookingAdvice>,
}

impl From<RouteAnalysis> for PriceTrendResponse {
    fn from(analysis: RouteAnalysis) -> Self {
        Self {
            source: analysis.result.provenance,
            data: analysis.result.points,
            cached: analysis.cached,
            errors: analysis.result.partial_errors,
            advice: analysis.advice,
        }
    }
}

/// The body is parsed as JSON whatever its `Content-Type`; browsers and
/// simple clients often send `text/plain` or nothing.
async fn price_trend(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PriceTrendResponse>, ApiError> {
    let req: PriceTrendRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected price-trend body: {}", e);
        ApiError::bad_request(format!("Invalid request body: {e}"))
    })?;

    let route = parse_route(&req)?;
    info!("Price trend request for {}", route);

    let analysis = state.analyzer.analyze(&route).await;
    Ok(Json(analysis.into()))
}

fn parse_route(req: &PriceTrendRequest) -> Result<RoutePair, ApiError> {
    let (Some(origin), Some(destination)) = (req.origin.as_deref(), req.destination.as_deref())
    else {
        return Err(ApiError::bad_request(MISSING_ROUTE));
    };
    RoutePair::new(origin, destination).map_err(|_| ApiError::bad_request(MISSING_ROUTE))
}

/// JSON error response: `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal Server Error".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!("Request handler panicked: {}", detail);
    ApiError::internal().into_response()
}
