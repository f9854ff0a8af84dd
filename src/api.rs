// 🌐 JSON API - Read-only catalogue endpoints for a UI
//
// GET  /api/health
// GET  /api/startups?search=...   all startups, or a name/og search
// POST /api/startups/filter       FilterSpec body → matching startups
// GET  /api/startups/:id          detail view
// GET  /api/facets                option lists + funding slider bounds
// POST /api/reload                fetch the feed again

use crate::cache::{EntityCache, LoadSummary};
use crate::entities::Startup;
use crate::facets::FacetIndex;
use crate::filter::{evaluate, FilterSpec};
use crate::source::DataSource;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn err(data: T, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

/// Shared application state
pub type AppState<S> = Arc<EntityCache<S>>;

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// Catalogue for a request, or the load failure as a 503 with empty data
async fn catalogue<S: DataSource>(cache: &EntityCache<S>) -> Result<Arc<[Startup]>, Response> {
    let startups = cache.get_all().await;

    match cache.last_error() {
        Some(error) if !cache.is_loaded() => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::err(Vec::<Startup>::new(), error.to_string())),
        )
            .into_response()),
        _ => Ok(startups),
    }
}

/// GET /api/startups - All startups, optionally narrowed by search text
async fn list_startups<S: DataSource>(
    State(cache): State<AppState<S>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let startups = match catalogue(&cache).await {
        Ok(startups) => startups,
        Err(response) => return response,
    };

    let spec = FilterSpec::new().with_search(params.search.unwrap_or_default());
    let matching: Vec<Startup> = evaluate(&startups, &spec, Local::now().date_naive())
        .into_iter()
        .cloned()
        .collect();

    (StatusCode::OK, Json(ApiResponse::ok(matching))).into_response()
}

/// POST /api/startups/filter - Startups matching a FilterSpec
async fn filter_startups<S: DataSource>(
    State(cache): State<AppState<S>>,
    Json(spec): Json<FilterSpec>,
) -> Response {
    let startups = match catalogue(&cache).await {
        Ok(startups) => startups,
        Err(response) => return response,
    };

    let matching: Vec<Startup> = evaluate(&startups, &spec, Local::now().date_naive())
        .into_iter()
        .cloned()
        .collect();

    (StatusCode::OK, Json(ApiResponse::ok(matching))).into_response()
}

/// GET /api/startups/:id - One startup for the detail view
async fn get_startup<S: DataSource>(
    State(cache): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = catalogue(&cache).await {
        return response;
    }

    match cache.get_by_id(&id) {
        Some(startup) => (StatusCode::OK, Json(ApiResponse::ok(Some(startup)))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Option<Startup>>::err(None, format!("startup {} not found", id))),
        )
            .into_response(),
    }
}

/// GET /api/facets - Filter option lists
async fn get_facets<S: DataSource>(State(cache): State<AppState<S>>) -> Response {
    match catalogue(&cache).await {
        Ok(startups) => {
            (StatusCode::OK, Json(ApiResponse::ok(FacetIndex::build(&startups)))).into_response()
        }
        Err(response) => response,
    }
}

/// POST /api/reload - Fetch the feed again
async fn reload<S: DataSource>(State(cache): State<AppState<S>>) -> Response {
    match cache.load().await {
        Ok(summary) => (StatusCode::OK, Json(ApiResponse::ok(Some(summary)))).into_response(),
        Err(error) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::<Option<LoadSummary>>::err(None, error.to_string())),
        )
            .into_response(),
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router<S: DataSource + 'static>(cache: AppState<S>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/startups", get(list_startups::<S>))
        .route("/startups/filter", post(filter_startups::<S>))
        .route("/startups/:id", get(get_startup::<S>))
        .route("/facets", get(get_facets::<S>))
        .route("/reload", post(reload::<S>))
        .with_state(cache);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::schema::FeedSchema;
    use crate::source::StaticSource;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    const FEED: &str = "name,description,image,url,tags,category,date\n\
        Acme Rockets,Rockets,,https://acme.io,space,AI,2024-01-01\n\
        Beta Pay,Payments,,,fintech,Fintech,2024-02-01\n";

    fn app(source: StaticSource) -> Router {
        router(Arc::new(EntityCache::new(source, FeedSchema::v1())))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(StaticSource::new(FEED)), get_req("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_list_and_search() {
        let (status, body) = send(app(StaticSource::new(FEED)), get_req("/api/startups")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, body) = send(app(StaticSource::new(FEED)), get_req("/api/startups?search=beta")).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["name"], "Beta Pay");
    }

    #[tokio::test]
    async fn test_filter_endpoint() {
        let request = post_json("/api/startups/filter", r#"{"category": ["AI"]}"#);
        let (status, body) = send(app(StaticSource::new(FEED)), request).await;

        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], "1");
    }

    #[tokio::test]
    async fn test_detail_and_not_found() {
        let (status, body) = send(app(StaticSource::new(FEED)), get_req("/api/startups/2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Beta Pay");

        let (status, body) = send(app(StaticSource::new(FEED)), get_req("/api/startups/42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_facets() {
        let (_, body) = send(app(StaticSource::new(FEED)), get_req("/api/facets")).await;

        assert_eq!(body["data"]["categories"], serde_json::json!(["AI", "Fintech"]));
        assert_eq!(body["data"]["fundingAmountRange"]["max"], 1_000_000.0);
    }

    #[tokio::test]
    async fn test_failed_load_is_empty_with_error() {
        let source = StaticSource::failing(LoadError::Status(500));
        let (status, body) = send(app(source), get_req("/api/startups")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], serde_json::json!([]));
        assert!(body["error"].as_str().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_reload() {
        let (status, body) = send(app(StaticSource::new(FEED)), post_json("/api/reload", "")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["accepted"], 2);
    }
}
