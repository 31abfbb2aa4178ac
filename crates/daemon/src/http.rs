use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use signage_core::api::{ErrorResponse, SaveResponse, REQUIRED_KEYS};
use signage_core::Dataset;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::store::DataStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<DataStore>,
}

pub fn router(store: Arc<DataStore>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/data", get(get_data).post(save_data))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_data(State(st): State<AppState>) -> Json<Value> {
    Json(st.store.load().await)
}

async fn save_data(
    State(st): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SaveResponse>, ApiError> {
    validate(&body)?;
    st.store.save(&body).await.map_err(ApiError::Save)?;
    info!("dataset replaced");
    Ok(Json(SaveResponse {
        success: true,
        message: "Data saved successfully.".into(),
    }))
}

/// Requires the four content lists and a body that parses as a dataset.
fn validate(body: &Value) -> Result<(), ApiError> {
    let complete = REQUIRED_KEYS
        .iter()
        .all(|key| body.get(key).is_some_and(|v| !v.is_null()));
    if !complete {
        return Err(ApiError::BadRequest("Invalid data structure.".into()));
    }
    serde_json::from_value::<Dataset>(body.clone())
        .map_err(|e| ApiError::BadRequest(format!("Invalid data structure: {e}")))?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("failed to save data: {0:#}")]
    Save(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Save(e) => {
                tracing::error!(error = %e, "save failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save data.".to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::json;
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn app(path: std::path::PathBuf) -> Router {
        router(Arc::new(DataStore::new(path)))
    }

    fn post(body: &Value) -> Request<Body> {
        Request::post("/api/data")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn rejects_missing_lists() {
        let err = validate(&json!({"notices": [], "events": [], "birthdays": []})).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        let err = validate(&json!({"notices": [], "events": [], "birthdays": [], "cctv": null}))
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn rejects_mistyped_lists() {
        let err = validate(&json!({"notices": "x", "events": [], "birthdays": [], "cctv": []}))
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn healthz_answers() {
        let dir = tempdir().unwrap();
        let resp = app(dir.path().join("data.json"))
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_file_serves_empty_dataset() {
        let dir = tempdir().unwrap();
        let resp = app(dir.path().join("data.json"))
            .oneshot(Request::get("/api/data").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let served = json_body(resp).await;
        let dataset: Dataset = serde_json::from_value(served).unwrap();
        assert_eq!(dataset, Dataset::default());
    }

    #[tokio::test]
    async fn saved_dataset_is_served_back() {
        let dir = tempdir().unwrap();
        let app = app(dir.path().join("data.json"));
        let body = json!({
            "notices": [{"title": "Fire drill", "content": "10am", "urgent": true}],
            "events": [],
            "birthdays": [],
            "cctv": [{"label": "Gate", "stream": "", "grid": "1"}],
            "config": {"showCctv": false}
        });

        let resp = app.clone().oneshot(post(&body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await,
            json!({"success": true, "message": "Data saved successfully."})
        );

        let resp = app
            .oneshot(Request::get("/api/data").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(json_body(resp).await, body);
    }

    #[tokio::test]
    async fn missing_cctv_is_a_bad_request() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let resp = app(path.clone())
            .oneshot(post(&json!({"notices": [], "events": [], "birthdays": []})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(resp).await,
            json!({"error": "Invalid data structure."})
        );
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn unwritable_store_is_a_server_error() {
        let dir = tempdir().unwrap();
        let resp = app(dir.path().join("missing").join("data.json"))
            .oneshot(post(
                &json!({"notices": [], "events": [], "birthdays": [], "cctv": []}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(resp).await, json!({"error": "Failed to save data."}));
    }

    #[tokio::test]
    async fn cross_origin_requests_are_allowed() {
        let dir = tempdir().unwrap();
        let resp = app(dir.path().join("data.json"))
            .oneshot(
                Request::get("/api/data")
                    .header(header::ORIGIN, "http://editor.local")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
