use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono_tz::Tz;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use studyplan_core::{ErrorKind, PlanError, PlanRequest, ScheduleDefaults, generate_schedule, today_in};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Structured client error: `{ "kind": ..., "error": ... }` with a 400.
pub struct AppError {
    status: StatusCode,
    kind: ErrorKind,
    message: String,
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        PlanError::invalid_argument(format!("malformed request body: {}", rejection.body_text())).into()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(kind = %self.kind, error = %self.message, "rejected plan request");
        let body = serde_json::json!({ "kind": self.kind, "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Immutable per-server settings shared by every request.
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    pub defaults: ScheduleDefaults,
    pub timezone: Tz,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate-plan", post(generate_plan))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!(timezone = %state.timezone, "studyplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("studyplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate_plan(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<axum::response::Response, AppError> {
    let Json(body) = body?;
    let request = PlanRequest::from_json(body)?.validate(&state.defaults)?;
    let schedule = generate_schedule(&request, today_in(state.timezone))?;

    tracing::info!(
        topics = request.topics.len(),
        days = request.days,
        hours_per_day = request.hours_per_day,
        fill_policy = %request.fill_policy,
        "generated plan"
    );

    Ok(Json(schedule).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::json;
    use tower::ServiceExt;

    use studyplan_core::FillPolicy;

    use super::*;

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    fn state() -> AppState {
        AppState {
            defaults: ScheduleDefaults::default(),
            timezone: chrono_tz::UTC,
        }
    }

    async fn post_raw(state: AppState, body: &str) -> axum::response::Response {
        let app = build_router(state);
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate-plan")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn post_json(state: AppState, body: Value) -> axum::response::Response {
        post_raw(state, &body.to_string()).await
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_health() {
        let app = build_router(state());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_generate_plan_balanced() {
        let resp = post_json(
            state(),
            json!({
                "topics": ["Lists", "Tuples", "Sets", "Dicts", "Loops"],
                "days": 3,
                "hours_per_day": 2,
                "start_date": "2025-01-01",
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            json!([
                {"day": 1, "date": "2025-01-01", "topics": ["Lists", "Tuples"], "planned_hours": 2},
                {"day": 2, "date": "2025-01-02", "topics": ["Sets", "Dicts"], "planned_hours": 2},
                {"day": 3, "date": "2025-01-03", "topics": ["Loops"], "planned_hours": 2},
            ])
        );
    }

    #[tokio::test]
    async fn test_generate_plan_uses_server_defaults() {
        let custom = AppState {
            defaults: ScheduleDefaults {
                hours_per_day: 5,
                fill_policy: FillPolicy::CycleTopics,
            },
            timezone: chrono_tz::UTC,
        };
        let resp = post_json(
            custom,
            json!({"topics": "Regex", "days": 3, "start_date": "2025-01-01"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let days = json.as_array().expect("response should be an array");
        assert_eq!(days.len(), 3);
        for day in days {
            assert_eq!(day["topics"], json!(["Regex"]));
            assert_eq!(day["planned_hours"], 5);
        }
    }

    #[tokio::test]
    async fn test_generate_plan_defaults_start_to_today() {
        let resp = post_json(state(), json!({"topics": "a", "days": 1})).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let today = today_in(chrono_tz::UTC).format("%Y-%m-%d").to_string();
        assert_eq!(json[0]["date"], today);
    }

    #[tokio::test]
    async fn test_zero_days_is_bad_request() {
        let resp = post_json(state(), json!({"topics": "a", "days": 0})).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await,
            json!({"kind": "invalid_argument", "error": "days must be positive"})
        );
    }

    #[tokio::test]
    async fn test_missing_topics_is_empty_input() {
        let resp = post_json(state(), json!({"days": 3})).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["kind"], "empty_input");
        assert_eq!(json["error"], "'topics' is required");
    }

    #[tokio::test]
    async fn test_bad_date_is_bad_request() {
        let resp = post_json(
            state(),
            json!({"topics": "a", "days": 3, "start_date": "2025-13-01"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["kind"], "invalid_argument");
        assert!(
            json["error"].as_str().unwrap().contains("invalid date format"),
            "unexpected error: {json}"
        );
    }

    #[tokio::test]
    async fn test_unsupported_topics_type() {
        let resp = post_json(state(), json!({"topics": {"a": 1}, "days": 3})).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "'topics' must be string or list");
    }

    #[tokio::test]
    async fn test_malformed_json_is_structured_bad_request() {
        let resp = post_raw(state(), "{not json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["kind"], "invalid_argument");
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let app = build_router(state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/generate-plan")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
