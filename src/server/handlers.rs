use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::mock::generate_mock;
use crate::report::{render, FailureKind, ReportField};

use super::state::AppState;
use super::static_files;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: &'static str,
    kind: FailureKind,
}

pub(super) struct ApiError(FailureKind);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            FailureKind::InvalidFormat => StatusCode::BAD_REQUEST,
            FailureKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            FailureKind::Unavailable => StatusCode::BAD_GATEWAY,
        };
        let body = ApiErrorBody {
            error: self.0.message(),
            kind: self.0,
        };
        (status, Json(body)).into_response()
    }
}

// ─── Static file handlers ────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

pub async fn style() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css")],
        static_files::STYLE_CSS,
    )
        .into_response()
}

pub async fn script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        static_files::APP_JS,
    )
        .into_response()
}

pub async fn health() -> &'static str {
    "ok"
}

// ─── GET /api/lookup ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LookupQuery {
    pub ip: Option<String>,
}

#[derive(Serialize)]
pub struct LookupResponse {
    pub fields: Vec<ReportField>,
    pub copy_all: String,
}

pub(super) async fn lookup(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, ApiError> {
    let start = Instant::now();
    let raw = params.ip.unwrap_or_default();

    let result = state.resolver.lookup(&raw).await;
    let rendered = render(result, generate_mock);

    info!(
        ip = raw.trim(),
        ok = rendered.is_ok(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/lookup"
    );

    let report = rendered.map_err(ApiError)?;
    Ok(Json(LookupResponse {
        copy_all: report.copy_all_text(),
        fields: report.fields,
    }))
}
