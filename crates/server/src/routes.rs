use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Datelike, NaiveDate};
use niaga_executor::{Command, Document, Error, Output, Session};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ApiError, AppState};

type ApiResult<T> = Result<T, ApiError>;

// ==================== Plumbing ====================

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn token(headers: &HeaderMap) -> ApiResult<Option<Uuid>> {
    match bearer(headers) {
        None => Ok(None),
        Some(raw) => Uuid::parse_str(raw)
            .map(Some)
            .map_err(|_| ApiError(Error::Unauthenticated)),
    }
}

/// The caller's session, or a fresh anonymous one when no token was sent.
fn session_for(state: &AppState, headers: &HeaderMap) -> ApiResult<Arc<Session>> {
    match token(headers)? {
        Some(token) => state
            .sessions
            .get(&token)
            .ok_or(ApiError(Error::Unauthenticated)),
        None => Ok(Arc::new(Session::new(state.executor.clone()))),
    }
}

/// Commands block on disk writes, so they run off the async workers.
async fn run(session: Arc<Session>, cmd: Command) -> ApiResult<Output> {
    tokio::task::spawn_blocking(move || session.execute(cmd))
        .await
        .map_err(|e| {
            ApiError(Error::Internal {
                reason: format!("command task failed: {}", e),
            })
        })?
        .map_err(ApiError)
}

fn unexpected(cmd: &str) -> ApiError {
    ApiError(Error::Internal {
        reason: format!("unexpected output for {}", cmd),
    })
}

fn document_response(doc: Document) -> Response {
    let content_type = HeaderValue::from_str(&doc.content_type)
        .unwrap_or(HeaderValue::from_static("text/plain; charset=utf-8"));
    let disposition = HeaderValue::from_str(&format!("inline; filename=\"{}\"", doc.file_name))
        .unwrap_or(HeaderValue::from_static("inline"));
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        doc.body,
    )
        .into_response()
}

async fn render(session: Arc<Session>, cmd: Command) -> ApiResult<Response> {
    let name = cmd.name();
    match run(session, cmd).await? {
        Output::Document(doc) => Ok(document_response(doc)),
        _ => Err(unexpected(name)),
    }
}

// ==================== Handlers ====================

pub(crate) async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let stats = state.executor.database().stats();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "db_version": stats.version,
        "sessions": state.sessions.len(),
    }))
}

#[derive(Deserialize)]
pub(crate) struct LoginRequest {
    username: String,
    password: String,
}

pub(crate) async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(req) = body.map_err(|e| ApiError::invalid(e.body_text()))?;
    let session = Arc::new(Session::new(state.executor.clone()));
    let cmd = Command::Login {
        username: req.username,
        password: req.password,
    };
    let user = match run(session.clone(), cmd).await? {
        Output::User(user) => user,
        _ => return Err(unexpected("Login")),
    };
    let token = state.sessions.insert(session);
    Ok(Json(json!({
        "token": token,
        "user": user,
        "expires_in_secs": state.sessions.ttl().as_secs(),
    })))
}

pub(crate) async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let token = token(&headers)?.ok_or(ApiError(Error::Unauthenticated))?;
    let session = state
        .sessions
        .get(&token)
        .ok_or(ApiError(Error::Unauthenticated))?;
    run(session, Command::Logout).await?;
    state.sessions.remove(&token);
    Ok(Json(json!({ "ok": true })))
}

pub(crate) async fn execute(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Command>, JsonRejection>,
) -> ApiResult<Json<Output>> {
    let Json(cmd) = body.map_err(|e| ApiError::invalid(e.body_text()))?;
    let session = session_for(&state, &headers)?;
    let is_logout = matches!(cmd, Command::Logout);
    let output = run(session, cmd).await?;
    if is_logout {
        if let Some(token) = token(&headers)? {
            state.sessions.remove(&token);
        }
    }
    Ok(Json(output))
}

#[derive(Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub(crate) async fn pos_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Output>> {
    let Query(query) = query.map_err(|e| ApiError::invalid(e.body_text()))?;
    let session = session_for(&state, &headers)?;
    let output = run(session, Command::PosSearch { query: query.q }).await?;
    Ok(Json(output))
}

pub(crate) async fn savings_balance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> ApiResult<Json<Output>> {
    let session = session_for(&state, &headers)?;
    let output = run(session, Command::SavingsBalance { name }).await?;
    Ok(Json(output))
}

pub(crate) async fn document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let number = || {
        id.parse::<u64>()
            .map_err(|_| ApiError::invalid(format!("{} id must be a number, got '{}'", kind, id)))
    };
    let cmd = match kind.as_str() {
        "receipt" => Command::RenderSaleReceipt { sale_id: number()? },
        "savings" => Command::RenderSavingsReceipt {
            entry_id: number()?,
        },
        "statement" => Command::RenderStatement {
            saver_id: number()?,
        },
        "invoice" => Command::RenderInvoice {
            invoice_id: number()?,
        },
        "label" => Command::RenderLabel {
            product_id: id.clone(),
        },
        other => {
            return Err(ApiError(Error::NotFound {
                entity: format!("documents/{}", other),
            }))
        }
    };
    let session = session_for(&state, &headers)?;
    render(session, cmd).await
}

pub(crate) async fn price_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let session = session_for(&state, &headers)?;
    render(session, Command::RenderPriceList).await
}

#[derive(Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    start: Option<NaiveDate>,
    #[serde(default)]
    end: Option<NaiveDate>,
}

/// Without dates the report covers the current month up to today.
pub(crate) async fn report(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query.map_err(|e| ApiError::invalid(e.body_text()))?;
    let end = query
        .end
        .unwrap_or_else(|| state.executor.database().clock().today());
    let start = query.start.unwrap_or_else(|| end.with_day(1).unwrap_or(end));
    let session = session_for(&state, &headers)?;
    render(session, Command::RenderReport { start, end }).await
}
