//! # ds-api Handlers
//!
//! JSON endpoints for comments, likes and the admin dashboard. Read
//! endpoints answer with an empty/default payload when the store fails;
//! write endpoints report the failure.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use ds_core::{AppError, PublicComment};
use ds_services::{AdminDeletion, AdminSummary};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::ClientAddr;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<PublicComment>,
    pub count: usize,
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddCommentResponse {
    pub comment: PublicComment,
    pub success: bool,
    pub mode: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentRequest {
    #[serde(default)]
    pub comment_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LikeCountResponse {
    pub count: u64,
    pub slug: String,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct LikeStatusResponse {
    pub count: u64,
    pub liked: bool,
    pub slug: String,
    pub success: bool,
    pub mode: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AdminSummaryResponse {
    pub success: bool,
    pub timestamp: String,
    pub mode: &'static str,
    pub data: AdminSummary,
}

#[derive(Debug, Deserialize)]
pub struct AdminDeleteRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// GET /api/comments/{slug}
pub async fn list_comments(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.comments.list(&slug).await {
        Ok(comments) => Json(CommentListResponse {
            count: comments.len(),
            comments,
            success: true,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(slug = %slug, error = %e, "failed to list comments");
            let body = json!({
                "success": false,
                "error": "comments could not be loaded",
                "comments": [],
                "count": 0,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// POST /api/comments/{slug}
pub async fn add_comment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ClientAddr(addr): ClientAddr,
    payload: Result<Json<AddCommentRequest>, JsonRejection>,
) -> Result<Json<AddCommentResponse>, ApiError> {
    let Json(req) = payload?;
    let comment = state
        .comments
        .add(
            &slug,
            req.author.as_deref().unwrap_or_default(),
            req.content.as_deref().unwrap_or_default(),
            &addr,
        )
        .await?;

    Ok(Json(AddCommentResponse {
        comment,
        success: true,
        mode: state.mode,
    }))
}

/// DELETE /api/comments/{slug}
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ClientAddr(addr): ClientAddr,
    payload: Result<Json<DeleteCommentRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;
    let Some(comment_id) = req.comment_id.filter(|id| !id.trim().is_empty()) else {
        return Err(AppError::ValidationError("commentId is required".into()).into());
    };

    state.comments.delete(&slug, &comment_id, &addr).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "comment deleted",
    }))
}

/// GET /api/likes/{slug}
pub async fn like_count(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.likes.count(&slug).await {
        Ok(count) => Json(LikeCountResponse {
            count,
            slug,
            success: true,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(slug = %slug, error = %e, "failed to read like count");
            let body = json!({ "success": false, "error": "likes could not be loaded", "count": 0 });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// POST /api/likes/{slug}
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ClientAddr(addr): ClientAddr,
) -> Response {
    let result = state.likes.toggle(&slug, &addr).await;
    like_response(&state, slug, result, "like could not be saved")
}

/// PUT /api/likes/{slug}: the requester's like status, read-only.
pub async fn like_status(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ClientAddr(addr): ClientAddr,
) -> Response {
    let result = state.likes.status(&slug, &addr).await;
    like_response(&state, slug, result, "like status could not be loaded")
}

fn like_response(
    state: &AppState,
    slug: String,
    result: ds_core::Result<ds_services::LikeStatus>,
    failure: &'static str,
) -> Response {
    match result {
        Ok(status) => Json(LikeStatusResponse {
            count: status.count,
            liked: status.liked,
            slug,
            success: true,
            mode: state.mode,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(slug = %slug, error = %e, "{failure}");
            let body = json!({ "success": false, "error": failure, "count": 0, "liked": false });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// GET /api/admin
pub async fn admin_summary(State(state): State<AppState>) -> Json<AdminSummaryResponse> {
    Json(AdminSummaryResponse {
        success: true,
        timestamp: now_iso(),
        mode: state.mode,
        data: state.admin.summary().await,
    })
}

/// DELETE /api/admin with `{type: "comment" | "comments" | "likes", slug, id?}`
pub async fn admin_delete(
    State(state): State<AppState>,
    payload: Result<Json<AdminDeleteRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;
    let deletion = AdminDeletion::parse(
        req.kind.as_deref(),
        req.slug.as_deref(),
        req.id.as_deref(),
    )?;
    state.admin.delete(&deletion).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "data deleted",
    }))
}

/// GET /api/test: liveness and storage mode.
pub async fn api_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "success": true,
        "timestamp": now_iso(),
        "storage": state.mode,
        "remoteStore": state.mode != "memory",
        "features": { "comments": true, "likes": true },
        "links": { "admin": "/admin", "adminApi": "/api/admin" },
    }))
}
