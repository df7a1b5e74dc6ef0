use actix_web::{HttpResponse, web};
use quill_shared::dto::CreateCommentRequest;
use quill_shared::{ApiResponse, ListResponse};
use uuid::Uuid;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/posts/{id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state
        .services
        .comments
        .list_for_post(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ListResponse::ok(comments)))
}

/// POST /api/v1/posts/{id}/comments
pub async fn create_comment(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .services
        .comments
        .create(
            &identity.actor(),
            path.into_inner(),
            &body.content,
            body.parent_comment,
        )
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(comment)))
}
