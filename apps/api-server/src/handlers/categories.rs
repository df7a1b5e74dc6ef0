//! Category endpoints. Writes require an admin token.

use actix_web::{HttpResponse, web};
use quill_shared::dto::CategoryRequest;
use quill_shared::{ApiResponse, ListResponse};
use uuid::Uuid;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.services.categories.list().await?;
    Ok(HttpResponse::Ok().json(ListResponse::ok(categories)))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let category = state.services.categories.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// POST /api/v1/categories
pub async fn create_category(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .services
        .categories
        .create(&identity.actor(), &body.name)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(category)))
}

/// PUT /api/v1/categories/{id}
pub async fn rename_category(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .services
        .categories
        .rename(&identity.actor(), path.into_inner(), &body.name)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// DELETE /api/v1/categories/{id}
pub async fn delete_category(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .services
        .categories
        .delete(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({}))))
}
