//! Post endpoints: listing, search, authoring and likes.

use actix_web::{HttpResponse, web};
use quill_core::domain::{PageLink, PageRequest, Pagination, PostPatch, PostStatus};
use quill_core::services::{PostDraft, author_filter};
use quill_shared::dto::{
    CreatePostRequest, ListPostsQuery, PageLinkResponse, PaginationResponse, SearchQuery,
    UpdatePostRequest,
};
use quill_shared::{ApiResponse, ListResponse};
use uuid::Uuid;

use super::parse_enum;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn link(link: PageLink) -> PageLinkResponse {
    PageLinkResponse {
        page: link.page,
        limit: link.limit,
    }
}

fn pagination(pagination: Pagination) -> PaginationResponse {
    PaginationResponse {
        next: pagination.next.map(link),
        prev: pagination.prev.map(link),
    }
}

/// GET /api/v1/posts?page&limit&author
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let filter = author_filter(query.author.as_deref())?;
    let page = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());

    let result = state.services.listing.list(filter, page).await?;

    Ok(HttpResponse::Ok().json(ListResponse::paginated(
        result.items,
        result.total,
        pagination(result.pagination),
    )))
}

/// GET /api/v1/posts/search?query
pub async fn search_posts(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.services.search.search(query.query.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ListResponse::ok(posts)))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.services.listing.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/v1/posts
pub async fn create_post(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let draft = PostDraft {
        title: body.title,
        content: body.content,
        category_id: body.category,
        image: body.image,
        tags: body.tags,
    };

    let post = state.services.posts.create(&identity.actor(), draft).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// PUT /api/v1/posts/{id}
pub async fn update_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let status = body
        .status
        .as_deref()
        .map(|raw| parse_enum::<PostStatus>("status", raw))
        .transpose()?;
    let patch = PostPatch {
        title: body.title,
        content: body.content,
        category_id: body.category,
        image: body.image,
        tags: body.tags,
        status,
    };

    let post = state
        .services
        .posts
        .update(&identity.actor(), path.into_inner(), patch)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .services
        .posts
        .delete(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({}))))
}

/// PUT /api/v1/posts/{id}/like
pub async fn toggle_like(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .services
        .engagement
        .toggle_like(path.into_inner(), identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}
