//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query string of `GET /posts`. Kept as raw strings so malformed numbers
/// can fall back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub author: Option<String>,
}

/// Query string of `GET /posts/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// Request to publish a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Uuid>,
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request to edit a post. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Uuid>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    /// `draft` or `published`.
    pub status: Option<String>,
}

/// Request to create or rename a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

/// Request to comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    #[serde(rename = "parentComment")]
    pub parent_comment: Option<Uuid>,
}

/// Request to report a post or comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReportRequest {
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "reportedContent")]
    pub reported_content: Uuid,
    pub reason: String,
    pub description: String,
}

/// Query string of `GET /reports`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListReportsQuery {
    pub status: Option<String>,
}

/// Request to move a report through review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReportRequest {
    pub status: String,
}

/// Link to a neighbouring page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinkResponse {
    pub page: u64,
    pub limit: u64,
}

/// `next`/`prev` links, each omitted when that page does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLinkResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLinkResponse>,
}
