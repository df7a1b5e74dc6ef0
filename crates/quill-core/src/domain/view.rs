//! Read-side shapes: entities with their references populated.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Category, Comment, Post, PostStatus, User};

/// A referenced user, projected to its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

/// A referenced category, projected to its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

/// A comment as shown under a post. A dangling author reference becomes `null`.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub author: Option<UserSummary>,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, author: Option<UserSummary>) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            author,
            parent_id: comment.parent_id,
            created_at: comment.created_at,
        }
    }
}

/// A post with author, category and (optionally) comments populated.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: Option<UserSummary>,
    pub category: Option<CategorySummary>,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub likes: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(
        post: Post,
        author: Option<UserSummary>,
        category: Option<CategorySummary>,
        comments: Option<Vec<CommentView>>,
    ) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author,
            category,
            image: post.image,
            tags: post.tags,
            status: post.status,
            likes: post.likes,
            comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
