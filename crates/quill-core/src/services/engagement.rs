use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Post;
use crate::error::DomainError;
use crate::ports::{PostRepository, Repositories};

/// Like/unlike toggling.
#[derive(Clone)]
pub struct EngagementService {
    posts: Arc<dyn PostRepository>,
}

impl EngagementService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            posts: repos.posts.clone(),
        }
    }

    /// Flip whether `user_id` likes the post. The check and the write happen
    /// in one storage operation, so concurrent toggles cannot duplicate or
    /// drop a like.
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Post, DomainError> {
        let post = self
            .posts
            .toggle_like(post_id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        tracing::info!(
            post_id = %post_id,
            user_id = %user_id,
            liked = post.is_liked_by(user_id),
            likes = post.likes.len(),
            "Toggled like"
        );

        Ok(post)
    }
}
