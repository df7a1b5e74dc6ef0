use std::sync::Arc;

use uuid::Uuid;

use super::populate::Populator;
use crate::domain::{Actor, Comment, CommentView};
use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository, Repositories};

#[derive(Clone)]
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    populator: Populator,
}

impl CommentService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            posts: repos.posts.clone(),
            comments: repos.comments.clone(),
            populator: Populator::new(repos),
        }
    }

    async fn ensure_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        match self.posts.find_by_id(post_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Post", post_id)),
        }
    }

    /// Comments on a post, oldest first.
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        self.ensure_post(post_id).await?;
        let comments = self.comments.find_by_posts(&[post_id]).await?;
        self.populator.comments(comments).await
    }

    /// Add a comment, optionally as a reply to another comment on the same post.
    pub async fn create(
        &self,
        actor: &Actor,
        post_id: Uuid,
        content: &str,
        parent_id: Option<Uuid>,
    ) -> Result<CommentView, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation("Please provide comment content".into()));
        }
        self.ensure_post(post_id).await?;

        if let Some(parent_id) = parent_id {
            let parent = self.comments.find_by_id(parent_id).await?;
            if parent.is_none_or(|p| p.post_id != post_id) {
                return Err(DomainError::Validation(
                    "Parent comment does not belong to this post".into(),
                ));
            }
        }

        let comment = self
            .comments
            .insert(Comment::new(post_id, actor.user_id, content.to_string(), parent_id))
            .await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment created");
        self.populator
            .comments(vec![comment])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal("populate dropped a comment".into()))
    }
}
