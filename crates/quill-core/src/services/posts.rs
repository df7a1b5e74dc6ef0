//! Post authoring: create, edit and delete.

use std::sync::Arc;

use uuid::Uuid;

use super::populate::{Populator, WithComments};
use crate::domain::{Actor, Post, PostPatch, PostView};
use crate::error::{DomainError, RepoError};
use crate::ports::{CategoryRepository, PostRepository, Repositories};

/// Input for a new post. Required fields are optional here so that absence
/// is reported as an argument error rather than a decode failure.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<Uuid>,
    pub image: Option<String>,
    pub tags: Vec<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    populator: Populator,
}

impl PostService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            posts: repos.posts.clone(),
            categories: repos.categories.clone(),
            populator: Populator::new(repos),
        }
    }

    async fn ensure_category(&self, id: Uuid) -> Result<(), DomainError> {
        match self.categories.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::Validation(format!("Category {id} does not exist"))),
        }
    }

    async fn owned_post(&self, actor: &Actor, id: Uuid) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;
        if !actor.can_modify(post.author_id) {
            return Err(DomainError::Unauthorized);
        }
        Ok(post)
    }

    /// Publish a new post authored by `actor`.
    pub async fn create(&self, actor: &Actor, draft: PostDraft) -> Result<PostView, DomainError> {
        let (Some(title), Some(content), Some(category_id)) = (
            non_blank(draft.title),
            non_blank(draft.content),
            draft.category_id,
        ) else {
            return Err(DomainError::InvalidArgument(
                "Please provide title, content, and category".into(),
            ));
        };
        self.ensure_category(category_id).await?;

        let post = Post::new(actor.user_id, category_id, title, content)
            .with_image(draft.image)
            .with_tags(draft.tags);
        let post = self.posts.insert(post).await?;

        tracing::info!(post_id = %post.id, author_id = %actor.user_id, "Post created");
        self.populator.post(post, WithComments::No).await
    }

    /// Edit a post. Only the owner or an admin may do so.
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        mut patch: PostPatch,
    ) -> Result<PostView, DomainError> {
        self.owned_post(actor, id).await?;

        if patch.title.is_some() {
            patch.title = Some(
                non_blank(patch.title)
                    .ok_or_else(|| DomainError::Validation("Title cannot be empty".into()))?,
            );
        }
        if patch.content.is_some() {
            patch.content = Some(
                non_blank(patch.content)
                    .ok_or_else(|| DomainError::Validation("Content cannot be empty".into()))?,
            );
        }
        if let Some(category_id) = patch.category_id {
            self.ensure_category(category_id).await?;
        }

        let post = self
            .posts
            .update_fields(id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        tracing::info!(post_id = %id, actor = %actor.user_id, "Post updated");
        self.populator.post(post, WithComments::No).await
    }

    /// Delete a post. Its comments are left in place.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), DomainError> {
        self.owned_post(actor, id).await?;
        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", id),
            e => e.into(),
        })?;
        tracing::info!(post_id = %id, actor = %actor.user_id, "Post deleted");
        Ok(())
    }
}
