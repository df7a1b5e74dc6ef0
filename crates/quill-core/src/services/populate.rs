//! Read-time joins from stored references to display names.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{CategorySummary, Comment, CommentView, Post, PostView, UserSummary};
use crate::error::DomainError;
use crate::ports::{CategoryRepository, CommentRepository, Repositories, UserRepository};

/// Whether populated posts carry their comment thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithComments {
    Yes,
    No,
}

/// Batches the reference lookups for a set of posts into one query per
/// collection. Never writes.
#[derive(Clone)]
pub struct Populator {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    comments: Arc<dyn CommentRepository>,
}

fn unique(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl Populator {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            users: repos.users.clone(),
            categories: repos.categories.clone(),
            comments: repos.comments.clone(),
        }
    }

    async fn user_names(
        &self,
        ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, UserSummary>, DomainError> {
        let ids = unique(ids);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = self.users.find_by_ids(&ids).await?;
        Ok(users.iter().map(|u| (u.id, UserSummary::from(u))).collect())
    }

    /// Populate author, category and optionally comments, preserving order.
    pub async fn posts(
        &self,
        posts: Vec<Post>,
        with_comments: WithComments,
    ) -> Result<Vec<PostView>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let comments = match with_comments {
            WithComments::Yes => self.comments.find_by_posts(&post_ids).await?,
            WithComments::No => Vec::new(),
        };

        let author_ids = posts
            .iter()
            .map(|p| p.author_id)
            .chain(comments.iter().map(|c| c.author_id))
            .collect();
        let users = self.user_names(author_ids).await?;

        let category_ids = unique(posts.iter().map(|p| p.category_id).collect());
        let categories: HashMap<Uuid, CategorySummary> = self
            .categories
            .find_by_ids(&category_ids)
            .await?
            .iter()
            .map(|c| (c.id, CategorySummary::from(c)))
            .collect();

        let mut threads: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
        for comment in comments {
            let author = users.get(&comment.author_id).cloned();
            threads
                .entry(comment.post_id)
                .or_default()
                .push(CommentView::new(comment, author));
        }

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = users.get(&post.author_id).cloned();
                let category = categories.get(&post.category_id).cloned();
                let comments = (with_comments == WithComments::Yes)
                    .then(|| threads.remove(&post.id).unwrap_or_default());
                PostView::new(post, author, category, comments)
            })
            .collect())
    }

    pub async fn post(
        &self,
        post: Post,
        with_comments: WithComments,
    ) -> Result<PostView, DomainError> {
        self.posts(vec![post], with_comments)
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal("populate dropped a post".into()))
    }

    pub async fn comments(&self, comments: Vec<Comment>) -> Result<Vec<CommentView>, DomainError> {
        let users = self
            .user_names(comments.iter().map(|c| c.author_id).collect())
            .await?;
        Ok(comments
            .into_iter()
            .map(|c| {
                let author = users.get(&c.author_id).cloned();
                CommentView::new(c, author)
            })
            .collect())
    }
}
