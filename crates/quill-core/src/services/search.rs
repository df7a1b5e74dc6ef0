use std::sync::Arc;

use super::populate::{Populator, WithComments};
use crate::domain::PostView;
use crate::error::DomainError;
use crate::ports::{PostRepository, Repositories};

/// Case-insensitive substring search over published posts.
#[derive(Clone)]
pub struct SearchService {
    posts: Arc<dyn PostRepository>,
    populator: Populator,
}

impl SearchService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            posts: repos.posts.clone(),
            populator: Populator::new(repos),
        }
    }

    /// Published posts whose title, content or a tag contains `query`.
    /// The query is matched literally, not as a pattern.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<PostView>, DomainError> {
        let query = query
            .filter(|q| !q.is_empty())
            .ok_or_else(|| DomainError::InvalidArgument("Please provide a search query".into()))?;

        let posts = self.posts.search_published(query).await?;
        tracing::debug!(query, hits = posts.len(), "Searched posts");

        self.populator.posts(posts, WithComments::No).await
    }
}
