//! Paginated, populated post listings.

use std::sync::Arc;

use uuid::Uuid;

use super::populate::{Populator, WithComments};
use crate::domain::{Page, PageRequest, PostFilter, PostView};
use crate::error::DomainError;
use crate::ports::{PostRepository, Repositories};

/// Build a listing filter from the raw `author` query value. An empty value
/// means no filter.
pub fn author_filter(raw: Option<&str>) -> Result<PostFilter, DomainError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(PostFilter::default()),
        Some(raw) => Uuid::parse_str(raw)
            .map(PostFilter::by_author)
            .map_err(|_| DomainError::InvalidArgument(format!("Invalid author id: {raw}"))),
    }
}

#[derive(Clone)]
pub struct ListingService {
    posts: Arc<dyn PostRepository>,
    populator: Populator,
}

impl ListingService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            posts: repos.posts.clone(),
            populator: Populator::new(repos),
        }
    }

    /// One page of posts matching `filter`, newest first, with author,
    /// category and comments populated. `total` counts the whole filtered set.
    pub async fn list(
        &self,
        filter: PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, DomainError> {
        let total = self.posts.count(&filter).await?;
        let posts = self
            .posts
            .find_page(&filter, page.start_index(), page.limit())
            .await?;
        let items = self.populator.posts(posts, WithComments::Yes).await?;

        tracing::debug!(
            author = ?filter.author_id,
            page = page.page(),
            limit = page.limit(),
            total,
            returned = items.len(),
            "Listed posts"
        );

        Ok(Page {
            items,
            total,
            pagination: page.links(total),
        })
    }

    /// A single post, populated the same way as a listing item.
    pub async fn get(&self, id: Uuid) -> Result<PostView, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;
        self.populator.post(post, WithComments::Yes).await
    }
}
