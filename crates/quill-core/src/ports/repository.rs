use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Post, PostFilter, PostPatch, Report, ReportStatus, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique-key clashes fail with `RepoError::Constraint`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User lookups used to populate author names.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Fetch all users among `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Count posts matching `filter`.
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    /// Posts matching `filter`, newest first, skipping `offset` and returning at most `limit`.
    async fn find_page(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Published posts whose title, content or any tag contains `needle`,
    /// ignoring case. Newest first.
    async fn search_published(&self, needle: &str) -> Result<Vec<Post>, RepoError>;

    /// Write the fields set in `patch`. `None` if the post does not exist.
    async fn update_fields(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError>;

    /// Atomically add `user_id` to the likes if absent, or remove it if present.
    /// `None` if the post does not exist.
    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Post>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// All categories ordered by name.
    async fn find_all(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError>;

    /// Change the name of a category. `None` if it does not exist.
    async fn rename(&self, id: Uuid, name: String) -> Result<Option<Category>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on any of `post_ids`, oldest first.
    async fn find_by_posts(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>, RepoError>;
}

/// Content report repository.
#[async_trait]
pub trait ReportRepository: BaseRepository<Report, Uuid> {
    /// Reports newest first, optionally restricted to one status.
    async fn find_all(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, RepoError>;

    async fn set_status(&self, id: Uuid, status: ReportStatus)
    -> Result<Option<Report>, RepoError>;
}

/// Every repository the services need, constructed once by the entry point.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub reports: Arc<dyn ReportRepository>,
}
