//! In-memory store - used when no `DATABASE_URL` is configured, and by tests.
//!
//! Every table sits behind one async `RwLock`, so each repository call is a
//! single critical section. Data is lost on process restart.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{
    Category, Comment, Post, PostFilter, PostPatch, PostStatus, Report, ReportStatus, User,
};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostRepository, ReportRepository,
    Repositories, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    categories: Vec<Category>,
    comments: Vec<Comment>,
    reports: Vec<Report>,
}

/// A row type stored in one of the tables.
trait Row: Clone + Send + Sync + 'static {
    const TABLE: &'static str;

    fn id(&self) -> Uuid;
    fn table(tables: &Tables) -> &Vec<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self>;

    /// Whether `self` repeats a unique key already held by `other`.
    fn clashes(&self, _other: &Self) -> bool {
        false
    }

    /// Whether another table still points at the row `id`.
    fn referenced(_tables: &Tables, _id: Uuid) -> bool {
        false
    }
}

impl Row for User {
    const TABLE: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.users
    }
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.users
    }
    fn clashes(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl Row for Post {
    const TABLE: &'static str = "posts";

    fn id(&self) -> Uuid {
        self.id
    }
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.posts
    }
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.posts
    }
}

impl Row for Category {
    const TABLE: &'static str = "categories";

    fn id(&self) -> Uuid {
        self.id
    }
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.categories
    }
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.categories
    }
    fn clashes(&self, other: &Self) -> bool {
        self.name == other.name
    }
    fn referenced(tables: &Tables, id: Uuid) -> bool {
        tables.posts.iter().any(|p| p.category_id == id)
    }
}

impl Row for Comment {
    const TABLE: &'static str = "comments";

    fn id(&self) -> Uuid {
        self.id
    }
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.comments
    }
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.comments
    }
}

impl Row for Report {
    const TABLE: &'static str = "reports";

    fn id(&self) -> Uuid {
        self.id
    }
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.reports
    }
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.reports
    }
}

/// Process-local implementation of every repository port.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire every repository port to this store.
    pub fn repositories(self: Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            posts: self.clone(),
            categories: self.clone(),
            comments: self.clone(),
            reports: self,
        }
    }
}

/// Posts matching `keep`, newest first. Equal timestamps keep the most
/// recently inserted first.
fn newest_first<'a>(posts: &'a [Post], keep: impl Fn(&Post) -> bool) -> Vec<&'a Post> {
    let mut hits: Vec<&Post> = posts.iter().rev().filter(|p| keep(*p)).collect();
    hits.sort_by_key(|p| Reverse(p.created_at));
    hits
}

#[async_trait]
impl<T: Row> BaseRepository<T, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let tables = self.tables.read().await;
        Ok(T::table(&tables).iter().find(|row| row.id() == id).cloned())
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        let rows = T::table_mut(&mut tables);
        if rows
            .iter()
            .any(|row| row.id() == entity.id() || entity.clashes(row))
        {
            return Err(RepoError::Constraint(format!(
                "duplicate key in {}",
                T::TABLE
            )));
        }
        rows.push(entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if T::referenced(&tables, id) {
            return Err(RepoError::Constraint(format!(
                "{} row {id} is still referenced",
                T::TABLE
            )));
        }
        let rows = T::table_mut(&mut tables);
        let pos = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or(RepoError::NotFound)?;
        rows.remove(pos);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn find_page(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(newest_first(&tables.posts, |p| filter.matches(p))
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn search_published(&self, needle: &str) -> Result<Vec<Post>, RepoError> {
        let needle = needle.to_lowercase();
        let tables = self.tables.read().await;

        Ok(newest_first(&tables.posts, |p| {
            p.status == PostStatus::Published && p.mentions(&needle)
        })
        .into_iter()
        .cloned()
        .collect())
    }

    async fn update_fields(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.apply(patch);
        Ok(Some(post.clone()))
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Post>, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(None);
        };
        post.toggle_like(user_id);
        Ok(Some(post.clone()))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn rename(&self, id: Uuid, name: String) -> Result<Option<Category>, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.iter().any(|c| c.id != id && c.name == name) {
            return Err(RepoError::Constraint("duplicate key in categories".into()));
        }
        let Some(category) = tables.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.name = name;
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_posts(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| post_ids.contains(&c.post_id))
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn find_all(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, RepoError> {
        let tables = self.tables.read().await;
        let mut reports: Vec<Report> = tables
            .reports
            .iter()
            .rev()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        reports.sort_by_key(|r| Reverse(r.created_at));
        Ok(reports)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<Option<Report>, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(report) = tables.reports.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        report.status = status;
        Ok(Some(report.clone()))
    }
}

#[cfg(test)]
mod tests;
