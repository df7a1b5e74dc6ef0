//! PostgreSQL repository implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, Unchanged,
};
use sea_orm::{ActiveModelTrait, DbConn};
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Post, PostFilter, PostPatch, Report, ReportStatus, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    CategoryRepository, CommentRepository, PostRepository, ReportRepository, Repositories,
    UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::enums;
use super::entity::post::{self, Entity as PostEntity};
use super::entity::report::{self, Entity as ReportEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL report repository.
pub type PostgresReportRepository = PostgresBaseRepository<ReportEntity>;

/// Case-insensitive containment over title, content and every tag.
/// Bound three times with the same `%needle%` pattern.
const SEARCH_CLAUSE: &str = r#"("posts"."title" ILIKE ? OR "posts"."content" ILIKE ? OR EXISTS (SELECT 1 FROM unnest("posts"."tags") AS tag WHERE tag ILIKE ?))"#;

/// Add-if-absent / remove-if-present on the likes array in one statement.
/// Bound three times with the user id.
const TOGGLE_LIKE: &str = r#"CASE WHEN ? = ANY("likes") THEN array_remove("likes", ?) ELSE array_append("likes", ?) END"#;

/// Wire every repository port to the same connection pool.
pub fn postgres_repositories(db: DbConn) -> Repositories {
    let db = Arc::new(db);
    Repositories {
        users: Arc::new(PostgresUserRepository::new(db.clone())),
        posts: Arc::new(PostgresPostRepository::new(db.clone())),
        categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
        comments: Arc::new(PostgresCommentRepository::new(db.clone())),
        reports: Arc::new(PostgresReportRepository::new(db)),
    }
}

/// Escape LIKE metacharacters so the needle matches literally.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn post_condition(filter: &PostFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(author_id) = filter.author_id {
        condition = condition.add(post::Column::AuthorId.eq(author_id));
    }
    condition
}

/// A missing row on `UPDATE … RETURNING` is reported as `None`.
fn updated<M, T: From<M>>(result: Result<M, DbErr>) -> Result<Option<T>, RepoError> {
    match result {
        Ok(model) => Ok(Some(model.into())),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(map_db_err(e)),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        tracing::debug!(count = ids.len(), "Finding users by id");

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post_condition(filter))
            .count(self.conn())
            .await
            .map_err(map_db_err)
    }

    async fn find_page(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(author = ?filter.author_id, offset, limit, "Finding page of posts");

        let result = PostEntity::find()
            .filter(post_condition(filter))
            .order_by_desc(post::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn search_published(&self, needle: &str) -> Result<Vec<Post>, RepoError> {
        let pattern = like_pattern(needle);
        tracing::debug!(%pattern, "Searching published posts");

        let result = PostEntity::find()
            .filter(post::Column::Status.eq(enums::PostStatus::Published))
            .filter(Expr::cust_with_values(
                SEARCH_CLAUSE,
                [pattern.clone(), pattern.clone(), pattern],
            ))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_fields(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let mut active = post::ActiveModel {
            id: Unchanged(id),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(category_id) = patch.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(image) = patch.image {
            active.image = Set(Some(image));
        }
        if let Some(tags) = patch.tags {
            active.tags = Set(tags);
        }
        if let Some(status) = patch.status {
            active.status = Set(status.into());
        }

        updated(active.update(self.conn()).await)
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Post>, RepoError> {
        let rows = PostEntity::update_many()
            .col_expr(
                post::Column::Likes,
                Expr::cust_with_values(TOGGLE_LIKE, [user_id, user_id, user_id]),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec_with_returning(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().next().map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn rename(&self, id: Uuid, name: String) -> Result<Option<Category>, RepoError> {
        let active = category::ActiveModel {
            id: Unchanged(id),
            name: Set(name),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        updated(active.update(self.conn()).await)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_posts(&self, post_ids: &[Uuid]) -> Result<Vec<Comment>, RepoError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = CommentEntity::find()
            .filter(comment::Column::PostId.is_in(post_ids.iter().copied()))
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn find_all(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, RepoError> {
        let mut query = ReportEntity::find();
        if let Some(status) = status {
            query = query.filter(report::Column::Status.eq(enums::ReportStatus::from(status)));
        }

        let result = query
            .order_by_desc(report::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<Option<Report>, RepoError> {
        let active = report::ActiveModel {
            id: Unchanged(id),
            status: Set(status.into()),
            ..Default::default()
        };

        updated(active.update(self.conn()).await)
    }
}
