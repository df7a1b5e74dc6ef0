use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Actor, ContentType, MAX_REPORT_DESCRIPTION, Report, ReportReason, ReportStatus,
};
use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository, Repositories, ReportRepository};

/// A complaint as submitted by a user.
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub content_type: ContentType,
    pub content_id: Uuid,
    pub reason: ReportReason,
    pub description: String,
}

/// Content reports: filed by any user, reviewed by admins.
#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl ReportService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            reports: repos.reports.clone(),
            posts: repos.posts.clone(),
            comments: repos.comments.clone(),
        }
    }

    async fn content_exists(&self, kind: ContentType, id: Uuid) -> Result<bool, DomainError> {
        Ok(match kind {
            ContentType::Post => self.posts.find_by_id(id).await?.is_some(),
            ContentType::Comment => self.comments.find_by_id(id).await?.is_some(),
        })
    }

    pub async fn file(&self, actor: &Actor, draft: ReportDraft) -> Result<Report, DomainError> {
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(DomainError::Validation("Please provide a description".into()));
        }
        if description.chars().count() > MAX_REPORT_DESCRIPTION {
            return Err(DomainError::Validation(format!(
                "Description cannot be more than {MAX_REPORT_DESCRIPTION} characters"
            )));
        }
        if !self.content_exists(draft.content_type, draft.content_id).await? {
            let entity = match draft.content_type {
                ContentType::Post => "Post",
                ContentType::Comment => "Comment",
            };
            return Err(DomainError::not_found(entity, draft.content_id));
        }

        let report = Report::new(
            actor.user_id,
            draft.content_type,
            draft.content_id,
            draft.reason,
            description.to_string(),
        );
        let report = self.reports.insert(report).await?;

        tracing::info!(
            report_id = %report.id,
            content_id = %report.content_id,
            reason = ?report.reason,
            "Report filed"
        );
        Ok(report)
    }

    pub async fn list(
        &self,
        actor: &Actor,
        status: Option<ReportStatus>,
    ) -> Result<Vec<Report>, DomainError> {
        if !actor.is_admin() {
            return Err(DomainError::Unauthorized);
        }
        Ok(self.reports.find_all(status).await?)
    }

    pub async fn set_status(
        &self,
        actor: &Actor,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<Report, DomainError> {
        if !actor.is_admin() {
            return Err(DomainError::Unauthorized);
        }
        let report = self
            .reports
            .set_status(id, status)
            .await?
            .ok_or_else(|| DomainError::not_found("Report", id))?;

        tracing::info!(report_id = %id, status = ?status, "Report status changed");
        Ok(report)
    }
}
