use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted report description, in characters.
pub const MAX_REPORT_DESCRIPTION: usize = 500;

/// Kind of content a report points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    Post,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Inappropriate,
    Spam,
    HateSpeech,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Reviewed,
    Resolved,
}

/// A user's complaint about a post or comment, reviewed by admins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub content_id: Uuid,
    pub content_type: ContentType,
    pub reason: ReportReason,
    pub description: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        reporter_id: Uuid,
        content_type: ContentType,
        content_id: Uuid,
        reason: ReportReason,
        description: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reporter_id,
            content_id,
            content_type,
            reason,
            description,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
