//! Content report entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::enums::{ContentType, ReportReason, ReportStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub content_id: Uuid,
    pub content_type: ContentType,
    pub reason: ReportReason,
    pub description: String,
    pub status: ReportStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Reporter,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::Report {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            reporter_id: model.reporter_id,
            content_id: model.content_id,
            content_type: model.content_type.into(),
            reason: model.reason.into(),
            description: model.description,
            status: model.status.into(),
            created_at: model.created_at.into(),
        }
    }
}

impl From<quill_core::domain::Report> for ActiveModel {
    fn from(report: quill_core::domain::Report) -> Self {
        Self {
            id: Set(report.id),
            reporter_id: Set(report.reporter_id),
            content_id: Set(report.content_id),
            content_type: Set(report.content_type.into()),
            reason: Set(report.reason.into()),
            description: Set(report.description),
            status: Set(report.status.into()),
            created_at: Set(report.created_at.into()),
        }
    }
}
