//! Content report endpoints. Anyone signed in may file; admins review.

use actix_web::{HttpResponse, web};
use quill_core::domain::{ContentType, ReportReason, ReportStatus};
use quill_core::services::ReportDraft;
use quill_shared::dto::{CreateReportRequest, ListReportsQuery, UpdateReportRequest};
use quill_shared::{ApiResponse, ListResponse};
use uuid::Uuid;

use super::parse_enum;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/reports
pub async fn create_report(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreateReportRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let draft = ReportDraft {
        content_type: parse_enum::<ContentType>("contentType", &body.content_type)?,
        content_id: body.reported_content,
        reason: parse_enum::<ReportReason>("reason", &body.reason)?,
        description: body.description,
    };

    let report = state.services.reports.file(&identity.actor(), draft).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(report)))
}

/// GET /api/v1/reports?status
pub async fn list_reports(
    identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<ListReportsQuery>,
) -> AppResult<HttpResponse> {
    let status = query
        .status
        .as_deref()
        .map(|raw| parse_enum::<ReportStatus>("status", raw))
        .transpose()?;

    let reports = state.services.reports.list(&identity.actor(), status).await?;
    Ok(HttpResponse::Ok().json(ListResponse::ok(reports)))
}

/// PUT /api/v1/reports/{id}
pub async fn update_report(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateReportRequest>,
) -> AppResult<HttpResponse> {
    let status = parse_enum::<ReportStatus>("status", &body.status)?;

    let report = state
        .services
        .reports
        .set_status(&identity.actor(), path.into_inner(), status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(report)))
}
