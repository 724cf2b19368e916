use actix_web::{web, HttpRequest, HttpResponse};

use super::parse_object_id;
use crate::api::response::ApiResponse;
use crate::models::{UpdateWeeklyReportRequest, WeekYearQuery, WeeklyReportContent, WeeklyReportResponse};
use crate::services::access::ReportRole;
use crate::services::report_service::ReportService;
use crate::services::token_service::Claims;
use crate::utils::{resolve_week_and_year, AppError};

#[utoipa::path(
    post,
    path = "/one-to-one/create",
    tag = "One-to-one",
    request_body = WeeklyReportContent,
    responses(
        (status = 201, description = "Weekly report created successfully", body = WeeklyReportResponse),
        (status = 400, description = "Invalid request format or parameters"),
        (status = 422, description = "The caller has no manager to report to")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_weekly_report(
    reports: web::Data<ReportService>,
    claims: web::ReqData<Claims>,
    request: web::Json<WeeklyReportContent>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    log::info!(
        "📝 POST /one-to-one/create - user: {}, week {}/{}",
        user_id,
        request.week,
        request.year
    );

    let report = reports.create(user_id, request.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Created weekly report successfully",
        WeeklyReportResponse::from(report),
    )))
}

async fn list_reports(
    reports: web::Data<ReportService>,
    claims: web::ReqData<Claims>,
    role: ReportRole,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    log::info!("📋 GET /one-to-one/{}/all - user: {}", role, user_id);

    let list: Vec<WeeklyReportResponse> = reports
        .list(user_id, role)
        .await?
        .into_iter()
        .map(WeeklyReportResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Fetched all weekly reports successfully",
        list,
    )))
}

async fn get_report(
    reports: web::Data<ReportService>,
    claims: web::ReqData<Claims>,
    req: &HttpRequest,
    role: ReportRole,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let query = week_year_query(req.query_string());
    let (week, year) = resolve_week_and_year(query.week.as_deref(), query.year.as_deref());
    log::info!("🔎 GET /one-to-one/{} - user: {}, week {}/{}", role, user_id, week, year);

    let report = reports.get_by_week_year(user_id, week, year, role).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Fetched weekly report successfully",
        WeeklyReportResponse::from(report),
    )))
}

/// Reads `week`/`year` leniently: repeated keys keep their first value, and
/// anything unusable is left to the current-week fallback.
fn week_year_query(raw: &str) -> WeekYearQuery {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(raw)
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let first = |key: &str| {
        pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    };

    WeekYearQuery {
        week: first("week"),
        year: first("year"),
    }
}

async fn update_report(
    reports: web::Data<ReportService>,
    claims: web::ReqData<Claims>,
    request: web::Json<UpdateWeeklyReportRequest>,
    role: ReportRole,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let request = request.into_inner();
    let report_id = parse_object_id(&request.id, "report ID")?;
    log::info!("✏️  PUT /one-to-one/{}/update - user: {}, report: {}", role, user_id, report_id);

    match reports.update(user_id, report_id, request.content, role).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            "Updated weekly report successfully",
            WeeklyReportResponse::from(report),
        ))),
        Err(e) => {
            log::warn!("❌ Update of report {} as {} failed: {}", report_id, role, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/one-to-one/reportee/all",
    tag = "One-to-one",
    responses(
        (status = 200, description = "Reports written by the caller, most recent first", body = [WeeklyReportResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_all_for_reportee(
    reports: web::Data<ReportService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    list_reports(reports, claims, ReportRole::AsReportee).await
}

#[utoipa::path(
    get,
    path = "/one-to-one/reportee",
    tag = "One-to-one",
    params(WeekYearQuery),
    responses(
        (status = 200, description = "Weekly report", body = WeeklyReportResponse),
        (status = 404, description = "No weekly report found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_for_reportee(
    reports: web::Data<ReportService>,
    claims: web::ReqData<Claims>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    get_report(reports, claims, &req, ReportRole::AsReportee).await
}

#[utoipa::path(
    put,
    path = "/one-to-one/reportee/update",
    tag = "One-to-one",
    request_body = UpdateWeeklyReportRequest,
    responses(
        (status = 200, description = "Weekly report updated successfully", body = WeeklyReportResponse),
        (status = 400, description = "Invalid request format or parameters"),
        (status = 404, description = "No weekly report found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_for_reportee(
    reports: web::Data<ReportService>,
    claims: web::ReqData<Claims>,
    request: web::Json<UpdateWeeklyReportRequest>,
) -> Result<HttpResponse, AppError> {
    update_report(reports, claims, request, ReportRole::AsReportee).await
}

#[utoipa::path(
    get,
    path = "/one-to-one/report-to/all",
    tag = "One-to-one",
    responses(
        (status = 200, description = "Reports addressed to the caller, most recent first", body = [WeeklyReportResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_all_for_report_to(
    reports: web::Data<ReportService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    list_reports(reports, claims, ReportRole::AsReportingTo).await
}

#[utoipa::path(
    get,
    path = "/one-to-one/report-to",
    tag = "One-to-one",
    params(WeekYearQuery),
    responses(
        (status = 200, description = "Weekly report", body = WeeklyReportResponse),
        (status = 404, description = "No weekly report found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_for_report_to(
    reports: web::Data<ReportService>,
    claims: web::ReqData<Claims>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    get_report(reports, claims, &req, ReportRole::AsReportingTo).await
}

#[utoipa::path(
    put,
    path = "/one-to-one/report-to/update",
    tag = "One-to-one",
    request_body = UpdateWeeklyReportRequest,
    responses(
        (status = 200, description = "Weekly report updated successfully", body = WeeklyReportResponse),
        (status = 400, description = "Invalid request format or parameters"),
        (status = 404, description = "No weekly report found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_for_report_to(
    reports: web::Data<ReportService>,
    claims: web::ReqData<Claims>,
    request: web::Json<UpdateWeeklyReportRequest>,
) -> Result<HttpResponse, AppError> {
    update_report(reports, claims, request, ReportRole::AsReportingTo).await
}
