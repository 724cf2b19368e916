use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OneToOne API",
        version = "1.0.0",
        description = "REST API for one-to-one manager/report relationships and weekly check-ins.\n\n**Authentication:** `/one-to-one/*`, `/user/current`, `/user/reportee/*` and `/user/reports-to/*` require a JWT Bearer token obtained from `/user/login`."
    ),
    paths(
        // Health
        crate::api::health::welcome,
        crate::api::health::health_check,

        // Users
        crate::api::users::create_user,
        crate::api::users::get_all_users,
        crate::api::users::get_user_by_email,
        crate::api::users::get_user_by_id,
        crate::api::users::login,
        crate::api::users::get_current_user,
        crate::api::users::add_reportee,
        crate::api::users::remove_reportee,
        crate::api::users::add_reports_to,

        // One-to-one
        crate::api::one_to_one::create_weekly_report,
        crate::api::one_to_one::get_all_for_reportee,
        crate::api::one_to_one::get_for_reportee,
        crate::api::one_to_one::update_for_reportee,
        crate::api::one_to_one::get_all_for_report_to,
        crate::api::one_to_one::get_for_report_to,
        crate::api::one_to_one::update_for_report_to,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::health::WelcomeResponse,
            crate::models::CreateUserRequest,
            crate::models::LoginRequest,
            crate::models::LoginResponse,
            crate::models::ReporteeRequest,
            crate::models::ReportsToRequest,
            crate::models::UserResponse,
            crate::models::WellbeingScores,
            crate::models::Agenda,
            crate::models::ThemedItem,
            crate::models::WeeklyReportContent,
            crate::models::UpdateWeeklyReportRequest,
            crate::models::WeeklyReportResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service banner and health check."),
        (name = "Users", description = "Registration, login and the reporting hierarchy."),
        (name = "One-to-one", description = "Weekly check-in reports, scoped to the caller acting as reportee or as the manager they report to."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /user/login"))
                        .build(),
                ),
            );
        }
    }
}
