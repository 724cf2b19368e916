pub mod health;
pub mod one_to_one;
pub mod response;
pub mod swagger;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, HttpRequest,
};
use std::fmt::Display;
use mongodb::bson::oid::ObjectId;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

/// Registers every route. Services (`UserService`, `ReportService`,
/// `TokenService`, `AppConfig`) must already be in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}")
                .url("/api-docs/openapi.json", swagger::ApiDoc::openapi()),
        )
        .route("/", web::get().to(health::welcome))
        .route("/health", web::get().to(health::health_check))
        // Users: registration and lookup are public, hierarchy edits need a JWT
        .service(
            web::scope("/user")
                .route("/create", web::post().to(users::create_user))
                .route("/all", web::get().to(users::get_all_users))
                .route("/email/{email}", web::get().to(users::get_user_by_email))
                .route("/id/{id}", web::get().to(users::get_user_by_id))
                .route("/login", web::post().to(users::login))
                .service(
                    web::resource("/current")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(users::get_current_user)),
                )
                .service(
                    web::resource("/reportee/add")
                        .wrap(AuthMiddleware)
                        .route(web::post().to(users::add_reportee)),
                )
                .service(
                    web::resource("/reportee/remove")
                        .wrap(AuthMiddleware)
                        .route(web::post().to(users::remove_reportee)),
                )
                .service(
                    web::resource("/reports-to/add")
                        .wrap(AuthMiddleware)
                        .route(web::post().to(users::add_reports_to)),
                ),
        )
        // One-to-one: every route requires a JWT
        .service(
            web::scope("/one-to-one")
                .wrap(AuthMiddleware)
                .route("/create", web::post().to(one_to_one::create_weekly_report))
                .route("/reportee/all", web::get().to(one_to_one::get_all_for_reportee))
                .route("/reportee", web::get().to(one_to_one::get_for_reportee))
                .route("/reportee/update", web::put().to(one_to_one::update_for_reportee))
                .route("/report-to/all", web::get().to(one_to_one::get_all_for_report_to))
                .route("/report-to", web::get().to(one_to_one::get_for_report_to))
                .route("/report-to/update", web::put().to(one_to_one::update_for_report_to)),
        );
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    invalid_request("JSON body", err, req)
}

fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    invalid_request("query string", err, req)
}

fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    invalid_request("path", err, req)
}

fn invalid_request(part: &str, err: impl Display, req: &HttpRequest) -> actix_web::Error {
    log::warn!("❌ {} {} - invalid {}: {}", req.method(), req.path(), part, err);
    AppError::validation(err.to_string()).into()
}

pub(crate) fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::validation(format!("Invalid {}", what)))
}
