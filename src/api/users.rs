use actix_web::{web, HttpResponse};

use super::parse_object_id;
use crate::api::response::ApiResponse;
use crate::models::{
    CreateUserRequest, LoginRequest, LoginResponse, ReporteeRequest, ReportsToRequest, UserResponse,
};
use crate::services::token_service::Claims;
use crate::services::user_service::UserService;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/user/create",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Invalid request format or parameters"),
        (status = 409, description = "A user with this email already exists")
    )
)]
pub async fn create_user(
    users: web::Data<UserService>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /user/create - email: {}", request.email);

    let user = users.create(request.into_inner()).await?;

    log::info!("✅ User created: {}", user.id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Created user successfully", user)))
}

#[utoipa::path(
    get,
    path = "/user/all",
    tag = "Users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = [UserResponse])
    )
)]
pub async fn get_all_users(users: web::Data<UserService>) -> Result<HttpResponse, AppError> {
    log::info!("👥 GET /user/all");

    let all = users.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Retrieved users successfully", all)))
}

#[utoipa::path(
    get,
    path = "/user/email/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User retrieved successfully", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_email(
    users: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    log::info!("🔎 GET /user/email/{}", email);

    let user = users.get_by_email(&email).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Retrieved user successfully",
        UserResponse::from(user),
    )))
}

#[utoipa::path(
    get,
    path = "/user/id/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id (hex ObjectId)")),
    responses(
        (status = 200, description = "User retrieved successfully", body = UserResponse),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_id(
    users: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path.into_inner(), "user ID")?;
    log::info!("🔎 GET /user/id/{}", id);

    let user = users.get_by_id(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Retrieved user successfully",
        UserResponse::from(user),
    )))
}

#[utoipa::path(
    post,
    path = "/user/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "User logged in successfully", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    users: web::Data<UserService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let email = request.email.clone();
    log::info!("🔐 POST /user/login - email: {}", email);

    match users.login(request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", email);
            Ok(HttpResponse::Ok().json(ApiResponse::success("User logged in successfully", response)))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/user/current",
    tag = "Users",
    responses(
        (status = 200, description = "User retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(
    users: web::Data<UserService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /user/current - {}", claims.email);

    let user = users.get_by_email(&claims.email).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Retrieved user successfully",
        UserResponse::from(user),
    )))
}

#[utoipa::path(
    post,
    path = "/user/reportee/add",
    tag = "Users",
    request_body = ReporteeRequest,
    responses(
        (status = 200, description = "Reportee added; returns the caller", body = UserResponse),
        (status = 400, description = "Invalid or self-referencing id"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_reportee(
    users: web::Data<UserService>,
    claims: web::ReqData<Claims>,
    request: web::Json<ReporteeRequest>,
) -> Result<HttpResponse, AppError> {
    let manager_id = claims.user_id()?;
    let reportee_id = parse_object_id(&request.reportee_id, "reportee ID")?;
    log::info!("🔗 POST /user/reportee/add - {} -> {}", reportee_id, manager_id);

    let manager = users.add_reportee(manager_id, reportee_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Added reportee successfully",
        UserResponse::from(manager),
    )))
}

#[utoipa::path(
    post,
    path = "/user/reportee/remove",
    tag = "Users",
    request_body = ReporteeRequest,
    responses(
        (status = 200, description = "Reportee removed; returns the caller", body = UserResponse),
        (status = 404, description = "Reportee not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_reportee(
    users: web::Data<UserService>,
    claims: web::ReqData<Claims>,
    request: web::Json<ReporteeRequest>,
) -> Result<HttpResponse, AppError> {
    let manager_id = claims.user_id()?;
    let reportee_id = parse_object_id(&request.reportee_id, "reportee ID")?;
    log::info!("✂️  POST /user/reportee/remove - {} -/-> {}", reportee_id, manager_id);

    let manager = users.remove_reportee(manager_id, reportee_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Removed reportee successfully",
        UserResponse::from(manager),
    )))
}

#[utoipa::path(
    post,
    path = "/user/reports-to/add",
    tag = "Users",
    request_body = ReportsToRequest,
    responses(
        (status = 200, description = "Manager assigned; returns the caller", body = UserResponse),
        (status = 400, description = "Invalid or self-referencing id"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_reports_to(
    users: web::Data<UserService>,
    claims: web::ReqData<Claims>,
    request: web::Json<ReportsToRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let manager_id = parse_object_id(&request.reports_to_id, "reportsTo ID")?;
    log::info!("🔗 POST /user/reports-to/add - {} -> {}", user_id, manager_id);

    let user = users.assign_reports_to(user_id, manager_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Assigned manager successfully",
        UserResponse::from(user),
    )))
}
