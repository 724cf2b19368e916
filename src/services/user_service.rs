use bcrypt::{hash, verify, DEFAULT_COST};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::database::UserStore;
use crate::models::{CreateUserRequest, LoginRequest, LoginResponse, User, UserResponse};
use crate::services::token_service::TokenService;
use crate::utils::AppError;

const MIN_PASSWORD_LEN: usize = 6;

/// User directory: registration, login and reporting hierarchy edges.
pub struct UserService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    hash_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self {
            users,
            tokens,
            hash_cost: DEFAULT_COST,
        }
    }

    /// Overrides the bcrypt cost (tests use the minimum to stay fast).
    #[cfg(test)]
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<UserResponse, AppError> {
        validate_new_user(&request)?;

        let email = request.email.trim().to_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("a user with this email already exists".to_string()));
        }

        let password = request.password;
        let cost = self.hash_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

        let user = User::new(email, password_hash, request.first_name, request.last_name);
        self.users.insert(&user).await?;

        Ok(user.into())
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.users.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: ObjectId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::user_not_found)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, AppError> {
        self.users
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(AppError::user_not_found)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let invalid = || AppError::unauthorized("Invalid credentials");

        let user = self
            .users
            .find_by_email(&request.email.trim().to_lowercase())
            .await?
            .ok_or_else(invalid)?;

        let stored_hash = user.password.clone();
        let valid = tokio::task::spawn_blocking(move || verify(request.password, &stored_hash))
            .await
            .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

        if !valid {
            return Err(invalid());
        }

        let token = self.tokens.generate(&user)?;

        Ok(LoginResponse {
            token,
            user: user.into(),
        })
    }

    /// Makes `reportee` report to `manager`, detaching it from any previous manager.
    pub async fn add_reportee(&self, manager_id: ObjectId, reportee_id: ObjectId) -> Result<User, AppError> {
        if manager_id == reportee_id {
            return Err(AppError::validation("a user cannot report to themselves"));
        }

        let manager = self.get_by_id(manager_id).await?;
        let reportee = self.get_by_id(reportee_id).await?;

        if let Some(previous) = reportee.reports_to {
            if previous != manager.id {
                self.users.remove_reportee(previous, reportee.id).await?;
            }
        }

        self.users.set_reports_to(reportee.id, Some(manager.id)).await?;
        self.users.add_reportee(manager.id, reportee.id).await?;

        log::info!("🔗 {} now reports to {}", reportee.id, manager.id);

        self.get_by_id(manager_id).await
    }

    pub async fn remove_reportee(&self, manager_id: ObjectId, reportee_id: ObjectId) -> Result<User, AppError> {
        let reportee = self.get_by_id(reportee_id).await?;

        if reportee.reports_to != Some(manager_id) {
            return Err(AppError::not_found("Reportee not found"));
        }

        self.users.set_reports_to(reportee.id, None).await?;
        self.users.remove_reportee(manager_id, reportee.id).await?;

        log::info!("✂️  {} no longer reports to {}", reportee.id, manager_id);

        self.get_by_id(manager_id).await
    }

    /// Same edge as [`UserService::add_reportee`], seen from the reportee.
    pub async fn assign_reports_to(&self, user_id: ObjectId, manager_id: ObjectId) -> Result<User, AppError> {
        self.add_reportee(manager_id, user_id).await?;
        self.get_by_id(user_id).await
    }
}

fn validate_new_user(request: &CreateUserRequest) -> Result<(), AppError> {
    let email = request.email.trim();
    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && !domain.is_empty())
        .unwrap_or(false);
    if !well_formed {
        return Err(AppError::validation("email must be a valid address"));
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    for (field, value) in [("firstName", &request.first_name), ("lastName", &request.last_name)] {
        if value.is_empty() || !value.chars().all(char::is_alphabetic) {
            return Err(AppError::validation(format!("{} must contain only letters", field)));
        }
    }

    Ok(())
}
