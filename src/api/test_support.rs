use actix_web::web;
use chrono::Duration;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::memory::{MemoryReportStore, MemoryUserStore};
use crate::database::{ReportStore, UserStore};
use crate::models::{CreateUserRequest, User};
use crate::services::{ReportService, TokenService, UserService};

/// Application state wired to in-memory stores.
pub struct TestState {
    pub users: web::Data<UserService>,
    pub reports: web::Data<ReportService>,
    pub tokens: web::Data<TokenService>,
    pub config: web::Data<AppConfig>,
    user_store: Arc<MemoryUserStore>,
}

impl TestState {
    pub fn new() -> Self {
        let user_store = Arc::new(MemoryUserStore::default());
        let report_store: Arc<dyn ReportStore> = Arc::new(MemoryReportStore::default());
        let tokens = TokenService::new("test-secret", "tests", Duration::hours(1));
        let config = AppConfig::from_lookup(|_| None).expect("default config");

        Self {
            users: web::Data::new(
                UserService::new(user_store.clone(), tokens.clone()).with_hash_cost(4),
            ),
            reports: web::Data::new(ReportService::new(user_store.clone(), report_store)),
            tokens: web::Data::new(tokens),
            config: web::Data::new(config),
            user_store,
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.users.clone())
            .app_data(self.reports.clone())
            .app_data(self.tokens.clone())
            .app_data(self.config.clone());
        crate::api::configure(cfg);
    }

    pub async fn register(&self, email: &str, password: &str) -> User {
        let created = self
            .users
            .create(CreateUserRequest {
                email: email.into(),
                password: password.into(),
                first_name: "Test".into(),
                last_name: "User".into(),
            })
            .await
            .expect("create user");
        let id = ObjectId::parse_str(&created.id).expect("hex id");
        self.users.get_by_id(id).await.expect("stored user")
    }

    /// Registers a manager and a reportee linked to them.
    pub async fn pair(&self) -> (User, User) {
        let manager = self.register("manager@example.com", "secret1").await;
        let reportee = self.register("reportee@example.com", "secret1").await;
        self.users
            .add_reportee(manager.id, reportee.id)
            .await
            .expect("link reportee");
        let reportee = self.user_store.find_by_id(reportee.id).await.unwrap().unwrap();
        (manager, reportee)
    }

    pub fn bearer(&self, user: &User) -> (&'static str, String) {
        let token = self.tokens.generate(user).expect("token");
        ("Authorization", format!("Bearer {}", token))
    }
}
