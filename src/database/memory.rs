//! In-process stores backing the service and HTTP tests.

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{ReportStore, UserStore};
use crate::models::{User, WeeklyReport};
use crate::services::access::ReportScope;
use crate::utils::AppError;

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<ObjectId, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("a user with this email already exists".into()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.values().find(|u| u.email == email).cloned())
    }

    async fn set_reports_to(&self, id: ObjectId, manager: Option<ObjectId>) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or_else(AppError::user_not_found)?;
        user.reports_to = manager;
        user.updated_at = BsonDateTime::now();
        Ok(())
    }

    async fn add_reportee(&self, manager: ObjectId, reportee: ObjectId) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&manager).ok_or_else(AppError::user_not_found)?;
        if !user.reportees.contains(&reportee) {
            user.reportees.push(reportee);
        }
        user.updated_at = BsonDateTime::now();
        Ok(())
    }

    async fn remove_reportee(&self, manager: ObjectId, reportee: ObjectId) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&manager).ok_or_else(AppError::user_not_found)?;
        user.reportees.retain(|id| *id != reportee);
        user.updated_at = BsonDateTime::now();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryReportStore {
    reports: RwLock<Vec<WeeklyReport>>,
}

impl MemoryReportStore {
    /// Unscoped view of everything stored, for assertions.
    pub async fn all(&self) -> Vec<WeeklyReport> {
        self.reports.read().await.clone()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn insert(&self, report: &WeeklyReport) -> Result<(), AppError> {
        self.reports.write().await.push(report.clone());
        Ok(())
    }

    async fn find_in_scope(&self, scope: &ReportScope) -> Result<Vec<WeeklyReport>, AppError> {
        let mut reports: Vec<WeeklyReport> = self
            .reports
            .read()
            .await
            .iter()
            .filter(|r| scope.matches(r))
            .cloned()
            .collect();
        reports.sort_by(|a, b| (b.year, b.week).cmp(&(a.year, a.week)));
        Ok(reports)
    }

    async fn find_by_week_year(
        &self,
        scope: &ReportScope,
        week: i32,
        year: i32,
    ) -> Result<Option<WeeklyReport>, AppError> {
        Ok(self
            .reports
            .read()
            .await
            .iter()
            .find(|r| scope.matches(r) && r.week == week && r.year == year)
            .cloned())
    }

    async fn find_by_id(&self, scope: &ReportScope, id: ObjectId) -> Result<Option<WeeklyReport>, AppError> {
        Ok(self
            .reports
            .read()
            .await
            .iter()
            .find(|r| scope.matches(r) && r.id == id)
            .cloned())
    }

    async fn replace(&self, scope: &ReportScope, report: &WeeklyReport) -> Result<bool, AppError> {
        let mut reports = self.reports.write().await;
        match reports.iter_mut().find(|r| scope.matches(r) && r.id == report.id) {
            Some(stored) => {
                *stored = report.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
