use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;

use super::{MongoDB, WEEKLY_REPORTS_COLLECTION};
use crate::models::WeeklyReport;
use crate::services::access::ReportScope;
use crate::utils::AppError;

/// Persistence for weekly reports. Every query is bounded by a [`ReportScope`].
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn insert(&self, report: &WeeklyReport) -> Result<(), AppError>;

    /// All reports in scope, most recent (year, week) first.
    async fn find_in_scope(&self, scope: &ReportScope) -> Result<Vec<WeeklyReport>, AppError>;

    async fn find_by_week_year(
        &self,
        scope: &ReportScope,
        week: i32,
        year: i32,
    ) -> Result<Option<WeeklyReport>, AppError>;

    async fn find_by_id(&self, scope: &ReportScope, id: ObjectId) -> Result<Option<WeeklyReport>, AppError>;

    /// Overwrites the stored report with the same id. Returns `false` when
    /// nothing in scope matched.
    async fn replace(&self, scope: &ReportScope, report: &WeeklyReport) -> Result<bool, AppError>;
}

pub struct MongoReportStore {
    collection: Collection<WeeklyReport>,
}

impl MongoReportStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<WeeklyReport>(WEEKLY_REPORTS_COLLECTION),
        }
    }
}

#[async_trait]
impl ReportStore for MongoReportStore {
    async fn insert(&self, report: &WeeklyReport) -> Result<(), AppError> {
        self.collection.insert_one(report).await?;
        Ok(())
    }

    async fn find_in_scope(&self, scope: &ReportScope) -> Result<Vec<WeeklyReport>, AppError> {
        let cursor = self
            .collection
            .find(scope.filter())
            .sort(doc! { "year": -1, "week": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_week_year(
        &self,
        scope: &ReportScope,
        week: i32,
        year: i32,
    ) -> Result<Option<WeeklyReport>, AppError> {
        let filter = scope.filter_with(doc! { "week": week, "year": year });
        Ok(self.collection.find_one(filter).await?)
    }

    async fn find_by_id(&self, scope: &ReportScope, id: ObjectId) -> Result<Option<WeeklyReport>, AppError> {
        let filter = scope.filter_with(doc! { "_id": id });
        Ok(self.collection.find_one(filter).await?)
    }

    async fn replace(&self, scope: &ReportScope, report: &WeeklyReport) -> Result<bool, AppError> {
        let filter = scope.filter_with(doc! { "_id": report.id });
        let result = self.collection.replace_one(filter, report).await?;
        Ok(result.matched_count > 0)
    }
}
