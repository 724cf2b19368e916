use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use std::sync::Arc;

use crate::database::{ReportStore, UserStore};
use crate::models::{User, WeeklyReport, WeeklyReportContent};
use crate::services::access::ReportRole;
use crate::utils::{is_valid_week, AppError};

/// Creates, looks up and updates weekly reports on behalf of an
/// authenticated user, always within the scope of the role they act as.
pub struct ReportService {
    users: Arc<dyn UserStore>,
    reports: Arc<dyn ReportStore>,
}

impl ReportService {
    pub fn new(users: Arc<dyn UserStore>, reports: Arc<dyn ReportStore>) -> Self {
        Self { users, reports }
    }

    /// Files a report as the requester, addressed to their current manager.
    ///
    /// Both user references are pinned here; later changes to `reportsTo`
    /// do not touch existing reports.
    pub async fn create(
        &self,
        requester_id: ObjectId,
        content: WeeklyReportContent,
    ) -> Result<WeeklyReport, AppError> {
        validate_period(&content)?;

        let reportee = self.load_user(requester_id).await?;
        let manager = self.current_manager(&reportee).await?;

        let content = content.without_empty_labels();
        let now = BsonDateTime::now();

        let report = WeeklyReport {
            id: ObjectId::new(),
            reportee: reportee.id,
            reporting_to: manager.id,
            week: content.week,
            year: content.year,
            wellbeing_scores: content.wellbeing_scores,
            agendas: content.agendas,
            gone_well: content.gone_well,
            challenges: content.challenges,
            created_at: now,
            updated_at: now,
        };

        self.reports.insert(&report).await?;

        log::info!(
            "📝 Weekly report {} created: week {}/{} ({} -> {})",
            report.id,
            report.week,
            report.year,
            report.reportee,
            report.reporting_to
        );

        Ok(report)
    }

    /// Reports in the requester's scope, most recent first.
    pub async fn list(&self, requester_id: ObjectId, role: ReportRole) -> Result<Vec<WeeklyReport>, AppError> {
        self.reports.find_in_scope(&role.scope(requester_id)).await
    }

    pub async fn get_by_week_year(
        &self,
        requester_id: ObjectId,
        week: i32,
        year: i32,
        role: ReportRole,
    ) -> Result<WeeklyReport, AppError> {
        self.reports
            .find_by_week_year(&role.scope(requester_id), week, year)
            .await?
            .ok_or_else(AppError::report_not_found)
    }

    /// Overwrites a report the requester can see in `role`, keeping its
    /// id and `createdAt`.
    ///
    /// The reporting pair is re-derived from the current hierarchy: as the
    /// reportee, `reportingTo` becomes the requester's current manager; as the
    /// manager, the requester stays `reportingTo` and the stored reportee is
    /// kept. A report outside the scope yields `NotFound`, same as a missing one.
    pub async fn update(
        &self,
        requester_id: ObjectId,
        report_id: ObjectId,
        content: WeeklyReportContent,
        role: ReportRole,
    ) -> Result<WeeklyReport, AppError> {
        validate_period(&content)?;

        let requester = self.load_user(requester_id).await?;
        let scope = role.scope(requester.id);

        let stored = self
            .reports
            .find_by_id(&scope, report_id)
            .await?
            .ok_or_else(AppError::report_not_found)?;

        let (reportee, reporting_to) = match role {
            ReportRole::AsReportee => {
                let manager = self.current_manager(&requester).await?;
                (requester.id, manager.id)
            }
            ReportRole::AsReportingTo => (stored.reportee, requester.id),
        };

        let content = content.without_empty_labels();

        let updated = WeeklyReport {
            id: stored.id,
            reportee,
            reporting_to,
            week: content.week,
            year: content.year,
            wellbeing_scores: content.wellbeing_scores,
            agendas: content.agendas,
            gone_well: content.gone_well,
            challenges: content.challenges,
            created_at: stored.created_at,
            updated_at: BsonDateTime::now(),
        };

        // Last write wins; the scoped filter is applied again on write.
        if !self.reports.replace(&scope, &updated).await? {
            return Err(AppError::report_not_found());
        }

        log::info!("✏️  Weekly report {} updated as {}", updated.id, role);

        Ok(updated)
    }

    async fn load_user(&self, id: ObjectId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::user_not_found)
    }

    async fn current_manager(&self, user: &User) -> Result<User, AppError> {
        let manager_id = user.reports_to.ok_or(AppError::NoManagerAssigned)?;
        self.users
            .find_by_id(manager_id)
            .await?
            .ok_or(AppError::NoManagerAssigned)
    }
}

fn validate_period(content: &WeeklyReportContent) -> Result<(), AppError> {
    if !is_valid_week(content.week) {
        return Err(AppError::validation(format!(
            "week must be between 1 and 53, got {}",
            content.week
        )));
    }
    if content.year < 1 {
        return Err(AppError::validation(format!("year must be positive, got {}", content.year)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::{MemoryReportStore, MemoryUserStore};
    use crate::models::{Agenda, ThemedItem, WellbeingScores};

    struct Fixture {
        users: Arc<MemoryUserStore>,
        reports: Arc<MemoryReportStore>,
        service: ReportService,
    }

    impl Fixture {
        fn new() -> Self {
            let users = Arc::new(MemoryUserStore::default());
            let reports = Arc::new(MemoryReportStore::default());
            let service = ReportService::new(users.clone(), reports.clone());
            Self { users, reports, service }
        }

        async fn user(&self, email: &str) -> ObjectId {
            let user = User::new(email.into(), "hash".into(), "Test".into(), "User".into());
            self.users.insert(&user).await.unwrap();
            user.id
        }

        async fn link(&self, manager: ObjectId, reportee: ObjectId) {
            self.users.set_reports_to(reportee, Some(manager)).await.unwrap();
            self.users.add_reportee(manager, reportee).await.unwrap();
        }

        /// Manager plus a reportee already reporting to them.
        async fn pair(&self) -> (ObjectId, ObjectId) {
            let manager = self.user("manager@example.com").await;
            let reportee = self.user("reportee@example.com").await;
            self.link(manager, reportee).await;
            (manager, reportee)
        }
    }

    fn content(week: i32, year: i32) -> WeeklyReportContent {
        WeeklyReportContent {
            week,
            year,
            wellbeing_scores: WellbeingScores {
                work_overall: 4,
                wellbeing: 3,
                growth: 5,
                work_relationships: 4,
                impact_and_productivity: 2,
            },
            agendas: vec![Agenda { label: "Career plan".into() }],
            gone_well: vec![ThemedItem {
                label: "Launched search".into(),
                theme: "delivery".into(),
            }],
            challenges: vec![ThemedItem {
                label: "Flaky CI".into(),
                theme: "tooling".into(),
            }],
        }
    }

    #[tokio::test]
    async fn test_create_without_manager_fails() {
        let fx = Fixture::new();
        let loner = fx.user("loner@example.com").await;

        let err = fx.service.create(loner, content(10, 2024)).await.unwrap_err();
        assert!(matches!(err, AppError::NoManagerAssigned));
        assert!(fx.reports.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_with_dangling_manager_fails() {
        let fx = Fixture::new();
        let reportee = fx.user("reportee@example.com").await;
        fx.users.set_reports_to(reportee, Some(ObjectId::new())).await.unwrap();

        let err = fx.service.create(reportee, content(10, 2024)).await.unwrap_err();
        assert!(matches!(err, AppError::NoManagerAssigned));
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_fields() {
        let fx = Fixture::new();
        let (manager, reportee) = fx.pair().await;
        let payload = content(10, 2024);

        let created = fx.service.create(reportee, payload.clone()).await.unwrap();
        assert_eq!(created.reportee, reportee);
        assert_eq!(created.reporting_to, manager);

        let fetched = fx
            .service
            .get_by_week_year(reportee, 10, 2024, ReportRole::AsReportee)
            .await
            .unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.reportee, reportee);
        assert_eq!(fetched.reporting_to, manager);
        assert_eq!(fetched.week, payload.week);
        assert_eq!(fetched.year, payload.year);
        assert_eq!(fetched.wellbeing_scores, payload.wellbeing_scores);
        assert_eq!(fetched.agendas, payload.agendas);
        assert_eq!(fetched.gone_well, payload.gone_well);
        assert_eq!(fetched.challenges, payload.challenges);

        // the manager sees it from their side
        let as_manager = fx
            .service
            .get_by_week_year(manager, 10, 2024, ReportRole::AsReportingTo)
            .await
            .unwrap();
        assert_eq!(as_manager.id, created.id);
    }

    #[tokio::test]
    async fn test_get_in_wrong_role_is_not_found() {
        let fx = Fixture::new();
        let (manager, reportee) = fx.pair().await;
        fx.service.create(reportee, content(10, 2024)).await.unwrap();

        let err = fx
            .service
            .get_by_week_year(manager, 10, 2024, ReportRole::AsReportee)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_drops_empty_labels() {
        let fx = Fixture::new();
        let (_, reportee) = fx.pair().await;

        let mut payload = content(3, 2024);
        payload.gone_well.push(ThemedItem {
            label: "".into(),
            theme: "team".into(),
        });
        payload.challenges.insert(
            0,
            ThemedItem {
                label: "".into(),
                theme: "process".into(),
            },
        );

        fx.service.create(reportee, payload).await.unwrap();

        let stored = &fx.reports.all().await[0];
        assert_eq!(stored.gone_well.len(), 1);
        assert_eq!(stored.challenges.len(), 1);
        assert!(stored.gone_well.iter().chain(&stored.challenges).all(ThemedItem::has_label));
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_week() {
        let fx = Fixture::new();
        let (_, reportee) = fx.pair().await;

        for week in [0, 54] {
            let err = fx.service.create(reportee, content(week, 2024)).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first() {
        let fx = Fixture::new();
        let (manager, reportee) = fx.pair().await;

        for (week, year) in [(10, 2024), (52, 2023), (11, 2024)] {
            fx.service.create(reportee, content(week, year)).await.unwrap();
        }

        for (requester, role) in [(reportee, ReportRole::AsReportee), (manager, ReportRole::AsReportingTo)] {
            let order: Vec<(i32, i32)> = fx
                .service
                .list(requester, role)
                .await
                .unwrap()
                .iter()
                .map(|r| (r.week, r.year))
                .collect();
            assert_eq!(order, vec![(11, 2024), (10, 2024), (52, 2023)]);
        }
    }

    #[tokio::test]
    async fn test_list_only_returns_own_scope() {
        let fx = Fixture::new();
        let (manager, reportee) = fx.pair().await;
        let other = fx.user("other@example.com").await;
        fx.link(manager, other).await;

        fx.service.create(reportee, content(1, 2024)).await.unwrap();
        fx.service.create(other, content(1, 2024)).await.unwrap();

        assert_eq!(fx.service.list(reportee, ReportRole::AsReportee).await.unwrap().len(), 1);
        assert_eq!(fx.service.list(manager, ReportRole::AsReportingTo).await.unwrap().len(), 2);
        assert!(fx.service.list(manager, ReportRole::AsReportee).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reassignment_does_not_rewrite_past_reports() {
        let fx = Fixture::new();
        let (manager, reportee) = fx.pair().await;
        let created = fx.service.create(reportee, content(5, 2024)).await.unwrap();

        let new_manager = fx.user("new@example.com").await;
        fx.users.remove_reportee(manager, reportee).await.unwrap();
        fx.link(new_manager, reportee).await;

        let stored = fx
            .service
            .get_by_week_year(manager, 5, 2024, ReportRole::AsReportingTo)
            .await
            .unwrap();
        assert_eq!(stored.id, created.id);
        assert!(fx
            .service
            .list(new_manager, ReportRole::AsReportingTo)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_as_reportee_preserves_created_at() {
        let fx = Fixture::new();
        let (manager, reportee) = fx.pair().await;
        let created = fx.service.create(reportee, content(7, 2024)).await.unwrap();

        let mut changed = content(7, 2024);
        changed.wellbeing_scores.growth = 1;
        changed.agendas.push(Agenda { label: "Promotion".into() });

        let updated = fx
            .service
            .update(reportee, created.id, changed.clone(), ReportRole::AsReportee)
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.reporting_to, manager);

        let stored = &fx.reports.all().await[0];
        assert_eq!(stored.wellbeing_scores.growth, 1);
        assert_eq!(stored.agendas, changed.agendas);
        assert_eq!(stored.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_as_reportee_follows_current_manager() {
        let fx = Fixture::new();
        let (manager, reportee) = fx.pair().await;
        let created = fx.service.create(reportee, content(7, 2024)).await.unwrap();

        let new_manager = fx.user("new@example.com").await;
        fx.users.remove_reportee(manager, reportee).await.unwrap();
        fx.link(new_manager, reportee).await;

        let updated = fx
            .service
            .update(reportee, created.id, content(7, 2024), ReportRole::AsReportee)
            .await
            .unwrap();
        assert_eq!(updated.reporting_to, new_manager);
    }

    #[tokio::test]
    async fn test_update_as_manager_keeps_reportee() {
        let fx = Fixture::new();
        let (manager, reportee) = fx.pair().await;
        let created = fx.service.create(reportee, content(8, 2024)).await.unwrap();

        let updated = fx
            .service
            .update(manager, created.id, content(8, 2024), ReportRole::AsReportingTo)
            .await
            .unwrap();

        assert_eq!(updated.reportee, reportee);
        assert_eq!(updated.reporting_to, manager);
    }

    #[tokio::test]
    async fn test_update_in_non_owning_role_is_not_found_and_mutates_nothing() {
        let fx = Fixture::new();
        let (manager, reportee) = fx.pair().await;
        let created = fx.service.create(reportee, content(9, 2024)).await.unwrap();

        let mut tampered = content(9, 2024);
        tampered.wellbeing_scores.wellbeing = 1;

        // reportee acting through the manager-side route
        let err = fx
            .service
            .update(reportee, created.id, tampered.clone(), ReportRole::AsReportingTo)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // manager acting through the reportee-side route
        let err = fx
            .service
            .update(manager, created.id, tampered, ReportRole::AsReportee)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let stored = &fx.reports.all().await[0];
        assert_eq!(stored.wellbeing_scores, created.wellbeing_scores);
        assert_eq!(stored.updated_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_report_is_not_found() {
        let fx = Fixture::new();
        let (_, reportee) = fx.pair().await;

        let err = fx
            .service
            .update(reportee, ObjectId::new(), content(1, 2024), ReportRole::AsReportee)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_drops_empty_labels() {
        let fx = Fixture::new();
        let (_, reportee) = fx.pair().await;
        let created = fx.service.create(reportee, content(2, 2024)).await.unwrap();

        let mut changed = content(2, 2024);
        changed.gone_well = vec![ThemedItem {
            label: " ".into(),
            theme: "team".into(),
        }];

        let updated = fx
            .service
            .update(reportee, created.id, changed, ReportRole::AsReportee)
            .await
            .unwrap();
        assert!(updated.gone_well.is_empty());
    }
}
