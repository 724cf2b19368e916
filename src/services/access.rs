//! Role-based scoping of weekly report access.
//!
//! Every report read or write goes through a [`ReportScope`]: a caller acting
//! as the reportee only sees reports they wrote, a caller acting as the manager
//! only sees reports addressed to them. A report outside the scope is
//! indistinguishable from a missing one.

use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::models::WeeklyReport;

/// Side of the reporting pair the caller acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportRole {
    AsReportee,
    AsReportingTo,
}

impl ReportRole {
    /// Stored field that must equal the caller's id.
    pub fn field(self) -> &'static str {
        match self {
            ReportRole::AsReportee => "reportee",
            ReportRole::AsReportingTo => "reportingTo",
        }
    }

    pub fn scope(self, user_id: ObjectId) -> ReportScope {
        ReportScope { role: self, user_id }
    }
}

impl std::fmt::Display for ReportRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportRole::AsReportee => write!(f, "reportee"),
            ReportRole::AsReportingTo => write!(f, "report-to"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportScope {
    pub role: ReportRole,
    pub user_id: ObjectId,
}

impl ReportScope {
    /// `{reportee: id}` or `{reportingTo: id}`.
    pub fn filter(&self) -> Document {
        doc! { self.role.field(): self.user_id }
    }

    pub fn filter_with(&self, extra: Document) -> Document {
        let mut filter = self.filter();
        filter.extend(extra);
        filter
    }

    pub fn matches(&self, report: &WeeklyReport) -> bool {
        match self.role {
            ReportRole::AsReportee => report.reportee == self.user_id,
            ReportRole::AsReportingTo => report.reporting_to == self.user_id,
        }
    }
}
