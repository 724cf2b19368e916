use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

use super::format_timestamp;

/// Five self-assessed scores collected every week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WellbeingScores {
    pub work_overall: i32,
    pub wellbeing: i32,
    pub growth: i32,
    pub work_relationships: i32,
    pub impact_and_productivity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Agenda {
    pub label: String,
}

/// Entry of the "gone well" and "challenges" lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ThemedItem {
    pub label: String,
    #[serde(default)]
    pub theme: String,
}

impl ThemedItem {
    pub fn has_label(&self) -> bool {
        !self.label.trim().is_empty()
    }
}

/// Weekly check-in (stored in the `weekly_reports` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Author of the check-in
    pub reportee: ObjectId,

    /// Manager of the reportee when the report was written
    pub reporting_to: ObjectId,

    pub week: i32,
    pub year: i32,
    pub wellbeing_scores: WellbeingScores,
    pub agendas: Vec<Agenda>,
    pub gone_well: Vec<ThemedItem>,
    pub challenges: Vec<ThemedItem>,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

/// Fields the author controls, shared by create and update payloads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReportContent {
    pub week: i32,
    pub year: i32,
    pub wellbeing_scores: WellbeingScores,
    pub agendas: Vec<Agenda>,
    pub gone_well: Vec<ThemedItem>,
    pub challenges: Vec<ThemedItem>,
}

impl WeeklyReportContent {
    /// Drops "gone well" and "challenges" entries without a label.
    pub fn without_empty_labels(mut self) -> Self {
        self.gone_well.retain(ThemedItem::has_label);
        self.challenges.retain(ThemedItem::has_label);
        self
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct UpdateWeeklyReportRequest {
    pub id: String,
    #[serde(flatten)]
    pub content: WeeklyReportContent,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeekYearQuery {
    pub week: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReportResponse {
    pub id: String,
    pub reportee: String,
    pub reporting_to: String,
    pub week: i32,
    pub year: i32,
    pub wellbeing_scores: WellbeingScores,
    pub agendas: Vec<Agenda>,
    pub gone_well: Vec<ThemedItem>,
    pub challenges: Vec<ThemedItem>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<WeeklyReport> for WeeklyReportResponse {
    fn from(report: WeeklyReport) -> Self {
        WeeklyReportResponse {
            id: report.id.to_hex(),
            reportee: report.reportee.to_hex(),
            reporting_to: report.reporting_to.to_hex(),
            week: report.week,
            year: report.year,
            wellbeing_scores: report.wellbeing_scores,
            agendas: report.agendas,
            gone_well: report.gone_well,
            challenges: report.challenges,
            created_at: format_timestamp(report.created_at),
            updated_at: format_timestamp(report.updated_at),
        }
    }
}
