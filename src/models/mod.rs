pub mod user;
pub mod weekly_report;

pub use user::*;
pub use weekly_report::*;

use mongodb::bson::DateTime as BsonDateTime;

/// RFC 3339 rendering of a stored timestamp for API responses.
pub fn format_timestamp(value: BsonDateTime) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(value.timestamp_millis())
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
