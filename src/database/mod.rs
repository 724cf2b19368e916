pub mod report_store;
pub mod user_store;

#[cfg(test)]
pub mod memory;

pub use report_store::*;
pub use user_store::*;

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::config::AppConfig;
use crate::utils::AppError;

pub const USERS_COLLECTION: &str = "users";
pub const WEEKLY_REPORTS_COLLECTION: &str = "weekly_reports";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(&config.database_url).await?;

        // Pool sized for a single API instance
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(config.access_timeout);
        client_options.server_selection_timeout = Some(config.access_timeout);
        client_options.app_name = Some("one-to-one-service".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database_name);

        // Fail fast when the server is unreachable
        db.run_command(doc! { "ping": 1 }).await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the report and user queries rely on
    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<mongodb::bson::Document>(USERS_COLLECTION);
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }

        let reports = self.collection::<mongodb::bson::Document>(WEEKLY_REPORTS_COLLECTION);
        for field in ["reportee", "reportingTo"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1, "year": -1, "week": -1 })
                .build();

            match reports.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: weekly_reports({}, year, week)", field),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
