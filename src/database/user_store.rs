use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::Collection;

use super::{MongoDB, USERS_COLLECTION};
use crate::models::User;
use crate::utils::AppError;

/// Persistence for user identities and the reporting hierarchy edges.
///
/// Edge updates touch a single document each; keeping `reportsTo` and
/// `reportees` consistent is the caller's job. There is no transaction across
/// them: concurrent reassignments of one reportee are last-write-wins and can
/// leave it listed under both managers.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), AppError>;

    async fn find_all(&self) -> Result<Vec<User>, AppError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn set_reports_to(&self, id: ObjectId, manager: Option<ObjectId>) -> Result<(), AppError>;

    async fn add_reportee(&self, manager: ObjectId, reportee: ObjectId) -> Result<(), AppError>;

    async fn remove_reportee(&self, manager: ObjectId, reportee: ObjectId) -> Result<(), AppError>;
}

pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<User>(USERS_COLLECTION),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, user: &User) -> Result<(), AppError> {
        self.collection.insert_one(user).await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn set_reports_to(&self, id: ObjectId, manager: Option<ObjectId>) -> Result<(), AppError> {
        let now = BsonDateTime::now();
        let update = match manager {
            Some(manager) => doc! { "$set": { "reportsTo": manager, "updatedAt": now } },
            None => doc! { "$unset": { "reportsTo": "" }, "$set": { "updatedAt": now } },
        };

        let result = self.collection.update_one(doc! { "_id": id }, update).await?;
        if result.matched_count == 0 {
            return Err(AppError::user_not_found());
        }
        Ok(())
    }

    async fn add_reportee(&self, manager: ObjectId, reportee: ObjectId) -> Result<(), AppError> {
        let update = doc! {
            "$addToSet": { "reportees": reportee },
            "$set": { "updatedAt": BsonDateTime::now() },
        };

        let result = self.collection.update_one(doc! { "_id": manager }, update).await?;
        if result.matched_count == 0 {
            return Err(AppError::user_not_found());
        }
        Ok(())
    }

    async fn remove_reportee(&self, manager: ObjectId, reportee: ObjectId) -> Result<(), AppError> {
        let update = doc! {
            "$pull": { "reportees": reportee },
            "$set": { "updatedAt": BsonDateTime::now() },
        };

        let result = self.collection.update_one(doc! { "_id": manager }, update).await?;
        if result.matched_count == 0 {
            return Err(AppError::user_not_found());
        }
        Ok(())
    }
}
