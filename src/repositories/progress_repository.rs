use async_trait::async_trait;
use mongodb::Collection;

use crate::{db::Database, errors::AppResult, models::domain::ProgressRecord};

/// Append-only store of graded answers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn insert(&self, record: ProgressRecord) -> AppResult<()>;
    async fn health_check(&self) -> AppResult<()>;
}

pub struct MongoProgressRepository {
    db: Database,
    collection: Collection<ProgressRecord>,
}

impl MongoProgressRepository {
    pub fn new(db: Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { db, collection }
    }
}

#[async_trait]
impl ProgressRepository for MongoProgressRepository {
    async fn insert(&self, record: ProgressRecord) -> AppResult<()> {
        self.collection.insert_one(&record).await?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        self.db.health_check().await
    }
}
