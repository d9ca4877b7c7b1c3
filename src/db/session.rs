use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, TransactionTrait,
};
use tracing::{debug, info};

use super::record::Record;

#[async_trait]
trait StagedChange: Send {
    /// Applies the change and returns the number of rows it touched.
    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> Result<u64, DbErr>;
}

struct Insert<R> {
    record: R,
    stored: Arc<OnceLock<R>>,
}

#[async_trait]
impl<R: Record> StagedChange for Insert<R> {
    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> Result<u64, DbErr> {
        let Self { record, stored } = *self;
        let model = record.to_active_model().insert(txn).await?;
        let record = R::from_model(model)?;
        debug!(record = R::NAME, id = record.id(), "Inserted");
        let _ = stored.set(record);
        Ok(1)
    }
}

struct Update<R> {
    record: R,
}

#[async_trait]
impl<R: Record> StagedChange for Update<R> {
    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> Result<u64, DbErr> {
        let result = R::Entity::update_many()
            .set(self.record.to_active_model())
            .filter(R::id_column().eq(self.record.id()))
            .exec(txn)
            .await?;
        Ok(result.rows_affected)
    }
}

struct Delete<R> {
    record: R,
}

#[async_trait]
impl<R: Record> StagedChange for Delete<R> {
    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> Result<u64, DbErr> {
        let result = R::Entity::delete_many()
            .filter(R::id_column().eq(self.record.id()))
            .exec(txn)
            .await?;
        Ok(result.rows_affected)
    }
}

/// Handle to a staged insert; holds the stored record after a successful save.
#[derive(Debug)]
pub struct Pending<R> {
    stored: Arc<OnceLock<R>>,
}

impl<R: Clone> Pending<R> {
    /// The record as stored, with its generated id. `None` until the session
    /// has been saved.
    #[must_use]
    pub fn get(&self) -> Option<R> {
        self.stored.get().cloned()
    }
}

/// Request scoped unit of work.
///
/// Mutations are buffered in memory and sent to the store together by
/// [`Session::save_changes`], inside one transaction.
pub struct Session {
    conn: DatabaseConnection,
    staged: Vec<Box<dyn StagedChange>>,
}

impl Session {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            staged: Vec::new(),
        }
    }

    pub fn add<R: Record>(&mut self, record: R) -> Pending<R> {
        let stored = Arc::new(OnceLock::new());
        self.staged.push(Box::new(Insert {
            record,
            stored: Arc::clone(&stored),
        }));
        Pending { stored }
    }

    pub fn update<R: Record>(&mut self, record: R) {
        self.staged.push(Box::new(Update { record }));
    }

    pub fn delete<R: Record>(&mut self, record: R) {
        self.staged.push(Box::new(Delete { record }));
    }

    #[must_use]
    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    /// Commits every staged change in one transaction.
    ///
    /// Returns `Ok(false)` when nothing was staged or no row was affected.
    /// Store failures roll the whole batch back and surface as `Err`.
    pub async fn save_changes(&mut self) -> Result<bool, DbErr> {
        let staged = std::mem::take(&mut self.staged);
        if staged.is_empty() {
            debug!("No staged changes to save");
            return Ok(false);
        }

        let changes = staged.len();
        let txn = self.conn.begin().await?;

        let mut rows_affected = 0;
        for change in staged {
            rows_affected += change.apply(&txn).await?;
        }

        txn.commit().await?;

        info!(changes, rows_affected, "Saved staged changes");

        Ok(rows_affected > 0)
    }
}
