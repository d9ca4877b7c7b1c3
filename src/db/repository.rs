use std::marker::PhantomData;

use sea_orm::{DatabaseConnection, DbErr};
use tracing::debug;

use super::include::{IncludableQuery, Navigation, Query};
use super::record::Record;
use super::session::{Pending, Session};

/// Data access for one record type.
///
/// Reads return lazy [`Query`] handles. Writes are staged on the caller's
/// [`Session`] and only reach the store on [`Repository::save_changes`].
pub struct Repository<R: Record> {
    conn: DatabaseConnection,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self::new(self.conn.clone())
    }
}

impl<R: Record> Repository<R> {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            _record: PhantomData,
        }
    }

    /// Every row of the table, unevaluated.
    #[must_use]
    pub fn get_all(&self) -> Query<R> {
        Query::new(self.conn.clone())
    }

    #[must_use]
    pub fn join<N: Navigation<R>>(&self, navigation: N) -> IncludableQuery<R, N::Target> {
        self.get_all().join(navigation)
    }

    pub fn add(&self, session: &mut Session, record: R) -> Pending<R> {
        debug!(record = R::NAME, "Staging insert");
        session.add(record)
    }

    pub fn update(&self, session: &mut Session, record: R) {
        debug!(record = R::NAME, id = record.id(), "Staging update");
        session.update(record);
    }

    pub fn delete(&self, session: &mut Session, record: R) {
        debug!(record = R::NAME, id = record.id(), "Staging delete");
        session.delete(record);
    }

    pub async fn save_changes(&self, session: &mut Session) -> Result<bool, DbErr> {
        session.save_changes().await
    }
}
