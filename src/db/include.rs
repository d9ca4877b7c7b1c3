//! Eager loading of related records through chained include steps.
//!
//! A [`Query`] fetches root records; every `join`/`then_join` adds one
//! include step that runs after the root fetch as a single batched
//! `IN (...)` query covering all parents reached so far. The chain tracks the
//! current element type only, so stepping off a collection (`Series` to its
//! seasons) and off a reference (an episode link to its cast member) go
//! through the same [`Navigation`] interface.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::IntoCondition;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Select,
};
use tracing::debug;

use super::record::{ColumnOf, Record};

/// A relation from `P` to a related record that can be loaded in bulk.
#[async_trait]
pub trait Navigation<P: Send + 'static>: Send + Sync + 'static {
    type Target: Record;

    /// Loads the relation for every parent with one query and fills each
    /// parent's navigation slot.
    async fn load(&self, db: &DatabaseConnection, parents: &mut [&mut P]) -> Result<(), DbErr>;

    /// Returns the loaded targets of one parent, empty when the slot is unset.
    fn targets<'a>(&self, parent: &'a mut P) -> Vec<&'a mut Self::Target>;
}

/// Collection navigation: the foreign key lives on the child rows.
pub struct HasMany<P, C: Record> {
    foreign_key: ColumnOf<C>,
    parent_id: fn(&C) -> i32,
    slot: fn(&mut P) -> &mut Option<Vec<C>>,
}

impl<P, C: Record> HasMany<P, C> {
    pub const fn new(
        foreign_key: ColumnOf<C>,
        parent_id: fn(&C) -> i32,
        slot: fn(&mut P) -> &mut Option<Vec<C>>,
    ) -> Self {
        Self {
            foreign_key,
            parent_id,
            slot,
        }
    }
}

#[async_trait]
impl<P, C> Navigation<P> for HasMany<P, C>
where
    P: Record,
    C: Record,
{
    type Target = C;

    async fn load(&self, db: &DatabaseConnection, parents: &mut [&mut P]) -> Result<(), DbErr> {
        if parents.is_empty() {
            return Ok(());
        }

        let ids: Vec<i32> = parents.iter().map(|parent| parent.id()).collect();
        let rows = C::Entity::find()
            .filter(self.foreign_key.is_in(ids))
            .order_by_asc(C::id_column())
            .all(db)
            .await?;

        debug!(
            parent = P::NAME,
            related = C::NAME,
            parents = parents.len(),
            rows = rows.len(),
            "Loaded collection"
        );

        let mut grouped: HashMap<i32, Vec<C>> = HashMap::new();
        for row in rows {
            let child = C::from_model(row)?;
            grouped
                .entry((self.parent_id)(&child))
                .or_default()
                .push(child);
        }

        for parent in parents.iter_mut() {
            let children = grouped.get(&parent.id()).cloned().unwrap_or_default();
            *(self.slot)(parent) = Some(children);
        }

        Ok(())
    }

    fn targets<'a>(&self, parent: &'a mut P) -> Vec<&'a mut C> {
        (self.slot)(parent)
            .as_mut()
            .map_or_else(Vec::new, |children| children.iter_mut().collect())
    }
}

/// Reference navigation: the foreign key lives on the parent.
pub struct BelongsTo<P, T> {
    foreign_key: fn(&P) -> i32,
    slot: fn(&mut P) -> &mut Option<T>,
}

impl<P, T> BelongsTo<P, T> {
    pub const fn new(foreign_key: fn(&P) -> i32, slot: fn(&mut P) -> &mut Option<T>) -> Self {
        Self { foreign_key, slot }
    }
}

#[async_trait]
impl<P, T> Navigation<P> for BelongsTo<P, T>
where
    P: Send + Sync + 'static,
    T: Record,
{
    type Target = T;

    async fn load(&self, db: &DatabaseConnection, parents: &mut [&mut P]) -> Result<(), DbErr> {
        if parents.is_empty() {
            return Ok(());
        }

        let mut keys: Vec<i32> = parents
            .iter()
            .map(|parent| (self.foreign_key)(parent))
            .collect();
        keys.sort_unstable();
        keys.dedup();

        let rows = T::Entity::find()
            .filter(T::id_column().is_in(keys))
            .all(db)
            .await?;

        debug!(
            related = T::NAME,
            parents = parents.len(),
            rows = rows.len(),
            "Loaded reference"
        );

        let mut by_id = HashMap::with_capacity(rows.len());
        for row in rows {
            let target = T::from_model(row)?;
            by_id.insert(target.id(), target);
        }

        for parent in parents.iter_mut() {
            let key = (self.foreign_key)(parent);
            *(self.slot)(parent) = by_id.get(&key).cloned();
        }

        Ok(())
    }

    fn targets<'a>(&self, parent: &'a mut P) -> Vec<&'a mut T> {
        (self.slot)(parent).as_mut().into_iter().collect()
    }
}

/// Reaches every element at the current depth of a chain from one root.
type Walk<R, T> = Arc<dyn for<'a> Fn(&'a mut R) -> Vec<&'a mut T> + Send + Sync>;

fn walk<R, T, F>(f: F) -> Walk<R, T>
where
    F: for<'a> Fn(&'a mut R) -> Vec<&'a mut T> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[async_trait]
trait IncludeStep<R>: Send + Sync {
    async fn apply(&self, db: &DatabaseConnection, roots: &mut [R]) -> Result<(), DbErr>;
}

/// Loads `navigation` for every element the walk reaches.
struct PathStep<R, T, N> {
    walk: Walk<R, T>,
    navigation: Arc<N>,
}

#[async_trait]
impl<R, T, N> IncludeStep<R> for PathStep<R, T, N>
where
    R: Send + Sync + 'static,
    T: Send + 'static,
    N: Navigation<T>,
{
    async fn apply(&self, db: &DatabaseConnection, roots: &mut [R]) -> Result<(), DbErr> {
        let mut parents: Vec<&mut T> = roots
            .iter_mut()
            .flat_map(|root| (self.walk)(root))
            .collect();
        self.navigation.load(db, &mut parents).await
    }
}

/// Lazily evaluated query over one record type.
///
/// Nothing touches the store until a terminal method (`all`, `one`,
/// `first_or_default`, `find_by_id`) is awaited.
pub struct Query<R: Record> {
    conn: DatabaseConnection,
    select: Select<R::Entity>,
    includes: Vec<Box<dyn IncludeStep<R>>>,
}

impl<R: Record> Query<R> {
    pub(crate) fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            select: R::Entity::find(),
            includes: Vec::new(),
        }
    }

    #[must_use]
    pub fn filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.select = self.select.filter(condition);
        self
    }

    #[must_use]
    pub fn order_by_asc(mut self, column: ColumnOf<R>) -> Self {
        self.select = self.select.order_by_asc(column);
        self
    }

    #[must_use]
    pub fn order_by_desc(mut self, column: ColumnOf<R>) -> Self {
        self.select = self.select.order_by_desc(column);
        self
    }

    /// Requests that `navigation` be populated on every root record.
    #[must_use]
    pub fn join<N: Navigation<R>>(mut self, navigation: N) -> IncludableQuery<R, N::Target> {
        let navigation = Arc::new(navigation);
        self.includes.push(Box::new(PathStep {
            walk: walk(|root: &mut R| vec![root]),
            navigation: Arc::clone(&navigation),
        }));

        IncludableQuery {
            query: self,
            walk: walk(move |root: &mut R| navigation.targets(root)),
        }
    }

    pub async fn all(self) -> Result<Vec<R>, DbErr> {
        let Self {
            conn,
            select,
            includes,
        } = self;

        let mut records = select
            .all(&conn)
            .await?
            .into_iter()
            .map(R::from_model)
            .collect::<Result<Vec<_>, _>>()?;

        resolve(&conn, &includes, &mut records).await?;
        Ok(records)
    }

    pub async fn one(self) -> Result<Option<R>, DbErr> {
        let Self {
            conn,
            select,
            includes,
        } = self;

        let Some(model) = select.one(&conn).await? else {
            return Ok(None);
        };

        let mut records = vec![R::from_model(model)?];
        resolve(&conn, &includes, &mut records).await?;
        Ok(records.pop())
    }

    /// First record matching `condition`, or `None`.
    pub async fn first_or_default<F: IntoCondition>(self, condition: F) -> Result<Option<R>, DbErr> {
        self.filter(condition).one().await
    }

    pub async fn find_by_id(self, id: i32) -> Result<Option<R>, DbErr> {
        self.first_or_default(R::id_column().eq(id)).await
    }

    /// Number of matching root rows. Include steps are not run.
    pub async fn count(self) -> Result<u64, DbErr> {
        self.select.count(&self.conn).await
    }
}

async fn resolve<R: Record>(
    conn: &DatabaseConnection,
    includes: &[Box<dyn IncludeStep<R>>],
    records: &mut [R],
) -> Result<(), DbErr> {
    if records.is_empty() {
        return Ok(());
    }

    for step in includes {
        step.apply(conn, records).await?;
    }

    Ok(())
}

/// A query whose last include step ended on `T`.
pub struct IncludableQuery<R: Record, T> {
    query: Query<R>,
    walk: Walk<R, T>,
}

impl<R: Record, T: Send + 'static> IncludableQuery<R, T> {
    /// Extends the previous include one level deeper, from `T` to the
    /// navigation's target. Collections are unwrapped to their elements.
    #[must_use]
    pub fn then_join<N: Navigation<T>>(mut self, navigation: N) -> IncludableQuery<R, N::Target> {
        let navigation = Arc::new(navigation);
        self.query.includes.push(Box::new(PathStep {
            walk: Arc::clone(&self.walk),
            navigation: Arc::clone(&navigation),
        }));

        let outer = self.walk;
        IncludableQuery {
            query: self.query,
            walk: walk(move |root: &mut R| {
                outer(root)
                    .into_iter()
                    .flat_map(|parent| navigation.targets(parent))
                    .collect()
            }),
        }
    }

    /// Starts a sibling include chain from the root record.
    #[must_use]
    pub fn join<N: Navigation<R>>(self, navigation: N) -> IncludableQuery<R, N::Target> {
        self.query.join(navigation)
    }

    #[must_use]
    pub fn filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.query = self.query.filter(condition);
        self
    }

    #[must_use]
    pub fn order_by_asc(mut self, column: ColumnOf<R>) -> Self {
        self.query = self.query.order_by_asc(column);
        self
    }

    #[must_use]
    pub fn order_by_desc(mut self, column: ColumnOf<R>) -> Self {
        self.query = self.query.order_by_desc(column);
        self
    }

    pub async fn all(self) -> Result<Vec<R>, DbErr> {
        self.query.all().await
    }

    pub async fn one(self) -> Result<Option<R>, DbErr> {
        self.query.one().await
    }

    pub async fn first_or_default<F: IntoCondition>(self, condition: F) -> Result<Option<R>, DbErr> {
        self.query.first_or_default(condition).await
    }

    pub async fn find_by_id(self, id: i32) -> Result<Option<R>, DbErr> {
        self.query.find_by_id(id).await
    }

    pub async fn count(self) -> Result<u64, DbErr> {
        self.query.count().await
    }
}
