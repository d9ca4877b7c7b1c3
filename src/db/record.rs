use sea_orm::{ActiveModelBehavior, ActiveModelTrait, ActiveValue, DbErr, EntityTrait, IntoActiveModel};

/// Shorthand for the SeaORM model behind a record.
pub type ModelOf<R> = <<R as Record>::Entity as EntityTrait>::Model;

/// Shorthand for the column enum of a record's table.
pub type ColumnOf<R> = <<R as Record>::Entity as EntityTrait>::Column;

/// A catalog record backed by a single table.
///
/// Records carry foreign keys as plain fields and their navigations as
/// `Option` slots that stay `None` until an include step populates them.
pub trait Record: Clone + Send + Sync + Sized + 'static {
    type Entity: EntityTrait<Model: Sync + IntoActiveModel<Self::ActiveModel>>;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;

    /// Human readable name used in log lines.
    const NAME: &'static str;

    fn id(&self) -> i32;

    fn id_column() -> ColumnOf<Self>;

    /// Builds a record from a stored row with every navigation unloaded.
    fn from_model(model: ModelOf<Self>) -> Result<Self, DbErr>;

    /// Builds the active model for writes. An id of `0` is left unset so the
    /// store assigns one on insert.
    fn to_active_model(&self) -> Self::ActiveModel;
}

/// Primary key value for an active model: unset for records not yet stored.
#[must_use]
pub const fn identity(id: i32) -> ActiveValue<i32> {
    if id == 0 {
        ActiveValue::NotSet
    } else {
        ActiveValue::Set(id)
    }
}
