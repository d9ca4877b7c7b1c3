use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cast_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub name: String,
    /// Stored as the integer code of `CastPosition`.
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::episode_casts::Entity")]
    EpisodeCasts,
}

impl Related<super::episode_casts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EpisodeCasts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
