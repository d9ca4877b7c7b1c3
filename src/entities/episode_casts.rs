use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "episode_casts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub episode_id: i32,
    pub cast_member_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::episodes::Entity",
        from = "Column::EpisodeId",
        to = "super::episodes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Episode,
    #[sea_orm(
        belongs_to = "super::cast_members::Entity",
        from = "Column::CastMemberId",
        to = "super::cast_members::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    CastMember,
}

impl Related<super::episodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episode.def()
    }
}

impl Related<super::cast_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CastMember.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
