use sea_orm::{ActiveValue::Set, DbErr};

use super::Episode;
use crate::db::record::{ColumnOf, Record, identity};
use crate::db::{BelongsTo, HasMany};
use crate::domain::CastPosition;
use crate::entities::{cast_members, episode_casts};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CastMember {
    pub id: i32,
    pub name: String,
    pub position: CastPosition,
    pub appearances: Option<Vec<EpisodeCastMember>>,
}

impl CastMember {
    pub const APPEARANCES: HasMany<Self, EpisodeCastMember> = HasMany::new(
        episode_casts::Column::CastMemberId,
        |link| link.cast_member_id,
        |member| &mut member.appearances,
    );
}

impl Record for CastMember {
    type Entity = cast_members::Entity;
    type ActiveModel = cast_members::ActiveModel;

    const NAME: &'static str = "cast member";

    fn id(&self) -> i32 {
        self.id
    }

    fn id_column() -> ColumnOf<Self> {
        cast_members::Column::Id
    }

    fn from_model(model: cast_members::Model) -> Result<Self, DbErr> {
        let position = CastPosition::try_from(model.position)
            .map_err(|e| DbErr::Type(format!("cast member {}: {e}", model.id)))?;

        Ok(Self {
            id: model.id,
            name: model.name,
            position,
            appearances: None,
        })
    }

    fn to_active_model(&self) -> cast_members::ActiveModel {
        cast_members::ActiveModel {
            id: identity(self.id),
            name: Set(self.name.clone()),
            position: Set(self.position.code()),
        }
    }
}

/// Link between an episode and a cast member appearing in it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EpisodeCastMember {
    pub id: i32,
    pub episode_id: i32,
    pub cast_member_id: i32,
    pub episode: Option<Episode>,
    pub cast_member: Option<CastMember>,
}

impl EpisodeCastMember {
    pub const EPISODE: BelongsTo<Self, Episode> =
        BelongsTo::new(|link| link.episode_id, |link| &mut link.episode);

    pub const CAST_MEMBER: BelongsTo<Self, CastMember> =
        BelongsTo::new(|link| link.cast_member_id, |link| &mut link.cast_member);

    #[must_use]
    pub fn new(episode_id: i32, cast_member_id: i32) -> Self {
        Self {
            episode_id,
            cast_member_id,
            ..Self::default()
        }
    }
}

impl Record for EpisodeCastMember {
    type Entity = episode_casts::Entity;
    type ActiveModel = episode_casts::ActiveModel;

    const NAME: &'static str = "episode cast";

    fn id(&self) -> i32 {
        self.id
    }

    fn id_column() -> ColumnOf<Self> {
        episode_casts::Column::Id
    }

    fn from_model(model: episode_casts::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: model.id,
            episode_id: model.episode_id,
            cast_member_id: model.cast_member_id,
            episode: None,
            cast_member: None,
        })
    }

    fn to_active_model(&self) -> episode_casts::ActiveModel {
        episode_casts::ActiveModel {
            id: identity(self.id),
            episode_id: Set(self.episode_id),
            cast_member_id: Set(self.cast_member_id),
        }
    }
}
