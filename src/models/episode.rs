use sea_orm::{ActiveValue::Set, DbErr};

use super::{EpisodeCastMember, Season};
use crate::db::record::{ColumnOf, Record, identity};
use crate::db::{BelongsTo, HasMany};
use crate::entities::{episode_casts, episodes};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Episode {
    pub id: i32,
    pub title: String,
    pub number: i32,
    pub season_id: i32,
    pub season: Option<Season>,
    /// Association rows linking this episode to its cast.
    pub cast: Option<Vec<EpisodeCastMember>>,
}

impl Episode {
    pub const SEASON: BelongsTo<Self, Season> =
        BelongsTo::new(|episode| episode.season_id, |episode| &mut episode.season);

    pub const CAST: HasMany<Self, EpisodeCastMember> = HasMany::new(
        episode_casts::Column::EpisodeId,
        |link| link.episode_id,
        |episode| &mut episode.cast,
    );
}

impl Record for Episode {
    type Entity = episodes::Entity;
    type ActiveModel = episodes::ActiveModel;

    const NAME: &'static str = "episode";

    fn id(&self) -> i32 {
        self.id
    }

    fn id_column() -> ColumnOf<Self> {
        episodes::Column::Id
    }

    fn from_model(model: episodes::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: model.id,
            title: model.title,
            number: model.number,
            season_id: model.season_id,
            season: None,
            cast: None,
        })
    }

    fn to_active_model(&self) -> episodes::ActiveModel {
        episodes::ActiveModel {
            id: identity(self.id),
            title: Set(self.title.clone()),
            number: Set(self.number),
            season_id: Set(self.season_id),
        }
    }
}
