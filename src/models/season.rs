use sea_orm::{ActiveValue::Set, DbErr};

use super::{Episode, Series};
use crate::db::record::{ColumnOf, Record, identity};
use crate::db::{BelongsTo, HasMany};
use crate::entities::{episodes, seasons};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Season {
    pub id: i32,
    pub number: i32,
    pub series_id: i32,
    pub series: Option<Series>,
    pub episodes: Option<Vec<Episode>>,
}

impl Season {
    pub const SERIES: BelongsTo<Self, Series> =
        BelongsTo::new(|season| season.series_id, |season| &mut season.series);

    pub const EPISODES: HasMany<Self, Episode> = HasMany::new(
        episodes::Column::SeasonId,
        |episode| episode.season_id,
        |season| &mut season.episodes,
    );
}

impl Record for Season {
    type Entity = seasons::Entity;
    type ActiveModel = seasons::ActiveModel;

    const NAME: &'static str = "season";

    fn id(&self) -> i32 {
        self.id
    }

    fn id_column() -> ColumnOf<Self> {
        seasons::Column::Id
    }

    fn from_model(model: seasons::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: model.id,
            number: model.number,
            series_id: model.series_id,
            series: None,
            episodes: None,
        })
    }

    fn to_active_model(&self) -> seasons::ActiveModel {
        seasons::ActiveModel {
            id: identity(self.id),
            number: Set(self.number),
            series_id: Set(self.series_id),
        }
    }
}
