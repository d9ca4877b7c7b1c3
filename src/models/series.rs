use sea_orm::{ActiveValue::Set, DbErr};

use super::{Genre, Season};
use crate::db::record::{ColumnOf, Record, identity};
use crate::db::{BelongsTo, HasMany};
use crate::entities::{seasons, series};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Series {
    pub id: i32,
    pub title: String,
    pub release_year: i32,
    pub genre_id: i32,
    pub genre: Option<Genre>,
    pub seasons: Option<Vec<Season>>,
}

impl Series {
    pub const GENRE: BelongsTo<Self, Genre> =
        BelongsTo::new(|series| series.genre_id, |series| &mut series.genre);

    pub const SEASONS: HasMany<Self, Season> = HasMany::new(
        seasons::Column::SeriesId,
        |season| season.series_id,
        |series| &mut series.seasons,
    );

    /// Loaded season with the given id, if any.
    #[must_use]
    pub fn season(&self, season_id: i32) -> Option<&Season> {
        self.seasons
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|season| season.id == season_id)
    }
}

impl Record for Series {
    type Entity = series::Entity;
    type ActiveModel = series::ActiveModel;

    const NAME: &'static str = "series";

    fn id(&self) -> i32 {
        self.id
    }

    fn id_column() -> ColumnOf<Self> {
        series::Column::Id
    }

    fn from_model(model: series::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: model.id,
            title: model.title,
            release_year: model.release_year,
            genre_id: model.genre_id,
            genre: None,
            seasons: None,
        })
    }

    fn to_active_model(&self) -> series::ActiveModel {
        series::ActiveModel {
            id: identity(self.id),
            title: Set(self.title.clone()),
            release_year: Set(self.release_year),
            genre_id: Set(self.genre_id),
        }
    }
}
