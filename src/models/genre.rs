use sea_orm::{ActiveValue::Set, DbErr};

use super::Series;
use crate::db::record::{ColumnOf, Record, identity};
use crate::db::HasMany;
use crate::entities::{genres, series};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Genre {
    pub id: i32,
    pub name: String,
    pub series: Option<Vec<Series>>,
}

impl Genre {
    pub const SERIES: HasMany<Self, Series> = HasMany::new(
        series::Column::GenreId,
        |series| series.genre_id,
        |genre| &mut genre.series,
    );
}

impl Record for Genre {
    type Entity = genres::Entity;
    type ActiveModel = genres::ActiveModel;

    const NAME: &'static str = "genre";

    fn id(&self) -> i32 {
        self.id
    }

    fn id_column() -> ColumnOf<Self> {
        genres::Column::Id
    }

    fn from_model(model: genres::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: model.id,
            name: model.name,
            series: None,
        })
    }

    fn to_active_model(&self) -> genres::ActiveModel {
        genres::ActiveModel {
            id: identity(self.id),
            name: Set(self.name.clone()),
        }
    }
}
