use serde::{Deserialize, Serialize};
use validator::Validate;

use super::GenreReadDto;
use crate::models::Series;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesReadDto {
    pub id: i32,
    pub title: String,
    pub release_year: i32,
    pub genre: GenreReadDto,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeriesCreateDto {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters."))]
    pub title: String,
    #[validate(range(min = 1900, max = 2100, message = "Release year must be between 1900 and 2100."))]
    pub release_year: i32,
    pub genre_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeriesUpdateDto {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters."))]
    pub title: String,
    #[validate(range(min = 1900, max = 2100, message = "Release year must be between 1900 and 2100."))]
    pub release_year: i32,
    pub genre_id: i32,
}

impl From<&Series> for SeriesReadDto {
    /// An unloaded genre projects to an empty genre object.
    fn from(series: &Series) -> Self {
        Self {
            id: series.id,
            title: series.title.clone(),
            release_year: series.release_year,
            genre: series
                .genre
                .as_ref()
                .map(GenreReadDto::from)
                .unwrap_or_default(),
        }
    }
}

impl From<SeriesCreateDto> for Series {
    fn from(dto: SeriesCreateDto) -> Self {
        Self {
            title: dto.title,
            release_year: dto.release_year,
            genre_id: dto.genre_id,
            ..Self::default()
        }
    }
}

impl SeriesUpdateDto {
    /// Copies the mutable fields. A changed genre id drops the loaded genre so
    /// the record never pairs one genre id with another genre.
    pub fn apply_to(self, series: &mut Series) {
        if series.genre_id != self.genre_id {
            series.genre = None;
        }
        series.title = self.title;
        series.release_year = self.release_year;
        series.genre_id = self.genre_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Genre, Season};

    fn drama() -> Genre {
        Genre {
            id: 3,
            name: "Drama".to_string(),
            series: None,
        }
    }

    #[test]
    fn genre_projection_matches_foreign_key() {
        let series = Series {
            id: 7,
            title: "Better Call Saul".to_string(),
            release_year: 2015,
            genre_id: 3,
            genre: Some(drama()),
            seasons: None,
        };

        let dto = SeriesReadDto::from(&series);
        assert_eq!(dto.genre.id, series.genre_id);
        assert_eq!(dto.genre.name, "Drama");
    }

    #[test]
    fn missing_genre_maps_to_empty_projection() {
        let series = Series {
            id: 1,
            title: "Orphan".to_string(),
            release_year: 2000,
            genre_id: 9,
            ..Series::default()
        };

        let dto = SeriesReadDto::from(&series);
        assert_eq!(dto.genre, GenreReadDto::default());
    }

    #[test]
    fn create_then_read_preserves_fields() {
        let create = SeriesCreateDto {
            title: "Narcos".to_string(),
            release_year: 2015,
            genre_id: 4,
        };

        let mut series = Series::from(create.clone());
        assert_eq!(series.id, 0);
        series.id = 12;
        series.genre = Some(Genre {
            id: 4,
            name: "Criminal".to_string(),
            series: None,
        });

        let read = SeriesReadDto::from(&series);
        assert_eq!(read.title, create.title);
        assert_eq!(read.release_year, create.release_year);
        assert_eq!(read.genre.id, create.genre_id);
    }

    #[test]
    fn update_keeps_identity_and_navigations() {
        let mut series = Series {
            id: 5,
            title: "Old".to_string(),
            release_year: 1999,
            genre_id: 3,
            genre: Some(drama()),
            seasons: Some(vec![Season {
                id: 1,
                number: 1,
                series_id: 5,
                ..Season::default()
            }]),
        };

        SeriesUpdateDto {
            title: "New".to_string(),
            release_year: 2001,
            genre_id: 3,
        }
        .apply_to(&mut series);

        assert_eq!(series.id, 5);
        assert_eq!(series.title, "New");
        assert_eq!(series.release_year, 2001);
        assert!(series.genre.is_some());
        assert_eq!(series.seasons.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn release_year_is_range_checked() {
        let too_early = SeriesCreateDto {
            title: "Silent".to_string(),
            release_year: 1899,
            genre_id: 1,
        };
        let errors = too_early.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("release_year"));

        let fine = SeriesCreateDto {
            release_year: 2100,
            ..too_early
        };
        assert!(fine.validate().is_ok());
    }
}
