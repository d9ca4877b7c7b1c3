use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Season;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonReadDto {
    pub id: i32,
    pub number: i32,
    pub series_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SeasonCreateDto {
    #[validate(range(min = 1, message = "Season number must be at least 1."))]
    pub number: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SeasonUpdateDto {
    #[validate(range(min = 1, message = "Season number must be at least 1."))]
    pub number: i32,
}

impl From<&Season> for SeasonReadDto {
    fn from(season: &Season) -> Self {
        Self {
            id: season.id,
            number: season.number,
            series_id: season.series_id,
        }
    }
}

impl SeasonCreateDto {
    #[must_use]
    pub fn into_record(self, series_id: i32) -> Season {
        Season {
            number: self.number,
            series_id,
            ..Season::default()
        }
    }
}

impl SeasonUpdateDto {
    pub const fn apply_to(self, season: &mut Season) {
        season.number = self.number;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_uses_route_series() {
        let season = SeasonCreateDto { number: 2 }.into_record(4);
        assert_eq!(season.id, 0);
        assert_eq!(season.series_id, 4);

        let read = SeasonReadDto::from(&season);
        assert_eq!(read.number, 2);
        assert_eq!(read.series_id, 4);
    }

    #[test]
    fn number_starts_at_one() {
        assert!(SeasonCreateDto { number: 0 }.validate().is_err());
        assert!(SeasonCreateDto { number: 1 }.validate().is_ok());
    }
}
