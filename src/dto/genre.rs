use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Genre;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenreReadDto {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenreCreateDto {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters."))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenreUpdateDto {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters."))]
    pub name: String,
}

impl From<&Genre> for GenreReadDto {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name.clone(),
        }
    }
}

impl From<GenreCreateDto> for Genre {
    fn from(dto: GenreCreateDto) -> Self {
        Self {
            name: dto.name,
            ..Self::default()
        }
    }
}

impl GenreUpdateDto {
    pub fn apply_to(self, genre: &mut Genre) {
        genre.name = self.name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_read_keeps_name() {
        let genre = Genre::from(GenreCreateDto {
            name: "Sitcom".to_string(),
        });
        assert_eq!(genre.id, 0);

        let dto = GenreReadDto::from(&genre);
        assert_eq!(dto.name, "Sitcom");
    }

    #[test]
    fn name_length_is_bounded() {
        let empty = GenreCreateDto {
            name: String::new(),
        };
        assert!(empty.validate().is_err());

        let long = GenreCreateDto {
            name: "x".repeat(256),
        };
        assert!(long.validate().is_err());

        let ok = GenreCreateDto {
            name: "x".repeat(255),
        };
        assert!(ok.validate().is_ok());
    }
}
