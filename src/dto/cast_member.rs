use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_cast_position;
use crate::domain::{CastPosition, UnknownCastPosition};
use crate::models::CastMember;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CastMemberReadDto {
    pub id: i32,
    pub name: String,
    pub position: CastPosition,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CastMemberCreateDto {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters."))]
    pub name: String,
    #[validate(custom(function = "validate_cast_position"))]
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CastMemberUpdateDto {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters."))]
    pub name: String,
    #[validate(custom(function = "validate_cast_position"))]
    pub position: i32,
}

impl From<&CastMember> for CastMemberReadDto {
    fn from(member: &CastMember) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            position: member.position,
        }
    }
}

impl TryFrom<CastMemberCreateDto> for CastMember {
    type Error = UnknownCastPosition;

    fn try_from(dto: CastMemberCreateDto) -> Result<Self, Self::Error> {
        Ok(Self {
            name: dto.name,
            position: CastPosition::try_from(dto.position)?,
            ..Self::default()
        })
    }
}

impl CastMemberUpdateDto {
    /// Merges onto `member`; leaves it untouched when the position is unknown.
    pub fn apply_to(self, member: &mut CastMember) -> Result<(), UnknownCastPosition> {
        let position = CastPosition::try_from(self.position)?;
        member.name = self.name;
        member.position = position;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_position_fails_validation() {
        let dto = CastMemberCreateDto {
            name: "Vince Gilligan".to_string(),
            position: 12,
        };

        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("position"));
        assert_eq!(CastMember::try_from(dto), Err(UnknownCastPosition(12)));
    }

    #[test]
    fn known_position_maps_to_enum() {
        let dto = CastMemberCreateDto {
            name: "Vince Gilligan".to_string(),
            position: 3,
        };
        assert!(dto.validate().is_ok());

        let member = CastMember::try_from(dto).unwrap();
        assert_eq!(member.position, CastPosition::Writer);

        let read = CastMemberReadDto::from(&member);
        assert_eq!(read.name, "Vince Gilligan");
        assert_eq!(serde_json::to_value(&read).unwrap()["position"], 3);
    }

    #[test]
    fn rejected_update_leaves_member_unchanged() {
        let mut member = CastMember {
            id: 2,
            name: "Justin Roiland".to_string(),
            position: CastPosition::Director,
            appearances: None,
        };

        let result = CastMemberUpdateDto {
            name: "Changed".to_string(),
            position: -3,
        }
        .apply_to(&mut member);

        assert!(result.is_err());
        assert_eq!(member.name, "Justin Roiland");
    }
}
