//! Domain primitives shared by the catalog records and the wire layer.
//!
//! Cast positions are a closed set. Anything outside it is rejected at the
//! boundary instead of being coerced to a default.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a cast member holds across the episodes they appear in.
///
/// Stored and transmitted as its integer code.
///
/// # Examples
///
/// ```rust
/// use tvcatalog::domain::CastPosition;
///
/// assert_eq!(CastPosition::try_from(1), Ok(CastPosition::Director));
/// assert_eq!(i32::from(CastPosition::Writer), 3);
/// assert!(CastPosition::try_from(42).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum CastPosition {
    #[default]
    Actor = 0,
    Director = 1,
    Producer = 2,
    Writer = 3,
}

impl CastPosition {
    /// Every recognized position, in code order.
    pub const ALL: [Self; 4] = [Self::Actor, Self::Director, Self::Producer, Self::Writer];

    /// Returns the integer code persisted for this position.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Returns true if `code` names a recognized position.
    #[must_use]
    pub fn is_known(code: i32) -> bool {
        Self::ALL.iter().any(|position| position.code() == code)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "Actor",
            Self::Director => "Director",
            Self::Producer => "Producer",
            Self::Writer => "Writer",
        }
    }
}

/// Error returned when an integer does not name a [`CastPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not a recognized cast position")]
pub struct UnknownCastPosition(pub i32);

impl TryFrom<i32> for CastPosition {
    type Error = UnknownCastPosition;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|position| position.code() == code)
            .ok_or(UnknownCastPosition(code))
    }
}

impl From<CastPosition> for i32 {
    fn from(position: CastPosition) -> Self {
        position.code()
    }
}

impl fmt::Display for CastPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_declared_discriminants() {
        assert_eq!(CastPosition::Actor.code(), 0);
        assert_eq!(CastPosition::Director.code(), 1);
        assert_eq!(CastPosition::Producer.code(), 2);
        assert_eq!(CastPosition::Writer.code(), 3);
    }

    #[test]
    fn membership_is_closed() {
        for position in CastPosition::ALL {
            assert!(CastPosition::is_known(position.code()));
            assert_eq!(CastPosition::try_from(position.code()), Ok(position));
        }
        assert!(!CastPosition::is_known(-1));
        assert!(!CastPosition::is_known(4));
        assert_eq!(CastPosition::try_from(99), Err(UnknownCastPosition(99)));
    }

    #[test]
    fn serializes_as_integer_code() {
        let json = serde_json::to_string(&CastPosition::Director).unwrap();
        assert_eq!(json, "1");

        let parsed: CastPosition = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, CastPosition::Writer);

        assert!(serde_json::from_str::<CastPosition>("7").is_err());
    }
}
