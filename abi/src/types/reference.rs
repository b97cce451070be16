use serde::{Deserialize, Serialize};

use crate::{Entity, Error, ReferenceId};

/// longest name the reference tables hold
pub const REFERENCE_NAME_MAX_LEN: usize = 20;

/// The small name tables the rest of the schema points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    RoomType,
    RoomState,
    GovtIdType,
    BookingStatus,
}

impl ReferenceKind {
    pub fn table(&self) -> &'static str {
        match self {
            ReferenceKind::RoomType => "hotel.room_types",
            ReferenceKind::RoomState => "hotel.room_states",
            ReferenceKind::GovtIdType => "hotel.govt_id_types",
            ReferenceKind::BookingStatus => "hotel.booking_statuses",
        }
    }

    pub fn entity(&self) -> Entity {
        match self {
            ReferenceKind::RoomType => Entity::RoomType,
            ReferenceKind::RoomState => Entity::RoomState,
            ReferenceKind::GovtIdType => Entity::GovtIdType,
            ReferenceKind::BookingStatus => Entity::BookingStatus,
        }
    }

    /// trimmed name, rejected when empty or too long for the table
    pub fn check_name<'a>(&self, name: &'a str) -> Result<&'a str, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidPayload(format!(
                "{} name is required",
                self.entity()
            )));
        }
        if name.chars().count() > REFERENCE_NAME_MAX_LEN {
            return Err(Error::InvalidPayload(format!(
                "{} name must be at most {REFERENCE_NAME_MAX_LEN} characters",
                self.entity()
            )));
        }
        Ok(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReferenceItem {
    pub id: ReferenceId,
    pub name: String,
}

/// body of the `*/add/` endpoints for reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReference {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_name_should_trim() {
        assert_eq!(ReferenceKind::RoomType.check_name("  Suite ").unwrap(), "Suite");
    }

    #[test]
    fn blank_name_should_be_rejected() {
        assert_eq!(
            ReferenceKind::RoomState.check_name("   ").unwrap_err(),
            Error::InvalidPayload("room state name is required".into())
        );
    }

    #[test]
    fn long_name_should_be_rejected() {
        let err = ReferenceKind::GovtIdType
            .check_name("Overseas Citizen of India Card")
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidPayload(
                "government ID type name must be at most 20 characters".into()
            )
        );
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
        // the limit counts characters, not bytes
        assert!(ReferenceKind::RoomType.check_name("Größe Größe Größe Gr").is_ok());
    }
}
