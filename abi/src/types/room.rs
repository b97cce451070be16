use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{Error, Normalizer, Pagination, Validator};

pub const DEFAULT_ROOM_STATE: &str = "Available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoom {
    pub room_number: i32,
    pub room_type: String,
    #[serde(default)]
    pub room_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Room {
    pub room_number: i32,
    pub room_type: String,
    pub room_state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUpdate {
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub room_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(build_fn(private, name = "private_build"), default)]
#[serde(default)]
pub struct RoomQuery {
    #[builder(setter(into, strip_option))]
    pub room_type: Option<String>,
    #[builder(setter(into, strip_option))]
    pub room_state: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

impl NewRoom {
    pub fn state(&self) -> &str {
        self.room_state.as_deref().unwrap_or(DEFAULT_ROOM_STATE)
    }
}

impl Validator for NewRoom {
    fn validate(&self) -> Result<(), Error> {
        if self.room_number <= 0 {
            return Err(Error::InvalidPayload(format!(
                "invalid room number {}",
                self.room_number
            )));
        }
        if self.room_type.trim().is_empty() {
            return Err(Error::InvalidPayload("room type is required".to_string()));
        }
        Ok(())
    }
}

impl Validator for RoomUpdate {
    fn validate(&self) -> Result<(), Error> {
        if self.room_type.is_none() && self.room_state.is_none() {
            return Err(Error::InvalidPayload(
                "nothing to update, give room_type or room_state".to_string(),
            ));
        }
        Ok(())
    }
}

impl RoomQueryBuilder {
    pub fn build(&self) -> Result<RoomQuery, Error> {
        let mut query = self
            .private_build()
            .map_err(|e| Error::InvalidPayload(e.to_string()))?;
        query.normalize()?;
        Ok(query)
    }
}

impl RoomQuery {
    pub fn page(&self) -> Pagination {
        Pagination::new(self.skip, self.limit)
    }
}

impl Validator for RoomQuery {
    fn validate(&self) -> Result<(), Error> {
        self.page().validate()
    }
}

impl Normalizer for RoomQuery {
    fn do_normalize(&mut self) {
        let mut page = self.page();
        page.do_normalize();
        self.limit = page.limit;
        // an empty filter means no filter
        self.room_type = self.room_type.take().filter(|s| !s.is_empty());
        self.room_state = self.room_state.take().filter(|s| !s.is_empty());
    }
}
