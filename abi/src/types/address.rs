use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use validator::Validate;

use crate::{Error, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressType {
    Permanent,
    Correspondence,
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressType::Permanent => write!(f, "Permanent"),
            AddressType::Correspondence => write!(f, "Correspondence"),
        }
    }
}

impl FromStr for AddressType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Permanent" => Ok(AddressType::Permanent),
            "Correspondence" => Ok(AddressType::Correspondence),
            _ => Err(Error::InvalidPayload(format!("unknown address type {s}"))),
        }
    }
}

/// Postal address shared by employees and customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(min = 1, max = 60))]
    pub first_line: String,
    #[validate(length(max = 60))]
    pub second_line: Option<String>,
    #[validate(length(max = 30))]
    pub landmark: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub district: String,
    #[validate(length(min = 1, max = 20))]
    pub state: String,
    #[validate(length(min = 1, max = 10))]
    pub pin: String,
    pub address_type: AddressType,
}

impl Validator for Address {
    fn validate(&self) -> Result<(), Error> {
        Validate::validate(self)?;
        Ok(())
    }
}

impl FromRow<'_, PgRow> for Address {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let address_type: String = row.try_get("address_type")?;
        let address_type = address_type
            .parse()
            .map_err(|e: Error| sqlx::Error::Decode(e.to_string().into()))?;

        Ok(Self {
            first_line: row.try_get("first_line")?,
            second_line: row.try_get("second_line")?,
            landmark: row.try_get("landmark")?,
            district: row.try_get("district")?,
            state: row.try_get("state")?,
            pin: row.try_get("pin")?,
            address_type,
        })
    }
}
