use serde::{Deserialize, Serialize};

use crate::Error;

/// How a person record (employee or customer) is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    ById(i64),
    ByEmail(String),
    ByPhone(String),
}

/// Query string form of [`Lookup`]: exactly one of the fields must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupParams {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl TryFrom<LookupParams> for Lookup {
    type Error = Error;

    fn try_from(params: LookupParams) -> Result<Self, Self::Error> {
        match (params.id, params.email, params.phone) {
            (Some(id), None, None) => Ok(Lookup::ById(id)),
            (None, Some(email), None) => Ok(Lookup::ByEmail(email)),
            (None, None, Some(phone)) => Ok(Lookup::ByPhone(phone)),
            _ => Err(Error::InvalidPayload(
                "exactly one of id, email or phone is required".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::ById(id) => write!(f, "id {id}"),
            Lookup::ByEmail(email) => write!(f, "email {email}"),
            Lookup::ByPhone(phone) => write!(f, "phone {phone}"),
        }
    }
}
