use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use validator::Validate;

use crate::{Address, CustomerId, Error, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CustomerDetails {
    #[validate(length(min = 1, max = 20))]
    pub first_name: String,
    #[validate(length(max = 20))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub last_name: String,
    #[validate(email, length(max = 40))]
    pub email: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub customer_details: CustomerDetails,
    pub customer_address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub customer_details: CustomerDetails,
    pub customer_address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomerResult {
    pub msg: String,
    pub customer_id: CustomerId,
}

impl Validator for NewCustomer {
    fn validate(&self) -> Result<(), Error> {
        Validate::validate(&self.customer_details)?;
        Validator::validate(&self.customer_address)
    }
}

impl FromRow<'_, PgRow> for Customer {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            customer_id: row.try_get("customer_id")?,
            customer_details: CustomerDetails {
                first_name: row.try_get("first_name")?,
                middle_name: row.try_get("middle_name")?,
                last_name: row.try_get("last_name")?,
                email: row.try_get("email")?,
                phone: row.try_get("phone")?,
            },
            customer_address: Address::from_row(row)?,
        })
    }
}
