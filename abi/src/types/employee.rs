use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use validator::Validate;

use crate::{Address, EmployeeId, Error, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EmployeeDetails {
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
    #[serde(default)]
    pub is_active: bool,
}

/// payload for creating an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub emp_details: EmployeeDetails,
    pub emp_address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub emp_id: EmployeeId,
    pub emp_details: EmployeeDetails,
    pub emp_address: Address,
}

/// returned once, right after creation; only the hash is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePassword {
    pub emp_id: EmployeeId,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManageEmployee {
    pub emp_id: EmployeeId,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManageEmployeeIn {
    pub is_active: bool,
}

impl Validator for NewEmployee {
    fn validate(&self) -> Result<(), Error> {
        Validate::validate(&self.emp_details)?;
        Validator::validate(&self.emp_address)
    }
}

impl FromRow<'_, PgRow> for Employee {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            emp_id: row.try_get("emp_id")?,
            emp_details: EmployeeDetails {
                first_name: row.try_get("first_name")?,
                middle_name: row.try_get("middle_name")?,
                last_name: row.try_get("last_name")?,
                email: row.try_get("email")?,
                phone: row.try_get("phone")?,
                is_active: row.try_get("is_active")?,
            },
            emp_address: Address::from_row(row)?,
        })
    }
}
