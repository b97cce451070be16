use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{EmployeeId, Error, RoleId, Validator};

/// A named set of permissions granted to employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub permissions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewRole {
    #[validate(length(min = 1, max = 45))]
    pub name: String,
    /// free form, e.g. `bookings:write,rooms:read`
    #[validate(length(min = 1, max = 255))]
    pub permissions: String,
}

/// body of `PUT /emp/role/{emp_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRole {
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRoles {
    pub emp_id: EmployeeId,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email, length(max = 40))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// outcome of a successful password check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeLogin {
    pub emp_id: EmployeeId,
    pub login_count: i32,
    /// the login before this one, if any
    pub last_login_at: Option<DateTime<Utc>>,
    pub current_login_at: DateTime<Utc>,
    pub roles: Vec<Role>,
}

impl Validator for NewRole {
    fn validate(&self) -> Result<(), Error> {
        Validate::validate(self)?;
        if self.name.trim().is_empty() {
            return Err(Error::InvalidPayload("role name is required".to_string()));
        }
        Ok(())
    }
}

impl Validator for AssignRole {
    fn validate(&self) -> Result<(), Error> {
        if self.role.trim().is_empty() {
            return Err(Error::InvalidPayload("role name is required".to_string()));
        }
        Ok(())
    }
}

impl Validator for Credentials {
    fn validate(&self) -> Result<(), Error> {
        Validate::validate(self)?;
        Ok(())
    }
}
