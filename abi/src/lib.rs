mod config;
mod error;
mod types;

pub use config::*;
pub use error::{Entity, Error, ErrorKind};
pub use types::*;

pub type EmployeeId = i64;
pub type CustomerId = i64;
pub type RoomId = i64;
pub type BookingId = i64;
pub type ReferenceId = i32;
pub type RoleId = i32;

/// validate the data structure, raise error if invalid
pub trait Validator {
    fn validate(&self) -> Result<(), Error>;
}

/// fill in defaults before validating
pub trait Normalizer: Validator {
    /// caller should call normalize to make sure the data structure is ready for further processing
    fn normalize(&mut self) -> Result<(), Error> {
        self.do_normalize();
        self.validate()?;
        Ok(())
    }

    /// user shall implement do_normalize() to normalize the data structure
    fn do_normalize(&mut self);
}

/// render a query object into a SQL statement
pub trait ToSql {
    fn to_sql(&self) -> String;
}
