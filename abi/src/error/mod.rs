use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

use crate::{BookingStatus, EmployeeId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("database error: {0}")]
    DbError(sqlx::Error),

    #[error("Failed to read configuration file")]
    ConfigReadError,

    #[error("Failed to parse configuration file")]
    ConfigParseError,

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("booking dates must be ahead of booked-on date")]
    BookedAfterStay,

    #[error("check-in date must precede check-out date")]
    InvalidStay,

    #[error("government ID expiring on {0} must stay valid at least 180 days past checkout")]
    GovtIdExpiring(NaiveDate),

    #[error("unsupported government ID type: {0}")]
    UnknownGovtIdType(String),

    #[error("room {0} is not available for the requested dates")]
    RoomUnavailable(i32),

    #[error("employee {0} is not active")]
    InactiveEmployee(EmployeeId),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    AlreadyExists(String),

    #[error("booking status cannot change from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("invalid page size {0}, expected 1..=100")]
    InvalidPageSize(i64),

    #[error("invalid skip {0}")]
    InvalidSkip(i64),

    #[error("{kind} not found: {key}")]
    NotFound { kind: Entity, key: String },

    #[error("internal error: {0}")]
    Internal(String),
}

/// how a caller should react to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    NotFound,
    Persistence,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Employee,
    Customer,
    Room,
    RoomType,
    RoomState,
    GovtIdType,
    BookingStatus,
    Booking,
    Role,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Employee => "employee",
            Entity::Customer => "customer",
            Entity::Room => "room",
            Entity::RoomType => "room type",
            Entity::RoomState => "room state",
            Entity::GovtIdType => "government ID type",
            Entity::BookingStatus => "booking status",
            Entity::Booking => "booking",
            Entity::Role => "role",
        };
        f.write_str(name)
    }
}

impl Error {
    pub fn not_found(kind: Entity, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DbError(_) | Error::Internal(_) => ErrorKind::Persistence,
            Error::ConfigReadError | Error::ConfigParseError => ErrorKind::Config,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::InvalidCredentials => ErrorKind::Unauthorized,
            _ => ErrorKind::Validation,
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // sqlx errors carry no equality, any two are considered the same
            (Self::DbError(_), Self::DbError(_)) => true,
            (Self::ConfigReadError, Self::ConfigReadError) => true,
            (Self::ConfigParseError, Self::ConfigParseError) => true,
            (Self::InvalidPayload(v1), Self::InvalidPayload(v2)) => v1 == v2,
            (Self::BookedAfterStay, Self::BookedAfterStay) => true,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::InvalidStay, Self::InvalidStay) => true,
            (Self::GovtIdExpiring(v1), Self::GovtIdExpiring(v2)) => v1 == v2,
            (Self::UnknownGovtIdType(v1), Self::UnknownGovtIdType(v2)) => v1 == v2,
            (Self::RoomUnavailable(v1), Self::RoomUnavailable(v2)) => v1 == v2,
            (Self::InactiveEmployee(v1), Self::InactiveEmployee(v2)) => v1 == v2,
            (Self::AlreadyExists(v1), Self::AlreadyExists(v2)) => v1 == v2,
            (
                Self::InvalidTransition { from: f1, to: t1 },
                Self::InvalidTransition { from: f2, to: t2 },
            ) => f1 == f2 && t1 == t2,
            (Self::InvalidPageSize(v1), Self::InvalidPageSize(v2)) => v1 == v2,
            (Self::InvalidSkip(v1), Self::InvalidSkip(v2)) => v1 == v2,
            (Self::Internal(v1), Self::Internal(v2)) => v1 == v2,
            (Self::NotFound { kind: k1, key: v1 }, Self::NotFound { kind: k2, key: v2 }) => {
                k1 == k2 && v1 == v2
            }
            _ => false,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(e) => {
                let Some(err) = e.try_downcast_ref::<PgDatabaseError>() else {
                    return Error::DbError(sqlx::Error::Database(e));
                };
                match err.code() {
                    // unique_violation
                    "23505" => Error::AlreadyExists(
                        err.detail()
                            .unwrap_or("record already registered")
                            .to_string(),
                    ),
                    // check_violation
                    "23514" => Error::InvalidPayload(format!(
                        "constraint {} violated",
                        err.constraint().unwrap_or("unknown")
                    )),
                    // string_data_right_truncation
                    "22001" => Error::InvalidPayload(
                        "value too long for its column".to_string(),
                    ),
                    _ => Error::DbError(sqlx::Error::Database(e)),
                }
            }
            _ => Error::DbError(e),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(e: validator::ValidationErrors) -> Self {
        Error::InvalidPayload(e.to_string())
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Persistence | ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// translate domain errors into http responses
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match self.kind() {
            ErrorKind::Persistence | ErrorKind::Config => {
                tracing::error!(error = ?self, "request failed");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_should_be_classified() {
        assert_eq!(Error::InvalidStay.kind(), ErrorKind::Validation);
        assert_eq!(Error::RoomUnavailable(101).kind(), ErrorKind::Validation);
        assert_eq!(
            Error::not_found(Entity::Booking, 7).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::DbError(sqlx::Error::PoolTimedOut).kind(),
            ErrorKind::Persistence
        );
        assert_eq!(Error::ConfigReadError.kind(), ErrorKind::Config);
        assert_eq!(Error::InvalidCredentials.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn errors_should_map_to_http_status() {
        assert_eq!(
            Error::BookedAfterStay.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::not_found(Entity::Employee, "a@b.com")
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::DbError(sqlx::Error::PoolClosed)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn not_found_message_should_name_the_entity() {
        let err = Error::not_found(Entity::RoomType, "Penthouse");
        assert_eq!(err.to_string(), "room type not found: Penthouse");
    }

    #[test]
    fn transition_message_should_name_both_states() {
        let err = Error::InvalidTransition {
            from: BookingStatus::Cancelled,
            to: BookingStatus::Booked,
        };
        assert_eq!(
            err.to_string(),
            "booking status cannot change from Cancelled to Booked"
        );
    }

    #[test]
    fn non_database_sqlx_errors_should_be_persistence() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }
}
