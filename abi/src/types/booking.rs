use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use validator::Validate;

use crate::{
    validate_govt_id_expiry, validate_stay, BookingId, BookingStatus, CustomerId, DateRange,
    EmployeeId, Error, NewCustomer, Validator,
};

/// booking half of the create payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewBooking {
    #[serde(default = "Utc::now")]
    pub booked_on: DateTime<Utc>,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    #[validate(length(min = 1, max = 20))]
    pub government_id_type: String,
    #[validate(length(min = 1, max = 20))]
    pub government_id_number: String,
    #[serde(default)]
    pub exp_date: Option<NaiveDate>,
    pub room_num: i32,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub comments: Option<String>,
    pub emp_id: EmployeeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingIn {
    pub customer: NewCustomer,
    pub booking: NewBooking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub booking_ref: String,
    pub booked_on: DateTime<Utc>,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub government_id_type: String,
    pub government_id_number: String,
    pub exp_date: Option<NaiveDate>,
    pub comments: Option<String>,
    pub status: BookingStatus,
    pub customer_id: CustomerId,
    pub room_num: i32,
    pub emp_id: EmployeeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResult {
    pub msg: String,
    pub booking_id: BookingId,
    pub booking_ref: String,
    pub customer_id: CustomerId,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingUpdate {
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl NewBooking {
    pub fn stay(&self) -> DateRange {
        DateRange::new(self.checkin, self.checkout)
    }
}

/// Checks everything that can be decided without the database.
impl Validator for NewBooking {
    fn validate(&self) -> Result<(), Error> {
        Validate::validate(self)?;
        validate_stay(self.booked_on, self.checkin, self.checkout)?;
        validate_govt_id_expiry(self.exp_date, self.checkout)
    }
}

impl Validator for BookingIn {
    fn validate(&self) -> Result<(), Error> {
        // dates first, they are the cheapest thing to get wrong
        Validator::validate(&self.booking)?;
        self.customer.validate()
    }
}

impl Validator for BookingUpdate {
    fn validate(&self) -> Result<(), Error> {
        if self.status.is_none() && self.comments.is_none() {
            return Err(Error::InvalidPayload(
                "nothing to update, give status or comments".to_string(),
            ));
        }
        if let Some(comments) = &self.comments {
            if comments.chars().count() > 255 {
                return Err(Error::InvalidPayload(
                    "comments must be at most 255 characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Booking {
    pub fn stay(&self) -> DateRange {
        DateRange::new(self.checkin, self.checkout)
    }
}

impl FromRow<'_, PgRow> for Booking {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse()
            .map_err(|e: Error| sqlx::Error::Decode(e.to_string().into()))?;

        Ok(Self {
            id: row.try_get("id")?,
            booking_ref: row.try_get("booking_ref")?,
            booked_on: row.try_get("booked_on")?,
            checkin: row.try_get("checkin")?,
            checkout: row.try_get("checkout")?,
            government_id_type: row.try_get("govt_id_type")?,
            government_id_number: row.try_get("govt_id_num")?,
            exp_date: row.try_get("govt_id_exp")?,
            comments: row.try_get("comments")?,
            status,
            customer_id: row.try_get("customer_id")?,
            room_num: row.try_get("room_number")?,
            emp_id: row.try_get("emp_id")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(checkin: &str, checkout: &str, exp_date: Option<&str>) -> BookingIn {
        serde_json::from_value(serde_json::json!({
            "customer": {
                "customer_details": {
                    "first_name": "Meera",
                    "middle_name": null,
                    "last_name": "Nair",
                    "email": "meera@example.com",
                    "phone": "555-0100"
                },
                "customer_address": {
                    "first_line": "7 Beach Road",
                    "second_line": null,
                    "landmark": null,
                    "district": "Kochi",
                    "state": "Kerala",
                    "pin": "682001",
                    "address_type": "Permanent"
                }
            },
            "booking": {
                "booked_on": "2025-02-01T09:30:00Z",
                "checkin": checkin,
                "checkout": checkout,
                "government_id_type": "Passport",
                "government_id_number": "K1234567",
                "exp_date": exp_date,
                "room_num": 101,
                "comments": "late arrival",
                "emp_id": 1
            }
        }))
        .unwrap()
    }

    #[test]
    fn valid_booking_should_pass() {
        let b = payload("2025-03-01", "2025-03-05", Some("2026-01-01"));
        assert!(b.validate().is_ok());
        assert_eq!(b.booking.stay().checkout.to_string(), "2025-03-05");
    }

    #[test]
    fn reversed_dates_should_fail() {
        let b = payload("2025-03-05", "2025-03-01", None);
        assert_eq!(b.validate().unwrap_err(), Error::InvalidStay);
    }

    #[test]
    fn soon_expiring_id_should_fail() {
        let b = payload("2025-03-01", "2025-03-05", Some("2025-06-01"));
        assert_eq!(
            b.validate().unwrap_err(),
            Error::GovtIdExpiring("2025-06-01".parse().unwrap())
        );
    }

    #[test]
    fn far_future_stay_should_fail_validation() {
        let b = payload("+262142-11-20", "+262142-12-01", Some("+262142-12-31"));
        assert_eq!(
            b.validate().unwrap_err(),
            Error::GovtIdExpiring("+262142-12-31".parse().unwrap())
        );
    }

    #[test]
    fn booked_on_should_default_to_now() {
        let mut value = serde_json::to_value(payload("2030-03-01", "2030-03-05", None)).unwrap();
        value["booking"]
            .as_object_mut()
            .unwrap()
            .remove("booked_on");
        let b: BookingIn = serde_json::from_value(value).unwrap();
        assert!(Utc::now() - b.booking.booked_on < chrono::Duration::seconds(60));
        assert!(b.validate().is_ok());
    }

    #[test]
    fn empty_update_should_fail() {
        assert!(BookingUpdate::default().validate().is_err());
        let update: BookingUpdate = serde_json::from_str(r#"{"status": "Confirmed"}"#).unwrap();
        assert_eq!(update.status, Some(BookingStatus::Confirmed));
        assert!(update.validate().is_ok());
    }
}
