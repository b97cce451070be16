use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::Error;

mod address;
mod booking;
mod booking_query;
mod booking_status;
mod customer;
mod employee;
mod lookup;
mod pagination;
mod reference;
mod role;
mod room;

pub use address::*;
pub use booking::*;
pub use booking_query::*;
pub use booking_status::*;
pub use customer::*;
pub use employee::*;
pub use lookup::*;
pub use pagination::*;
pub use reference::*;
pub use role::*;
pub use room::*;

/// days a government ID has to remain valid after checkout
pub const GOVT_ID_MIN_VALIDITY_DAYS: i64 = 180;

/// A stay, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

impl DateRange {
    pub fn new(checkin: NaiveDate, checkout: NaiveDate) -> Self {
        Self { checkin, checkout }
    }

    /// `self.checkin <= other.checkout AND self.checkout >= other.checkin`,
    /// the same predicate the availability query runs
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.checkin <= other.checkout && self.checkout >= other.checkin
    }
}

pub fn validate_stay(
    booked_on: DateTime<Utc>,
    checkin: NaiveDate,
    checkout: NaiveDate,
) -> Result<(), Error> {
    let booked = booked_on.date_naive();
    if booked > checkin || booked > checkout {
        return Err(Error::BookedAfterStay);
    }
    if checkin > checkout {
        return Err(Error::InvalidStay);
    }
    Ok(())
}

/// IDs without an expiry date are accepted as is
pub fn validate_govt_id_expiry(
    expiry: Option<NaiveDate>,
    checkout: NaiveDate,
) -> Result<(), Error> {
    let Some(exp) = expiry else {
        return Ok(());
    };
    // past the last representable date nothing can stay valid long enough
    match checkout.checked_add_signed(Duration::days(GOVT_ID_MIN_VALIDITY_DAYS)) {
        Some(needed) if exp >= needed => Ok(()),
        _ => Err(Error::GovtIdExpiring(exp)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn validate_stay_should_work() {
        assert!(validate_stay(
            at("2025-02-20T10:00:00Z"),
            date("2025-03-01"),
            date("2025-03-05")
        )
        .is_ok());
    }

    #[test]
    fn same_day_booking_and_stay_should_be_allowed() {
        assert!(validate_stay(
            at("2025-03-01T23:59:00Z"),
            date("2025-03-01"),
            date("2025-03-01")
        )
        .is_ok());
    }

    #[test]
    fn reversed_stay_should_fail() {
        let err = validate_stay(
            at("2025-02-20T10:00:00Z"),
            date("2025-03-05"),
            date("2025-03-01"),
        )
        .unwrap_err();
        assert_eq!(err, Error::InvalidStay);
    }

    #[test]
    fn booking_after_checkin_should_fail() {
        let err = validate_stay(
            at("2025-03-02T08:00:00Z"),
            date("2025-03-01"),
            date("2025-03-05"),
        )
        .unwrap_err();
        assert_eq!(err, Error::BookedAfterStay);
    }

    #[test]
    fn govt_id_expiry_should_cover_180_days_past_checkout() {
        let checkout = date("2025-03-05");
        assert!(validate_govt_id_expiry(Some(date("2026-01-01")), checkout).is_ok());
        // exactly 180 days is enough
        assert!(validate_govt_id_expiry(Some(date("2025-09-01")), checkout).is_ok());
        assert_eq!(
            validate_govt_id_expiry(Some(date("2025-08-31")), checkout).unwrap_err(),
            Error::GovtIdExpiring(date("2025-08-31"))
        );
    }

    #[test]
    fn checkout_near_the_calendar_end_should_fail_without_panic() {
        let checkout = NaiveDate::MAX - Duration::days(30);
        assert_eq!(
            validate_govt_id_expiry(Some(NaiveDate::MAX), checkout).unwrap_err(),
            Error::GovtIdExpiring(NaiveDate::MAX)
        );
    }

    #[test]
    fn govt_id_without_expiry_should_pass() {
        assert!(validate_govt_id_expiry(None, date("2025-03-05")).is_ok());
    }

    #[test]
    fn overlapping_ranges_should_be_detected() {
        let booked = DateRange::new(date("2025-03-01"), date("2025-03-05"));
        assert!(booked.overlaps(&DateRange::new(date("2025-03-03"), date("2025-03-08"))));
        assert!(booked.overlaps(&DateRange::new(date("2025-02-25"), date("2025-03-01"))));
        assert!(booked.overlaps(&DateRange::new(date("2025-03-02"), date("2025-03-03"))));
        assert!(!booked.overlaps(&DateRange::new(date("2025-03-06"), date("2025-03-09"))));
        assert!(!booked.overlaps(&DateRange::new(date("2025-02-20"), date("2025-02-28"))));
    }
}
