use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{BookingStatus, CustomerId, Error, Normalizer, Pagination, ToSql, Validator};

/// columns every booking read returns, see `FromRow for Booking`
pub const BOOKING_SELECT: &str = "SELECT b.id, b.booking_ref, b.booked_on, b.checkin, b.checkout, \
g.name AS govt_id_type, b.govt_id_num, b.govt_id_exp, b.comments, s.name AS status, \
b.customer_id, r.room_number, b.emp_id \
FROM hotel.bookings b \
JOIN hotel.booking_statuses s ON s.id = b.booking_status_id \
JOIN hotel.govt_id_types g ON g.id = b.govt_id_type_id \
JOIN hotel.rooms r ON r.id = b.room_id";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(build_fn(private, name = "private_build"), default)]
#[serde(default)]
pub struct BookingQuery {
    #[builder(setter(into, strip_option))]
    pub status: Option<BookingStatus>,
    #[builder(setter(into, strip_option))]
    pub room_number: Option<i32>,
    #[builder(setter(into, strip_option))]
    pub customer_id: Option<CustomerId>,
    pub desc: bool,
    pub skip: i64,
    pub limit: i64,
}

impl BookingQueryBuilder {
    pub fn build(&self) -> Result<BookingQuery, Error> {
        let mut query = self
            .private_build()
            .map_err(|e| Error::InvalidPayload(e.to_string()))?;
        query.normalize()?;
        Ok(query)
    }
}

impl BookingQuery {
    pub fn page(&self) -> Pagination {
        Pagination::new(self.skip, self.limit)
    }
}

impl Validator for BookingQuery {
    fn validate(&self) -> Result<(), Error> {
        self.page().validate()
    }
}

impl Normalizer for BookingQuery {
    fn do_normalize(&mut self) {
        let mut page = self.page();
        page.do_normalize();
        self.limit = page.limit;
    }
}

// every filter is a number or a known status name, so they are inlined
impl ToSql for BookingQuery {
    fn to_sql(&self) -> String {
        let mut conds = vec![];
        if let Some(status) = self.status {
            conds.push(format!("s.name = '{}'", status));
        }
        if let Some(room_number) = self.room_number {
            conds.push(format!("r.room_number = {}", room_number));
        }
        if let Some(customer_id) = self.customer_id {
            conds.push(format!("b.customer_id = {}", customer_id));
        }
        let cond = if conds.is_empty() {
            "TRUE".to_string()
        } else {
            conds.join(" AND ")
        };

        let direction = if self.desc { "DESC" } else { "ASC" };

        format!(
            "{} WHERE {} ORDER BY b.id {} OFFSET {} LIMIT {}",
            BOOKING_SELECT, cond, direction, self.skip, self.limit
        )
    }
}
