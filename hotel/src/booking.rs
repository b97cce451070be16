use abi::{
    Booking, BookingId, BookingIn, BookingQuery, BookingResult, BookingStatus, BookingUpdate,
    DateRange, Entity, Error, Normalizer, ReferenceItem, ReferenceKind, RoomId, ToSql, Validator,
    BOOKING_SELECT,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rand::Rng;
use sqlx::{Connection, PgConnection, Row};
use tracing::{info, warn};

use crate::{
    BookingManager, Bookings, CustomerManager, Customers, EmployeeManager, Employees,
    ReferenceRegistry, RoomManager,
};

const REF_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const REF_SUFFIX_LEN: usize = 6;

/// `BK<yyyymmdd><6 uppercase alphanumerics>`
pub(crate) fn generate_booking_ref(date: NaiveDate) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..REF_SUFFIX_LEN)
        .map(|_| REF_CHARSET[rng.gen_range(0..REF_CHARSET.len())] as char)
        .collect();
    format!("BK{}{}", date.format("%Y%m%d"), suffix)
}

impl Default for BookingManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingManager {
    pub fn new() -> Self {
        Self {
            employees: EmployeeManager,
            customers: CustomerManager,
            rooms: RoomManager::new(),
            govt_ids: ReferenceRegistry::new(ReferenceKind::GovtIdType),
            statuses: ReferenceRegistry::new(ReferenceKind::BookingStatus),
        }
    }

    async fn govt_id_type_id(&self, conn: &mut PgConnection, name: &str) -> Result<i32, Error> {
        match self.govt_ids.id_of(conn, name).await {
            Err(Error::NotFound { .. }) => Err(Error::UnknownGovtIdType(name.to_string())),
            other => other,
        }
    }

    async fn set_status(
        &self,
        conn: &mut PgConnection,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<(), Error> {
        let status_id = self.statuses.id_of(conn, status.name()).await?;
        sqlx::query("UPDATE hotel.bookings SET booking_status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(status_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Fails when a Booked or Confirmed booking of the room overlaps `stay`, ends inclusive.
    async fn ensure_room_available(
        &self,
        conn: &mut PgConnection,
        room_id: RoomId,
        room_number: i32,
        stay: DateRange,
        exclude: Option<BookingId>,
    ) -> Result<(), Error> {
        let active: Vec<String> = BookingStatus::ALL
            .iter()
            .filter(|s| s.is_active())
            .map(|s| s.name().to_lowercase())
            .collect();

        let clash: Option<BookingId> = sqlx::query_scalar(
            r#"
            SELECT b.id FROM hotel.bookings b
            JOIN hotel.booking_statuses s ON s.id = b.booking_status_id
            WHERE b.room_id = $1
              AND lower(s.name) = ANY($2)
              AND b.checkin <= $3
              AND b.checkout >= $4
              AND ($5::bigint IS NULL OR b.id <> $5)
            LIMIT 1
            "#,
        )
        .bind(room_id)
        .bind(active)
        .bind(stay.checkout)
        .bind(stay.checkin)
        .bind(exclude)
        .fetch_optional(conn)
        .await?;

        match clash {
            Some(existing) => {
                warn!(room_number, existing, "room already booked for these dates");
                Err(Error::RoomUnavailable(room_number))
            }
            None => Ok(()),
        }
    }

    async fn fetch(
        &self,
        conn: &mut PgConnection,
        id: BookingId,
        for_update: bool,
    ) -> Result<Booking, Error> {
        let lock = if for_update { " FOR UPDATE OF b" } else { "" };
        let sql = format!("{BOOKING_SELECT} WHERE b.id = $1{lock}");
        sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| Error::not_found(Entity::Booking, id))
    }
}

#[async_trait]
impl Bookings for BookingManager {
    async fn create(
        &self,
        conn: &mut PgConnection,
        booking_in: BookingIn,
    ) -> Result<BookingResult, Error> {
        // handlers validate up front too, this covers every other caller
        booking_in.validate()?;
        let BookingIn { customer, booking } = booking_in;

        let mut tx = conn.begin().await?;
        self.employees.ensure_active(&mut tx, booking.emp_id).await?;
        let govt_id_type_id = self
            .govt_id_type_id(&mut tx, &booking.government_id_type)
            .await?;

        // concurrent bookings of the same room queue up here
        let room_id = self.rooms.lock(&mut tx, booking.room_num).await?;
        self.ensure_room_available(&mut tx, room_id, booking.room_num, booking.stay(), None)
            .await?;

        let customer_id = self.customers.resolve_or_create(&mut tx, &customer).await?;

        let pending_id = self
            .statuses
            .id_of(&mut tx, BookingStatus::Pending.name())
            .await?;
        let booking_ref = generate_booking_ref(booking.booked_on.date_naive());
        let booking_id: BookingId = sqlx::query(
            r#"
            INSERT INTO hotel.bookings (booking_ref, booked_on, checkin, checkout, govt_id_type_id,
                govt_id_num, govt_id_exp, comments, booking_status_id, customer_id, room_id, emp_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&booking_ref)
        .bind(booking.booked_on)
        .bind(booking.checkin)
        .bind(booking.checkout)
        .bind(govt_id_type_id)
        .bind(&booking.government_id_number)
        .bind(booking.exp_date)
        .bind(&booking.comments)
        .bind(pending_id)
        .bind(customer_id)
        .bind(room_id)
        .bind(booking.emp_id)
        .fetch_one(&mut *tx)
        .await?
        .get(0);

        let status = BookingStatus::Pending.transition_to(BookingStatus::Booked)?;
        self.set_status(&mut tx, booking_id, status).await?;
        tx.commit().await?;

        info!(
            booking_id,
            %booking_ref,
            customer_id,
            room_number = booking.room_num,
            "booking created"
        );
        Ok(BookingResult {
            msg: "booking created".to_string(),
            booking_id,
            booking_ref,
            customer_id,
            status,
        })
    }

    async fn get(&self, conn: &mut PgConnection, id: BookingId) -> Result<Booking, Error> {
        self.fetch(conn, id, false).await
    }

    async fn list(
        &self,
        conn: &mut PgConnection,
        mut query: BookingQuery,
    ) -> Result<Vec<Booking>, Error> {
        query.normalize()?;
        let sql = query.to_sql();
        Ok(sqlx::query_as(&sql).fetch_all(conn).await?)
    }

    async fn update(
        &self,
        conn: &mut PgConnection,
        id: BookingId,
        update: BookingUpdate,
    ) -> Result<Booking, Error> {
        update.validate()?;

        let mut tx = conn.begin().await?;
        let current = self.fetch(&mut tx, id, true).await?;

        if let Some(next) = update.status.filter(|s| *s != current.status) {
            current.status.transition_to(next)?;
            if next.is_active() && !current.status.is_active() {
                let room_id = self.rooms.lock(&mut tx, current.room_num).await?;
                self.ensure_room_available(
                    &mut tx,
                    room_id,
                    current.room_num,
                    current.stay(),
                    Some(id),
                )
                .await?;
            }
            self.set_status(&mut tx, id, next).await?;
            info!(booking_id = id, from = %current.status, to = %next, "booking status changed");
        }

        if let Some(comments) = &update.comments {
            sqlx::query("UPDATE hotel.bookings SET comments = $2 WHERE id = $1")
                .bind(id)
                .bind(comments)
                .execute(&mut *tx)
                .await?;
        }

        let booking = self.fetch(&mut tx, id, false).await?;
        tx.commit().await?;
        Ok(booking)
    }

    async fn cancel(&self, conn: &mut PgConnection, id: BookingId) -> Result<Booking, Error> {
        let mut tx = conn.begin().await?;
        let current = self.fetch(&mut tx, id, true).await?;
        if current.status == BookingStatus::Cancelled {
            return Ok(current);
        }

        let next = current.status.transition_to(BookingStatus::Cancelled)?;
        self.set_status(&mut tx, id, next).await?;
        let booking = self.fetch(&mut tx, id, false).await?;
        tx.commit().await?;

        info!(booking_id = id, from = %current.status, "booking cancelled");
        Ok(booking)
    }

    async fn add_govt_id_type(
        &self,
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<ReferenceItem, Error> {
        self.govt_ids.add(conn, name).await
    }

    async fn list_govt_id_types(
        &self,
        conn: &mut PgConnection,
    ) -> Result<Vec<ReferenceItem>, Error> {
        self.govt_ids.list(conn).await
    }

    async fn list_statuses(&self, conn: &mut PgConnection) -> Result<Vec<ReferenceItem>, Error> {
        self.statuses.list(conn).await
    }
}
