use abi::{
    Booking, BookingId, BookingIn, BookingQuery, BookingResult, BookingUpdate, Error, Normalizer,
    ReferenceItem, Validator,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use hotel::Bookings;
use tracing::info;

use crate::HotelService;

/// make a booking; date and ID checks run before a connection is taken
pub(crate) async fn add(
    State(svc): State<HotelService>,
    Json(booking): Json<BookingIn>,
) -> Result<(StatusCode, Json<BookingResult>), Error> {
    booking.validate()?;
    let mut conn = svc.db.acquire().await?;
    let result = svc.bookings.create(&mut conn, booking).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub(crate) async fn get(
    State(svc): State<HotelService>,
    Path(booking_id): Path<BookingId>,
) -> Result<Json<Booking>, Error> {
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.bookings.get(&mut conn, booking_id).await?))
}

/// filter by status, room number or customer, ordered by id
pub(crate) async fn list(
    State(svc): State<HotelService>,
    Query(mut query): Query<BookingQuery>,
) -> Result<Json<Vec<Booking>>, Error> {
    query.normalize()?;
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.bookings.list(&mut conn, query).await?))
}

pub(crate) async fn update(
    State(svc): State<HotelService>,
    Path(booking_id): Path<BookingId>,
    Json(update): Json<BookingUpdate>,
) -> Result<Json<Booking>, Error> {
    update.validate()?;
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.bookings.update(&mut conn, booking_id, update).await?))
}

pub(crate) async fn cancel(
    State(svc): State<HotelService>,
    Path(booking_id): Path<BookingId>,
) -> Result<Json<Booking>, Error> {
    let mut conn = svc.db.acquire().await?;
    let booking = svc.bookings.cancel(&mut conn, booking_id).await?;
    info!(booking_id, booking_ref = %booking.booking_ref, "cancel request handled");
    Ok(Json(booking))
}

pub(crate) async fn list_statuses(
    State(svc): State<HotelService>,
) -> Result<Json<Vec<ReferenceItem>>, Error> {
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.bookings.list_statuses(&mut conn).await?))
}
