use abi::{
    Error, NewReference, NewRoom, Normalizer, ReferenceItem, ReferenceKind, Room, RoomQuery,
    RoomUpdate, Validator,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use hotel::Rooms;

use crate::HotelService;

pub(crate) async fn add_type(
    State(svc): State<HotelService>,
    Json(body): Json<NewReference>,
) -> Result<(StatusCode, Json<ReferenceItem>), Error> {
    let name = ReferenceKind::RoomType.check_name(&body.name)?;
    let mut conn = svc.db.acquire().await?;
    let item = svc.rooms.add_room_type(&mut conn, name).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub(crate) async fn list_types(
    State(svc): State<HotelService>,
) -> Result<Json<Vec<ReferenceItem>>, Error> {
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.rooms.list_room_types(&mut conn).await?))
}

pub(crate) async fn add_state(
    State(svc): State<HotelService>,
    Json(body): Json<NewReference>,
) -> Result<(StatusCode, Json<ReferenceItem>), Error> {
    let name = ReferenceKind::RoomState.check_name(&body.name)?;
    let mut conn = svc.db.acquire().await?;
    let item = svc.rooms.add_room_state(&mut conn, name).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub(crate) async fn list_states(
    State(svc): State<HotelService>,
) -> Result<Json<Vec<ReferenceItem>>, Error> {
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.rooms.list_room_states(&mut conn).await?))
}

pub(crate) async fn add(
    State(svc): State<HotelService>,
    Json(room): Json<NewRoom>,
) -> Result<(StatusCode, Json<Room>), Error> {
    room.validate()?;
    let mut conn = svc.db.acquire().await?;
    let room = svc.rooms.add(&mut conn, room).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

pub(crate) async fn list(
    State(svc): State<HotelService>,
    Query(mut query): Query<RoomQuery>,
) -> Result<Json<Vec<Room>>, Error> {
    query.normalize()?;
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.rooms.list(&mut conn, query).await?))
}

pub(crate) async fn update(
    State(svc): State<HotelService>,
    Path(room_number): Path<i32>,
    Json(update): Json<RoomUpdate>,
) -> Result<Json<Room>, Error> {
    update.validate()?;
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.rooms.update(&mut conn, room_number, update).await?))
}
