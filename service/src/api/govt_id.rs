use abi::{Error, NewReference, ReferenceItem, ReferenceKind};
use axum::{extract::State, http::StatusCode, Json};
use hotel::Bookings;

use crate::HotelService;

pub(crate) async fn add(
    State(svc): State<HotelService>,
    Json(body): Json<NewReference>,
) -> Result<(StatusCode, Json<ReferenceItem>), Error> {
    let name = ReferenceKind::GovtIdType.check_name(&body.name)?;
    let mut conn = svc.db.acquire().await?;
    let item = svc.bookings.add_govt_id_type(&mut conn, name).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub(crate) async fn list(
    State(svc): State<HotelService>,
) -> Result<Json<Vec<ReferenceItem>>, Error> {
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.bookings.list_govt_id_types(&mut conn).await?))
}
