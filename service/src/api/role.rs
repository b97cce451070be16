use abi::{Error, NewRole, Role, Validator};
use axum::{extract::State, http::StatusCode, Json};
use hotel::Roles;

use crate::HotelService;

pub(crate) async fn add(
    State(svc): State<HotelService>,
    Json(role): Json<NewRole>,
) -> Result<(StatusCode, Json<Role>), Error> {
    role.validate()?;
    let mut conn = svc.db.acquire().await?;
    let created = svc.employees.add_role(&mut conn, role).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn list(State(svc): State<HotelService>) -> Result<Json<Vec<Role>>, Error> {
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.employees.list_roles(&mut conn).await?))
}
