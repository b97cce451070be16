use std::net::SocketAddr;

use abi::{
    AssignRole, Credentials, Employee, EmployeeId, EmployeeLogin, EmployeePassword, EmployeeRoles,
    Error, Lookup, LookupParams, ManageEmployee, ManageEmployeeIn, NewEmployee, Normalizer,
    Pagination, Validator,
};
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::StatusCode,
    Json,
};
use hotel::{Employees, Roles};

use crate::HotelService;

pub(crate) async fn add(
    State(svc): State<HotelService>,
    Json(employee): Json<NewEmployee>,
) -> Result<(StatusCode, Json<EmployeePassword>), Error> {
    employee.validate()?;
    let mut conn = svc.db.acquire().await?;
    let created = svc.employees.create(&mut conn, employee).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn get(
    State(svc): State<HotelService>,
    Query(params): Query<LookupParams>,
) -> Result<Json<Employee>, Error> {
    let lookup = Lookup::try_from(params)?;
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.employees.get(&mut conn, lookup).await?))
}

pub(crate) async fn list(
    State(svc): State<HotelService>,
    Query(mut page): Query<Pagination>,
) -> Result<Json<Vec<Employee>>, Error> {
    page.normalize()?;
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.employees.list(&mut conn, page).await?))
}

pub(crate) async fn manage(
    State(svc): State<HotelService>,
    Path(emp_id): Path<EmployeeId>,
    Json(body): Json<ManageEmployeeIn>,
) -> Result<Json<ManageEmployee>, Error> {
    let mut conn = svc.db.acquire().await?;
    let managed = svc
        .employees
        .set_active(&mut conn, emp_id, body.is_active)
        .await?;
    Ok(Json(managed))
}

/// the peer address is recorded when the server runs with connect info
pub(crate) async fn login(
    State(svc): State<HotelService>,
    peer: Option<ConnectInfo<SocketAddr>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<EmployeeLogin>, Error> {
    credentials.validate()?;
    let ip = peer.map(|ConnectInfo(addr)| addr.ip().to_string());
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.employees.login(&mut conn, credentials, ip).await?))
}

pub(crate) async fn roles(
    State(svc): State<HotelService>,
    Path(emp_id): Path<EmployeeId>,
) -> Result<Json<EmployeeRoles>, Error> {
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.employees.employee_roles(&mut conn, emp_id).await?))
}

pub(crate) async fn assign_role(
    State(svc): State<HotelService>,
    Path(emp_id): Path<EmployeeId>,
    Json(body): Json<AssignRole>,
) -> Result<Json<EmployeeRoles>, Error> {
    body.validate()?;
    let mut conn = svc.db.acquire().await?;
    let held = svc
        .employees
        .assign_role(&mut conn, emp_id, &body.role)
        .await?;
    Ok(Json(held))
}
