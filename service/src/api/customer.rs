use abi::{
    CreateCustomerResult, Customer, Error, Lookup, LookupParams, NewCustomer, Normalizer,
    Pagination, Validator,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use hotel::Customers;

use crate::HotelService;

pub(crate) async fn add(
    State(svc): State<HotelService>,
    Json(customer): Json<NewCustomer>,
) -> Result<(StatusCode, Json<CreateCustomerResult>), Error> {
    customer.validate()?;
    let mut conn = svc.db.acquire().await?;
    let customer_id = svc.customers.create(&mut conn, customer).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateCustomerResult {
            msg: "customer created".to_string(),
            customer_id,
        }),
    ))
}

pub(crate) async fn get(
    State(svc): State<HotelService>,
    Query(params): Query<LookupParams>,
) -> Result<Json<Customer>, Error> {
    let lookup = Lookup::try_from(params)?;
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.customers.get(&mut conn, lookup).await?))
}

pub(crate) async fn list(
    State(svc): State<HotelService>,
    Query(mut page): Query<Pagination>,
) -> Result<Json<Vec<Customer>>, Error> {
    page.normalize()?;
    let mut conn = svc.db.acquire().await?;
    Ok(Json(svc.customers.list(&mut conn, page).await?))
}
