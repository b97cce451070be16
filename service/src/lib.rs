use std::net::SocketAddr;

use abi::Config;
use axum::Router;
use hotel::{BookingManager, CustomerManager, EmployeeManager, HotelDb, RoomManager};
use tower_http::trace::TraceLayer;
use tracing::info;

mod api;
mod service;
#[cfg(test)]
pub mod test_utils;

/// Shared by every handler; cloning it only clones the pool handle.
#[derive(Debug, Clone)]
pub struct HotelService {
    db: HotelDb,
    employees: EmployeeManager,
    rooms: RoomManager,
    customers: CustomerManager,
    bookings: BookingManager,
}

pub fn router(svc: HotelService) -> Router {
    api::router()
        .layer(TraceLayer::new_for_http())
        .merge(api::health_router())
        .with_state(svc)
}

pub async fn start_server(config: &Config) -> Result<(), anyhow::Error> {
    let addr: SocketAddr = config.server.addr().parse()?;
    let svc = HotelService::from_config(config).await?;
    svc.db.migrate().await?;

    info!("hotel service listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(router(svc).into_make_service_with_connect_info::<SocketAddr>())
        .await?;
    Ok(())
}
