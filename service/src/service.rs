use abi::Config;
use hotel::{BookingManager, CustomerManager, EmployeeManager, HotelDb, RoomManager};

use crate::HotelService;

impl HotelService {
    pub fn new(db: HotelDb) -> Self {
        Self {
            db,
            employees: EmployeeManager,
            rooms: RoomManager::new(),
            customers: CustomerManager,
            bookings: BookingManager::new(),
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        Ok(Self::new(HotelDb::from_config(&config.db).await?))
    }

    /// the pool connects on first use, handy when no request reaches the database
    pub fn lazy(config: &Config) -> Result<Self, anyhow::Error> {
        Ok(Self::new(HotelDb::connect_lazy(&config.db)?))
    }
}
