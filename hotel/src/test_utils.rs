use abi::{
    Address, AddressType, CustomerDetails, EmployeeDetails, NewCustomer, NewEmployee,
};
use sqlx::{pool::PoolConnection, Postgres};
use sqlx_db_tester::TestDb;

/// A throwaway database with all migrations applied, dropped with the value.
pub struct TestHotelDb {
    tdb: TestDb,
}

impl TestHotelDb {
    pub fn new() -> Self {
        let _ = dotenvy::dotenv();
        let password = std::env::var("PGPASSWORD").unwrap_or_else(|_| "postgres".to_string());
        Self {
            tdb: TestDb::new("localhost", 5432, "postgres", &password, "../migrations"),
        }
    }

    pub async fn conn(&self) -> PoolConnection<Postgres> {
        self.tdb.get_pool().await.acquire().await.unwrap()
    }
}

pub fn address() -> Address {
    Address {
        first_line: "12 Marine Drive".to_string(),
        second_line: None,
        landmark: None,
        district: "Mumbai".to_string(),
        state: "Maharashtra".to_string(),
        pin: "400020".to_string(),
        address_type: AddressType::Permanent,
    }
}

pub fn new_employee(email: &str, phone: &str) -> NewEmployee {
    NewEmployee {
        emp_details: EmployeeDetails {
            first_name: "Ravi".to_string(),
            middle_name: None,
            last_name: "Kumar".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            is_active: true,
        },
        emp_address: address(),
    }
}

pub fn new_customer(email: &str, phone: &str) -> NewCustomer {
    NewCustomer {
        customer_details: CustomerDetails {
            first_name: "Meera".to_string(),
            middle_name: None,
            last_name: "Nair".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        },
        customer_address: address(),
    }
}
