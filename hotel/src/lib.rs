mod address;
mod booking;
mod customer;
mod db;
mod employee;
mod password;
mod registry;
mod role;
mod room;
#[cfg(test)]
mod test_utils;

use abi::{
    Booking, BookingId, BookingIn, BookingQuery, BookingResult, BookingUpdate, Credentials,
    Customer, CustomerId, Employee, EmployeeId, EmployeeLogin, EmployeePassword, EmployeeRoles,
    Error, Lookup, ManageEmployee, NewCustomer, NewEmployee, NewRole, NewRoom, Pagination,
    ReferenceItem, Role, Room, RoomId, RoomQuery, RoomUpdate,
};
use async_trait::async_trait;
use sqlx::{postgres::PgArguments, query::QueryAs, PgConnection, Postgres};

pub use db::HotelDb;
pub use registry::ReferenceRegistry;

#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeManager;

#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerManager;

/// Rooms plus the two reference lists that classify them.
#[derive(Debug, Clone, Copy)]
pub struct RoomManager {
    types: ReferenceRegistry,
    states: ReferenceRegistry,
}

#[derive(Debug, Clone, Copy)]
pub struct BookingManager {
    employees: EmployeeManager,
    customers: CustomerManager,
    rooms: RoomManager,
    govt_ids: ReferenceRegistry,
    statuses: ReferenceRegistry,
}

#[async_trait]
pub trait Employees {
    /// create an employee with a generated password
    async fn create(
        &self,
        conn: &mut PgConnection,
        employee: NewEmployee,
    ) -> Result<EmployeePassword, Error>;
    /// get an employee by id, email or phone
    async fn get(&self, conn: &mut PgConnection, lookup: Lookup) -> Result<Employee, Error>;
    async fn list(&self, conn: &mut PgConnection, page: Pagination)
        -> Result<Vec<Employee>, Error>;
    /// activate or deactivate an employee
    async fn set_active(
        &self,
        conn: &mut PgConnection,
        id: EmployeeId,
        is_active: bool,
    ) -> Result<ManageEmployee, Error>;
    /// fails unless the employee exists and is active
    async fn ensure_active(&self, conn: &mut PgConnection, id: EmployeeId) -> Result<(), Error>;
    /// check the password and record the login, returns the roles held
    async fn login(
        &self,
        conn: &mut PgConnection,
        credentials: Credentials,
        ip: Option<String>,
    ) -> Result<EmployeeLogin, Error>;
}

#[async_trait]
pub trait Roles {
    async fn add_role(&self, conn: &mut PgConnection, role: NewRole) -> Result<Role, Error>;
    async fn list_roles(&self, conn: &mut PgConnection) -> Result<Vec<Role>, Error>;
    /// grant a role by name, granting it again is a no-op
    async fn assign_role(
        &self,
        conn: &mut PgConnection,
        emp_id: EmployeeId,
        role: &str,
    ) -> Result<EmployeeRoles, Error>;
    async fn employee_roles(
        &self,
        conn: &mut PgConnection,
        emp_id: EmployeeId,
    ) -> Result<EmployeeRoles, Error>;
}

#[async_trait]
pub trait Rooms {
    async fn add_room_type(&self, conn: &mut PgConnection, name: &str)
        -> Result<ReferenceItem, Error>;
    async fn list_room_types(&self, conn: &mut PgConnection) -> Result<Vec<ReferenceItem>, Error>;
    async fn add_room_state(
        &self,
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<ReferenceItem, Error>;
    async fn list_room_states(&self, conn: &mut PgConnection)
        -> Result<Vec<ReferenceItem>, Error>;
    /// add a room, its state defaults to `Available`
    async fn add(&self, conn: &mut PgConnection, room: NewRoom) -> Result<Room, Error>;
    async fn get(&self, conn: &mut PgConnection, room_number: i32) -> Result<Room, Error>;
    /// list rooms, optionally by type and state
    async fn list(&self, conn: &mut PgConnection, query: RoomQuery) -> Result<Vec<Room>, Error>;
    /// change type and/or state of a room
    async fn update(
        &self,
        conn: &mut PgConnection,
        room_number: i32,
        update: RoomUpdate,
    ) -> Result<Room, Error>;
    /// internal id of a room number
    async fn room_id(&self, conn: &mut PgConnection, room_number: i32) -> Result<RoomId, Error>;
}

#[async_trait]
pub trait Customers {
    async fn create(&self, conn: &mut PgConnection, customer: NewCustomer)
        -> Result<CustomerId, Error>;
    async fn get(&self, conn: &mut PgConnection, lookup: Lookup) -> Result<Customer, Error>;
    async fn list(&self, conn: &mut PgConnection, page: Pagination)
        -> Result<Vec<Customer>, Error>;
    /// reuse the customer matching the phone, then the email, otherwise create one
    async fn resolve_or_create(
        &self,
        conn: &mut PgConnection,
        customer: &NewCustomer,
    ) -> Result<CustomerId, Error>;
}

#[async_trait]
pub trait Bookings {
    /// validate and book a room, the booking ends up `Booked`
    async fn create(&self, conn: &mut PgConnection, booking: BookingIn)
        -> Result<BookingResult, Error>;
    async fn get(&self, conn: &mut PgConnection, id: BookingId) -> Result<Booking, Error>;
    async fn list(&self, conn: &mut PgConnection, query: BookingQuery)
        -> Result<Vec<Booking>, Error>;
    /// change comments and/or move the booking along its lifecycle
    async fn update(
        &self,
        conn: &mut PgConnection,
        id: BookingId,
        update: BookingUpdate,
    ) -> Result<Booking, Error>;
    /// cancel a booking, cancelling twice is not an error
    async fn cancel(&self, conn: &mut PgConnection, id: BookingId) -> Result<Booking, Error>;
    async fn add_govt_id_type(
        &self,
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<ReferenceItem, Error>;
    async fn list_govt_id_types(&self, conn: &mut PgConnection)
        -> Result<Vec<ReferenceItem>, Error>;
    async fn list_statuses(&self, conn: &mut PgConnection) -> Result<Vec<ReferenceItem>, Error>;
}

/// `WHERE` fragment for a person lookup, the value is always `$1`
fn lookup_filter(lookup: &Lookup, alias: &str) -> String {
    match lookup {
        Lookup::ById(_) => format!("{alias}.id = $1"),
        Lookup::ByEmail(_) => format!("lower({alias}.email) = lower($1)"),
        Lookup::ByPhone(_) => format!("{alias}.phone = $1"),
    }
}

fn bind_lookup<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    lookup: &Lookup,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match lookup {
        Lookup::ById(id) => query.bind(*id),
        Lookup::ByEmail(value) | Lookup::ByPhone(value) => query.bind(value.clone()),
    }
}
