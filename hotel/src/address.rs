use abi::{Address, Error};
use sqlx::PgConnection;

/// Which person table an address row hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddressOwner {
    Employee,
    Customer,
}

impl AddressOwner {
    fn table(&self) -> &'static str {
        match self {
            AddressOwner::Employee => "hotel.employee_addresses",
            AddressOwner::Customer => "hotel.customer_addresses",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            AddressOwner::Employee => "emp_id",
            AddressOwner::Customer => "customer_id",
        }
    }
}

pub(crate) async fn insert_address(
    conn: &mut PgConnection,
    owner: AddressOwner,
    owner_id: i64,
    address: &Address,
) -> Result<(), Error> {
    let sql = format!(
        r#"
        INSERT INTO {} ({}, first_line, second_line, landmark, district, state, pin, address_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
        owner.table(),
        owner.column()
    );
    sqlx::query(&sql)
        .bind(owner_id)
        .bind(&address.first_line)
        .bind(&address.second_line)
        .bind(&address.landmark)
        .bind(&address.district)
        .bind(&address.state)
        .bind(&address.pin)
        .bind(address.address_type.to_string())
        .execute(conn)
        .await?;
    Ok(())
}

/// Joins the first address of each person, `a.` columns decode into `Address`.
pub(crate) fn address_join(owner: AddressOwner, person_alias: &str) -> String {
    format!(
        "JOIN {table} a ON a.id = (SELECT min(id) FROM {table} WHERE {col} = {person_alias}.id)",
        table = owner.table(),
        col = owner.column(),
    )
}

pub(crate) const ADDRESS_COLUMNS: &str =
    "a.first_line, a.second_line, a.landmark, a.district, a.state, a.pin, a.address_type";
