use abi::{
    Customer, CustomerId, Entity, Error, Lookup, NewCustomer, Normalizer, Pagination, Validator,
};
use async_trait::async_trait;
use sqlx::{Connection, PgConnection, Row};
use tracing::{debug, info};

use crate::{
    address::{address_join, insert_address, AddressOwner, ADDRESS_COLUMNS},
    bind_lookup, lookup_filter, CustomerManager, Customers,
};

fn customer_select() -> String {
    format!(
        "SELECT c.id AS customer_id, c.first_name, c.middle_name, c.last_name, c.email, c.phone, \
         {ADDRESS_COLUMNS} FROM hotel.customers c {}",
        address_join(AddressOwner::Customer, "c")
    )
}

impl CustomerManager {
    async fn find_id(
        &self,
        conn: &mut PgConnection,
        lookup: &Lookup,
    ) -> Result<Option<CustomerId>, Error> {
        let sql = format!(
            "SELECT c.id FROM hotel.customers c WHERE {}",
            lookup_filter(lookup, "c")
        );
        let row = bind_lookup(sqlx::query_as::<_, (CustomerId,)>(&sql), lookup)
            .fetch_optional(conn)
            .await?;
        Ok(row.map(|(id,)| id))
    }

    /// Inserts customer and address on the caller's connection, without checks.
    pub(crate) async fn insert(
        &self,
        conn: &mut PgConnection,
        customer: &NewCustomer,
    ) -> Result<CustomerId, Error> {
        let details = &customer.customer_details;
        let customer_id: CustomerId = sqlx::query(
            r#"
            INSERT INTO hotel.customers (first_name, middle_name, last_name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&details.first_name)
        .bind(&details.middle_name)
        .bind(&details.last_name)
        .bind(&details.email)
        .bind(&details.phone)
        .fetch_one(&mut *conn)
        .await?
        .get(0);
        insert_address(
            conn,
            AddressOwner::Customer,
            customer_id,
            &customer.customer_address,
        )
        .await?;
        info!(customer_id, "customer created");
        Ok(customer_id)
    }
}

#[async_trait]
impl Customers for CustomerManager {
    async fn create(
        &self,
        conn: &mut PgConnection,
        customer: NewCustomer,
    ) -> Result<CustomerId, Error> {
        customer.validate()?;
        let details = &customer.customer_details;
        let by_email = Lookup::ByEmail(details.email.clone());
        let by_phone = Lookup::ByPhone(details.phone.clone());
        for lookup in [by_email, by_phone] {
            if self.find_id(conn, &lookup).await?.is_some() {
                return Err(Error::AlreadyExists(format!(
                    "customer with {lookup} already registered"
                )));
            }
        }

        let mut tx = conn.begin().await?;
        let customer_id = self.insert(&mut tx, &customer).await?;
        tx.commit().await?;
        Ok(customer_id)
    }

    async fn get(&self, conn: &mut PgConnection, lookup: Lookup) -> Result<Customer, Error> {
        let sql = format!("{} WHERE {}", customer_select(), lookup_filter(&lookup, "c"));
        bind_lookup(sqlx::query_as(&sql), &lookup)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| Error::not_found(Entity::Customer, &lookup))
    }

    async fn list(
        &self,
        conn: &mut PgConnection,
        mut page: Pagination,
    ) -> Result<Vec<Customer>, Error> {
        page.normalize()?;
        let sql = format!("{} ORDER BY c.id OFFSET $1 LIMIT $2", customer_select());
        Ok(sqlx::query_as(&sql)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(conn)
            .await?)
    }

    async fn resolve_or_create(
        &self,
        conn: &mut PgConnection,
        customer: &NewCustomer,
    ) -> Result<CustomerId, Error> {
        let details = &customer.customer_details;
        // phone wins when phone and email point at different customers
        let by_phone = Lookup::ByPhone(details.phone.clone());
        if let Some(id) = self.find_id(conn, &by_phone).await? {
            debug!(customer_id = id, "customer matched by phone");
            return Ok(id);
        }
        let by_email = Lookup::ByEmail(details.email.clone());
        if let Some(id) = self.find_id(conn, &by_email).await? {
            debug!(customer_id = id, "customer matched by email");
            return Ok(id);
        }
        self.insert(conn, customer).await
    }
}
