use abi::{
    Credentials, Employee, EmployeeId, EmployeeLogin, EmployeePassword, Entity, Error, Lookup,
    ManageEmployee, NewEmployee, Normalizer, Pagination, Validator,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Connection, PgConnection, Row};
use tracing::{info, warn};

use crate::{
    address::{address_join, insert_address, AddressOwner, ADDRESS_COLUMNS},
    bind_lookup, lookup_filter,
    password::{generate_password, hash_password, verify_password},
    role::roles_of,
    EmployeeManager, Employees,
};

fn employee_select() -> String {
    format!(
        "SELECT e.id AS emp_id, e.first_name, e.middle_name, e.last_name, e.email, e.phone, \
         e.is_active, {ADDRESS_COLUMNS} FROM hotel.employees e {}",
        address_join(AddressOwner::Employee, "e")
    )
}

#[async_trait]
impl Employees for EmployeeManager {
    async fn create(
        &self,
        conn: &mut PgConnection,
        employee: NewEmployee,
    ) -> Result<EmployeePassword, Error> {
        employee.validate()?;
        let details = &employee.emp_details;

        let taken: Option<(String, String)> = sqlx::query_as(
            "SELECT email, phone FROM hotel.employees WHERE lower(email) = lower($1) OR phone = $2 LIMIT 1",
        )
        .bind(&details.email)
        .bind(&details.phone)
        .fetch_optional(&mut *conn)
        .await?;
        if let Some((email, _)) = taken {
            let what = if email.eq_ignore_ascii_case(&details.email) {
                "email"
            } else {
                "phone"
            };
            return Err(Error::AlreadyExists(format!(
                "employee with this {what} already registered"
            )));
        }

        let password = generate_password();
        let password_hash = hash_password(&password).await?;

        let mut tx = conn.begin().await?;
        let emp_id: EmployeeId = sqlx::query(
            r#"
            INSERT INTO hotel.employees (first_name, middle_name, last_name, email, phone, password_hash, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&details.first_name)
        .bind(&details.middle_name)
        .bind(&details.last_name)
        .bind(&details.email)
        .bind(&details.phone)
        .bind(password_hash)
        .bind(details.is_active)
        .fetch_one(&mut *tx)
        .await?
        .get(0);
        insert_address(&mut tx, AddressOwner::Employee, emp_id, &employee.emp_address).await?;
        tx.commit().await?;

        info!(emp_id, "employee created");
        Ok(EmployeePassword { emp_id, password })
    }

    async fn get(&self, conn: &mut PgConnection, lookup: Lookup) -> Result<Employee, Error> {
        let sql = format!("{} WHERE {}", employee_select(), lookup_filter(&lookup, "e"));
        bind_lookup(sqlx::query_as(&sql), &lookup)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| Error::not_found(Entity::Employee, &lookup))
    }

    async fn list(
        &self,
        conn: &mut PgConnection,
        mut page: Pagination,
    ) -> Result<Vec<Employee>, Error> {
        page.normalize()?;
        let sql = format!("{} ORDER BY e.id OFFSET $1 LIMIT $2", employee_select());
        Ok(sqlx::query_as(&sql)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(conn)
            .await?)
    }

    async fn set_active(
        &self,
        conn: &mut PgConnection,
        id: EmployeeId,
        is_active: bool,
    ) -> Result<ManageEmployee, Error> {
        let updated: Option<(EmployeeId, bool)> = sqlx::query_as(
            "UPDATE hotel.employees SET is_active = $2 WHERE id = $1 RETURNING id, is_active",
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(conn)
        .await?;

        let (emp_id, is_active) = updated.ok_or_else(|| Error::not_found(Entity::Employee, id))?;
        info!(emp_id, is_active, "employee status changed");
        Ok(ManageEmployee { emp_id, is_active })
    }

    async fn ensure_active(&self, conn: &mut PgConnection, id: EmployeeId) -> Result<(), Error> {
        let active: Option<bool> =
            sqlx::query_scalar("SELECT is_active FROM hotel.employees WHERE id = $1")
                .bind(id)
                .fetch_optional(conn)
                .await?;
        match active {
            None => Err(Error::not_found(Entity::Employee, id)),
            Some(false) => {
                warn!(emp_id = id, "inactive employee attempted a booking");
                Err(Error::InactiveEmployee(id))
            }
            Some(true) => Ok(()),
        }
    }

    async fn login(
        &self,
        conn: &mut PgConnection,
        credentials: Credentials,
        ip: Option<String>,
    ) -> Result<EmployeeLogin, Error> {
        credentials.validate()?;
        let found: Option<(EmployeeId, String, bool)> = sqlx::query_as(
            "SELECT id, password_hash, is_active FROM hotel.employees WHERE lower(email) = lower($1)",
        )
        .bind(&credentials.email)
        .fetch_optional(&mut *conn)
        .await?;

        // unknown email and wrong password look the same to the caller
        let Some((emp_id, password_hash, is_active)) = found else {
            warn!("login attempt for an unknown email");
            return Err(Error::InvalidCredentials);
        };
        if !verify_password(&credentials.password, &password_hash).await? {
            warn!(emp_id, "login attempt with a wrong password");
            return Err(Error::InvalidCredentials);
        }
        if !is_active {
            warn!(emp_id, "inactive employee attempted to log in");
            return Err(Error::InactiveEmployee(emp_id));
        }

        // the right-hand sides read the values from before the update
        let (login_count, last_login_at, current_login_at): (
            i32,
            Option<DateTime<Utc>>,
            DateTime<Utc>,
        ) = sqlx::query_as(
            r#"
            UPDATE hotel.employees
            SET last_login_at = current_login_at,
                last_login_ip = current_login_ip,
                current_login_at = now(),
                current_login_ip = $2,
                login_count = login_count + 1
            WHERE id = $1
            RETURNING login_count, last_login_at, current_login_at
            "#,
        )
        .bind(emp_id)
        .bind(ip)
        .fetch_one(&mut *conn)
        .await?;

        let roles = roles_of(conn, emp_id).await?;
        info!(emp_id, login_count, "employee logged in");
        Ok(EmployeeLogin {
            emp_id,
            login_count,
            last_login_at,
            current_login_at,
            roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{new_employee, TestHotelDb};

    #[test]
    fn employee_select_should_alias_the_id() {
        let sql = employee_select();
        assert!(sql.starts_with("SELECT e.id AS emp_id"));
        assert!(sql.contains("JOIN hotel.employee_addresses a"));
    }

    #[tokio::test]
    async fn create_should_return_a_verifiable_password() {
        let tdb = TestHotelDb::new();
        let mut conn = tdb.conn().await;
        let manager = EmployeeManager;
        let created = manager
            .create(&mut conn, new_employee("ravi@example.com", "9800000001"))
            .await
            .unwrap();

        let hash: String =
            sqlx::query_scalar("SELECT password_hash FROM hotel.employees WHERE id = $1")
                .bind(created.emp_id)
                .fetch_one(&mut *conn)
                .await
                .unwrap();
        assert!(bcrypt::verify(&created.password, &hash).unwrap());

        let emp = manager
            .get(&mut conn, Lookup::ByEmail("RAVI@example.com".into()))
            .await
            .unwrap();
        assert_eq!(emp.emp_id, created.emp_id);
        assert_eq!(emp.emp_address.district, "Mumbai");
    }

    #[tokio::test]
    async fn duplicate_phone_should_be_rejected() {
        let tdb = TestHotelDb::new();
        let mut conn = tdb.conn().await;
        let manager = EmployeeManager;
        manager
            .create(&mut conn, new_employee("a@example.com", "9800000001"))
            .await
            .unwrap();
        let err = manager
            .create(&mut conn, new_employee("b@example.com", "9800000001"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::AlreadyExists("employee with this phone already registered".into())
        );
    }

    #[tokio::test]
    async fn inactive_employee_should_fail_the_check() {
        let tdb = TestHotelDb::new();
        let mut conn = tdb.conn().await;
        let manager = EmployeeManager;
        let created = manager
            .create(&mut conn, new_employee("a@example.com", "9800000001"))
            .await
            .unwrap();
        manager.ensure_active(&mut conn, created.emp_id).await.unwrap();

        let managed = manager
            .set_active(&mut conn, created.emp_id, false)
            .await
            .unwrap();
        assert!(!managed.is_active);
        assert_eq!(
            manager.ensure_active(&mut conn, created.emp_id).await,
            Err(Error::InactiveEmployee(created.emp_id))
        );
        assert_eq!(
            manager.ensure_active(&mut conn, 9999).await,
            Err(Error::not_found(Entity::Employee, 9999))
        );
    }

    #[tokio::test]
    async fn login_should_verify_and_count() {
        let tdb = TestHotelDb::new();
        let mut conn = tdb.conn().await;
        let manager = EmployeeManager;
        let created = manager
            .create(&mut conn, new_employee("ravi@example.com", "9800000001"))
            .await
            .unwrap();
        let credentials = |password: &str| Credentials {
            email: "Ravi@Example.com".to_string(),
            password: password.to_string(),
        };

        let first = manager
            .login(
                &mut conn,
                credentials(created.password.as_str()),
                Some("10.0.0.7".into()),
            )
            .await
            .unwrap();
        assert_eq!(first.emp_id, created.emp_id);
        assert_eq!(first.login_count, 1);
        assert_eq!(first.last_login_at, None);
        assert!(first.roles.is_empty());

        let second = manager
            .login(&mut conn, credentials(created.password.as_str()), None)
            .await
            .unwrap();
        assert_eq!(second.login_count, 2);
        assert_eq!(second.last_login_at, Some(first.current_login_at));

        let last_ip: Option<String> =
            sqlx::query_scalar("SELECT last_login_ip FROM hotel.employees WHERE id = $1")
                .bind(created.emp_id)
                .fetch_one(&mut *conn)
                .await
                .unwrap();
        assert_eq!(last_ip.as_deref(), Some("10.0.0.7"));
    }

    #[tokio::test]
    async fn login_should_reject_bad_credentials() {
        let tdb = TestHotelDb::new();
        let mut conn = tdb.conn().await;
        let manager = EmployeeManager;
        let created = manager
            .create(&mut conn, new_employee("ravi@example.com", "9800000001"))
            .await
            .unwrap();

        let wrong = Credentials {
            email: "ravi@example.com".to_string(),
            password: format!("{}x", created.password),
        };
        assert_eq!(
            manager.login(&mut conn, wrong, None).await,
            Err(Error::InvalidCredentials)
        );
        let unknown = Credentials {
            email: "nobody@example.com".to_string(),
            password: created.password.clone(),
        };
        assert_eq!(
            manager.login(&mut conn, unknown, None).await,
            Err(Error::InvalidCredentials)
        );

        manager
            .set_active(&mut conn, created.emp_id, false)
            .await
            .unwrap();
        let right = Credentials {
            email: "ravi@example.com".to_string(),
            password: created.password,
        };
        assert_eq!(
            manager.login(&mut conn, right, None).await,
            Err(Error::InactiveEmployee(created.emp_id))
        );

        let count: i32 =
            sqlx::query_scalar("SELECT login_count FROM hotel.employees WHERE id = $1")
                .bind(created.emp_id)
                .fetch_one(&mut *conn)
                .await
                .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn list_should_page_by_id() {
        let tdb = TestHotelDb::new();
        let mut conn = tdb.conn().await;
        let manager = EmployeeManager;
        for i in 0..3 {
            manager
                .create(
                    &mut conn,
                    new_employee(&format!("e{i}@example.com"), &format!("98000000{i}")),
                )
                .await
                .unwrap();
        }
        let page = manager
            .list(&mut conn, Pagination::new(1, 5))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert!(page[0].emp_id < page[1].emp_id);
    }
}
