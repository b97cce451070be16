use abi::{EmployeeId, EmployeeRoles, Entity, Error, NewRole, Role, Validator};
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::info;

use crate::{EmployeeManager, Roles};

async fn ensure_employee(conn: &mut PgConnection, emp_id: EmployeeId) -> Result<(), Error> {
    let found: Option<EmployeeId> =
        sqlx::query_scalar("SELECT id FROM hotel.employees WHERE id = $1")
            .bind(emp_id)
            .fetch_optional(conn)
            .await?;
    found
        .map(|_| ())
        .ok_or_else(|| Error::not_found(Entity::Employee, emp_id))
}

async fn find_role(conn: &mut PgConnection, name: &str) -> Result<Option<Role>, Error> {
    Ok(sqlx::query_as(
        "SELECT id, name, permissions FROM hotel.roles WHERE lower(name) = lower($1)",
    )
    .bind(name.trim())
    .fetch_optional(conn)
    .await?)
}

/// roles held by an employee, who must exist
pub(crate) async fn roles_of(
    conn: &mut PgConnection,
    emp_id: EmployeeId,
) -> Result<Vec<Role>, Error> {
    Ok(sqlx::query_as(
        r#"
        SELECT r.id, r.name, r.permissions
        FROM hotel.roles r
        JOIN hotel.employee_roles er ON er.role_id = r.id
        WHERE er.emp_id = $1
        ORDER BY r.id
        "#,
    )
    .bind(emp_id)
    .fetch_all(conn)
    .await?)
}

#[async_trait]
impl Roles for EmployeeManager {
    async fn add_role(&self, conn: &mut PgConnection, role: NewRole) -> Result<Role, Error> {
        role.validate()?;
        let name = role.name.trim();
        if find_role(&mut *conn, name).await?.is_some() {
            return Err(Error::AlreadyExists(format!("role {name} already exists")));
        }

        let created: Role = sqlx::query_as(
            "INSERT INTO hotel.roles (name, permissions) VALUES ($1, $2) RETURNING id, name, permissions",
        )
        .bind(name)
        .bind(&role.permissions)
        .fetch_one(conn)
        .await?;
        info!(role_id = created.id, name = %created.name, "role added");
        Ok(created)
    }

    async fn list_roles(&self, conn: &mut PgConnection) -> Result<Vec<Role>, Error> {
        Ok(
            sqlx::query_as("SELECT id, name, permissions FROM hotel.roles ORDER BY id")
                .fetch_all(conn)
                .await?,
        )
    }

    async fn assign_role(
        &self,
        conn: &mut PgConnection,
        emp_id: EmployeeId,
        role: &str,
    ) -> Result<EmployeeRoles, Error> {
        ensure_employee(&mut *conn, emp_id).await?;
        let role = find_role(&mut *conn, role)
            .await?
            .ok_or_else(|| Error::not_found(Entity::Role, role.trim()))?;

        let granted = sqlx::query(
            r#"
            INSERT INTO hotel.employee_roles (emp_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT employee_roles_once DO NOTHING
            "#,
        )
        .bind(emp_id)
        .bind(role.id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
        if granted > 0 {
            info!(emp_id, role = %role.name, "role granted");
        }

        let roles = roles_of(conn, emp_id).await?;
        Ok(EmployeeRoles { emp_id, roles })
    }

    async fn employee_roles(
        &self,
        conn: &mut PgConnection,
        emp_id: EmployeeId,
    ) -> Result<EmployeeRoles, Error> {
        ensure_employee(&mut *conn, emp_id).await?;
        let roles = roles_of(conn, emp_id).await?;
        Ok(EmployeeRoles { emp_id, roles })
    }
}
