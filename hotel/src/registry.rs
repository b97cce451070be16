use abi::{Error, ReferenceId, ReferenceItem, ReferenceKind};
use sqlx::PgConnection;
use tracing::info;

/// Add/list/lookup over one of the name tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceRegistry {
    kind: ReferenceKind,
}

impl ReferenceRegistry {
    pub fn new(kind: ReferenceKind) -> Self {
        Self { kind }
    }

    pub async fn add(&self, conn: &mut PgConnection, name: &str) -> Result<ReferenceItem, Error> {
        let name = self.kind.check_name(name)?;
        if self.find(conn, name).await?.is_some() {
            return Err(Error::AlreadyExists(format!(
                "{} {name} already exists",
                self.kind.entity()
            )));
        }

        let sql = format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name",
            self.kind.table()
        );
        let item: ReferenceItem = sqlx::query_as(&sql).bind(name).fetch_one(conn).await?;
        info!(kind = %self.kind.entity(), id = item.id, name = %item.name, "reference added");
        Ok(item)
    }

    pub async fn list(&self, conn: &mut PgConnection) -> Result<Vec<ReferenceItem>, Error> {
        let sql = format!("SELECT id, name FROM {} ORDER BY id", self.kind.table());
        Ok(sqlx::query_as(&sql).fetch_all(conn).await?)
    }

    pub async fn find(
        &self,
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Option<ReferenceItem>, Error> {
        let sql = format!(
            "SELECT id, name FROM {} WHERE lower(name) = lower($1)",
            self.kind.table()
        );
        Ok(sqlx::query_as(&sql)
            .bind(name.trim())
            .fetch_optional(conn)
            .await?)
    }

    pub async fn id_of(&self, conn: &mut PgConnection, name: &str) -> Result<ReferenceId, Error> {
        self.find(conn, name)
            .await?
            .map(|item| item.id)
            .ok_or_else(|| Error::not_found(self.kind.entity(), name))
    }
}
