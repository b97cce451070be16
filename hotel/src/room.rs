use abi::{
    Entity, Error, NewRoom, Normalizer, ReferenceItem, ReferenceKind, Room, RoomId, RoomQuery,
    RoomUpdate, Validator,
};
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::info;

use crate::{ReferenceRegistry, RoomManager, Rooms};

const ROOM_SELECT: &str = "SELECT r.room_number, t.name AS room_type, s.name AS room_state \
FROM hotel.rooms r \
JOIN hotel.room_types t ON t.id = r.room_type_id \
JOIN hotel.room_states s ON s.id = r.room_state_id";

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomManager {
    pub fn new() -> Self {
        Self {
            types: ReferenceRegistry::new(ReferenceKind::RoomType),
            states: ReferenceRegistry::new(ReferenceKind::RoomState),
        }
    }

    /// Locks the room row until the surrounding transaction ends.
    pub(crate) async fn lock(
        &self,
        conn: &mut PgConnection,
        room_number: i32,
    ) -> Result<RoomId, Error> {
        sqlx::query_scalar("SELECT id FROM hotel.rooms WHERE room_number = $1 FOR UPDATE")
            .bind(room_number)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| Error::not_found(Entity::Room, room_number))
    }
}

#[async_trait]
impl Rooms for RoomManager {
    async fn add_room_type(
        &self,
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<ReferenceItem, Error> {
        self.types.add(conn, name).await
    }

    async fn list_room_types(&self, conn: &mut PgConnection) -> Result<Vec<ReferenceItem>, Error> {
        self.types.list(conn).await
    }

    async fn add_room_state(
        &self,
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<ReferenceItem, Error> {
        self.states.add(conn, name).await
    }

    async fn list_room_states(
        &self,
        conn: &mut PgConnection,
    ) -> Result<Vec<ReferenceItem>, Error> {
        self.states.list(conn).await
    }

    async fn add(&self, conn: &mut PgConnection, room: NewRoom) -> Result<Room, Error> {
        room.validate()?;
        let type_id = self.types.id_of(conn, &room.room_type).await?;
        let state_id = self.states.id_of(conn, room.state()).await?;

        let exists: Option<RoomId> =
            sqlx::query_scalar("SELECT id FROM hotel.rooms WHERE room_number = $1")
                .bind(room.room_number)
                .fetch_optional(&mut *conn)
                .await?;
        if exists.is_some() {
            return Err(Error::AlreadyExists(format!(
                "room {} already exists",
                room.room_number
            )));
        }

        sqlx::query(
            "INSERT INTO hotel.rooms (room_number, room_type_id, room_state_id) VALUES ($1, $2, $3)",
        )
        .bind(room.room_number)
        .bind(type_id)
        .bind(state_id)
        .execute(&mut *conn)
        .await?;

        info!(room_number = room.room_number, "room added");
        Rooms::get(self, conn, room.room_number).await
    }

    async fn get(&self, conn: &mut PgConnection, room_number: i32) -> Result<Room, Error> {
        let sql = format!("{ROOM_SELECT} WHERE r.room_number = $1");
        sqlx::query_as(&sql)
            .bind(room_number)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| Error::not_found(Entity::Room, room_number))
    }

    async fn list(&self, conn: &mut PgConnection, mut query: RoomQuery) -> Result<Vec<Room>, Error> {
        query.normalize()?;
        let sql = format!(
            "{ROOM_SELECT} \
             WHERE ($1::text IS NULL OR lower(t.name) = lower($1)) \
             AND ($2::text IS NULL OR lower(s.name) = lower($2)) \
             ORDER BY r.room_number OFFSET $3 LIMIT $4"
        );
        Ok(sqlx::query_as(&sql)
            .bind(query.room_type)
            .bind(query.room_state)
            .bind(query.skip)
            .bind(query.limit)
            .fetch_all(conn)
            .await?)
    }

    async fn update(
        &self,
        conn: &mut PgConnection,
        room_number: i32,
        update: RoomUpdate,
    ) -> Result<Room, Error> {
        update.validate()?;
        let type_id = match &update.room_type {
            Some(name) => Some(self.types.id_of(conn, name).await?),
            None => None,
        };
        let state_id = match &update.room_state {
            Some(name) => Some(self.states.id_of(conn, name).await?),
            None => None,
        };

        let updated = sqlx::query(
            r#"
            UPDATE hotel.rooms
            SET room_type_id = COALESCE($2, room_type_id),
                room_state_id = COALESCE($3, room_state_id)
            WHERE room_number = $1
            "#,
        )
        .bind(room_number)
        .bind(type_id)
        .bind(state_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
        if updated == 0 {
            return Err(Error::not_found(Entity::Room, room_number));
        }

        info!(room_number, ?update, "room updated");
        Rooms::get(self, conn, room_number).await
    }

    async fn room_id(&self, conn: &mut PgConnection, room_number: i32) -> Result<RoomId, Error> {
        sqlx::query_scalar("SELECT id FROM hotel.rooms WHERE room_number = $1")
            .bind(room_number)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| Error::not_found(Entity::Room, room_number))
    }
}
