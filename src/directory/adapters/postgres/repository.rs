//! `PostgreSQL` repository implementation for the participant directory.

use super::{
    models::{ChatUserRow, NewChatUserRow},
    schema::chat_users,
};
use crate::directory::{
    domain::{ChatUser, ChatUserId, ExternalUserId, PersistedChatUser, UserProfile},
    ports::{DirectoryError, DirectoryResult, UserDirectory},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::upsert::excluded;

/// `PostgreSQL` connection pool type used by directory adapters.
pub type DirectoryPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed participant directory.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: DirectoryPgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DirectoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> DirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut pooled = pool.get().map_err(DirectoryError::persistence)?;
            let connection: &mut PgConnection = &mut pooled;
            connection.transaction(f)
        })
        .await
        .map_err(DirectoryError::persistence)?
    }
}

impl From<diesel::result::Error> for DirectoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_external_id(
        &self,
        external_id: ExternalUserId,
    ) -> DirectoryResult<Option<ChatUser>> {
        self.run_blocking(move |connection| {
            let row = chat_users::table
                .filter(chat_users::external_id.eq(external_id.value()))
                .select(ChatUserRow::as_select())
                .first::<ChatUserRow>(connection)
                .optional()?;
            Ok(row.map(row_to_user))
        })
        .await
    }

    async fn list_active(&self) -> DirectoryResult<Vec<ChatUser>> {
        self.run_blocking(|connection| {
            let rows = chat_users::table
                .filter(chat_users::is_active.eq(true))
                .order((chat_users::first_name.asc(), chat_users::external_id.asc()))
                .select(ChatUserRow::as_select())
                .load::<ChatUserRow>(connection)?;
            Ok(rows.into_iter().map(row_to_user).collect())
        })
        .await
    }

    async fn upsert(
        &self,
        profile: UserProfile,
        seen_at: DateTime<Utc>,
    ) -> DirectoryResult<ChatUser> {
        let candidate = ChatUser::register(profile, seen_at);
        let new_row = to_new_row(&candidate);
        self.run_blocking(move |connection| {
            // Names follow the latest profile; is_active is only set on insert.
            let row = diesel::insert_into(chat_users::table)
                .values(&new_row)
                .on_conflict(chat_users::external_id)
                .do_update()
                .set((
                    chat_users::first_name.eq(excluded(chat_users::first_name)),
                    chat_users::username.eq(excluded(chat_users::username)),
                    chat_users::last_name.eq(excluded(chat_users::last_name)),
                    chat_users::updated_at.eq(excluded(chat_users::updated_at)),
                ))
                .returning(ChatUserRow::as_returning())
                .get_result::<ChatUserRow>(connection)?;
            Ok(row_to_user(row))
        })
        .await
    }

    async fn deactivate(
        &self,
        external_id: ExternalUserId,
        at: DateTime<Utc>,
    ) -> DirectoryResult<ChatUser> {
        self.run_blocking(move |connection| {
            let row = diesel::update(
                chat_users::table.filter(chat_users::external_id.eq(external_id.value())),
            )
            .set((
                chat_users::is_active.eq(false),
                chat_users::updated_at.eq(at),
            ))
            .returning(ChatUserRow::as_returning())
            .get_result::<ChatUserRow>(connection)
            .optional()?;
            row.map(row_to_user)
                .ok_or(DirectoryError::NotFound(external_id))
        })
        .await
    }
}

fn to_new_row(user: &ChatUser) -> NewChatUserRow {
    NewChatUserRow {
        id: user.id().into_inner(),
        external_id: user.external_id().value(),
        username: user.username().map(str::to_owned),
        first_name: user.first_name().to_owned(),
        last_name: user.last_name().map(str::to_owned),
        is_active: user.is_active(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

fn row_to_user(row: ChatUserRow) -> ChatUser {
    ChatUser::from_persisted(PersistedChatUser {
        id: ChatUserId::from_uuid(row.id),
        external_id: ExternalUserId::new(row.external_id),
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
