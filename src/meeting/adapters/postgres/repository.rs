//! `PostgreSQL` repository implementation for the meeting log.

use super::{models::MeetingRow, schema::meetings};
use crate::directory::domain::ExternalUserId;
use crate::meeting::{
    domain::{Meeting, MeetingId},
    ports::{MeetingRepository, MeetingRepositoryError, MeetingRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by meeting adapters.
pub type MeetingPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed meeting repository.
#[derive(Debug, Clone)]
pub struct PostgresMeetingRepository {
    pool: MeetingPgPool,
}

impl PostgresMeetingRepository {
    /// Creates a repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MeetingPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> MeetingRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> MeetingRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut pooled = pool.get().map_err(MeetingRepositoryError::persistence)?;
            let connection: &mut PgConnection = &mut pooled;
            connection.transaction(f)
        })
        .await
        .map_err(MeetingRepositoryError::persistence)?
    }
}

impl From<DieselError> for MeetingRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl MeetingRepository for PostgresMeetingRepository {
    async fn store(&self, meeting: &Meeting) -> MeetingRepositoryResult<()> {
        let meeting_id = meeting.id();
        let row = MeetingRow {
            id: meeting_id.into_inner(),
            summary: meeting.summary().to_owned(),
            recorded_by: meeting.recorded_by().map(ExternalUserId::value),
            held_at: meeting.held_at(),
            created_at: meeting.created_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(meetings::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        MeetingRepositoryError::DuplicateMeeting(meeting_id)
                    }
                    _ => MeetingRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn recent(&self, limit: usize) -> MeetingRepositoryResult<Vec<Meeting>> {
        let row_limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run_blocking(move |connection| {
            let rows = meetings::table
                .order(meetings::held_at.desc())
                .limit(row_limit)
                .select(MeetingRow::as_select())
                .load::<MeetingRow>(connection)?;
            Ok(rows
                .into_iter()
                .map(|row| {
                    Meeting::from_persisted(
                        MeetingId::from_uuid(row.id),
                        row.summary,
                        row.recorded_by.map(ExternalUserId::new),
                        row.held_at,
                        row.created_at,
                    )
                })
                .collect())
        })
        .await
    }
}
