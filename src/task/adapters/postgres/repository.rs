//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{BlockerRow, TaskRecord, TaskRow},
    schema::{blockers, tasks},
};
use crate::directory::domain::{ChatUserId, ExternalUserId};
use crate::task::{
    domain::{
        Assignee, Blocker, BlockerId, PersistedTaskData, Task, TaskId, TaskOrigin, TaskStatus,
        TaskTitle,
    },
    ports::{TaskFilter, TaskMutation, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Runs `f` inside one transaction on a pooled connection.
    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut pooled = pool.get().map_err(TaskRepositoryError::persistence)?;
            let connection: &mut PgConnection = &mut pooled;
            connection.transaction(f)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let record = to_record(task)?;
        let blocker_rows = to_blocker_rows(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            insert_new_blockers(connection, &blocker_rows)?;
            Ok(())
        })
        .await
    }

    async fn modify(&self, id: TaskId, mutation: TaskMutation) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            // The row lock holds off concurrent modifications until commit.
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .for_update()
                .first::<TaskRow>(connection)
                .optional()?;
            let Some(found) = row else {
                return Err(TaskRepositoryError::NotFound(id));
            };
            let mut grouped = load_blockers(connection, &[found.id])?;
            let owned = grouped.remove(&found.id).unwrap_or_default();
            let mut task = row_to_task(found, owned)?;

            mutation(&mut task).map_err(TaskRepositoryError::Rejected)?;

            let record = to_record(&task)?;
            diesel::update(tasks::table.find(id.into_inner()))
                .set(&record)
                .execute(connection)?;
            insert_new_blockers(connection, &to_blocker_rows(&task))?;
            Ok(task)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            let Some(found) = row else {
                return Ok(None);
            };
            let mut grouped = load_blockers(connection, &[found.id])?;
            let owned = grouped.remove(&found.id).unwrap_or_default();
            row_to_task(found, owned).map(Some)
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let constraints = *filter;
        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(status) = constraints.status {
                query = query.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(assignee) = constraints.assignee {
                query = query.filter(tasks::assignee_external_id.eq(assignee.value()));
            }
            if let Some(since) = constraints.created_since {
                query = query.filter(tasks::created_at.ge(since));
            }
            let rows = query
                .order(tasks::created_at.desc())
                .load::<TaskRow>(connection)?;

            let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
            let mut grouped = load_blockers(connection, &ids)?;
            rows.into_iter()
                .map(|row| {
                    let owned = grouped.remove(&row.id).unwrap_or_default();
                    row_to_task(row, owned)
                })
                .collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            // Blockers go with the task through ON DELETE CASCADE.
            let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            Ok(deleted > 0)
        })
        .await
    }
}

/// Inserts blockers that are not yet stored; existing ones are immutable.
fn insert_new_blockers(
    connection: &mut PgConnection,
    rows: &[BlockerRow],
) -> TaskRepositoryResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(blockers::table)
        .values(rows)
        .on_conflict(blockers::id)
        .do_nothing()
        .execute(connection)?;
    Ok(())
}

fn load_blockers(
    connection: &mut PgConnection,
    task_ids: &[uuid::Uuid],
) -> TaskRepositoryResult<HashMap<uuid::Uuid, Vec<BlockerRow>>> {
    if task_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = blockers::table
        .filter(blockers::task_id.eq_any(task_ids))
        .order(blockers::created_at.asc())
        .select(BlockerRow::as_select())
        .load::<BlockerRow>(connection)?;

    let mut grouped: HashMap<uuid::Uuid, Vec<BlockerRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.task_id).or_default().push(row);
    }
    Ok(grouped)
}

fn to_record(task: &Task) -> TaskRepositoryResult<TaskRecord> {
    let origin = serde_json::to_value(task.origin()).map_err(TaskRepositoryError::persistence)?;
    let assignee = task.assignee();

    Ok(TaskRecord {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        assignee_id: assignee
            .and_then(|current| current.user_id)
            .map(ChatUserId::into_inner),
        assignee_external_id: assignee.map(|current| current.external_id.value()),
        assignee_name: assignee.map(|current| current.display_name.clone()),
        due_date: task.due_date(),
        origin,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_blocker_rows(task: &Task) -> Vec<BlockerRow> {
    task.blockers()
        .iter()
        .map(|blocker| BlockerRow {
            id: blocker.id().into_inner(),
            task_id: task.id().into_inner(),
            reason: blocker.reason().to_owned(),
            created_by: blocker.created_by().map(ExternalUserId::value),
            created_at: blocker.created_at(),
        })
        .collect()
}

fn row_to_task(row: TaskRow, blocker_rows: Vec<BlockerRow>) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status,
        assignee_id,
        assignee_external_id,
        assignee_name,
        due_date,
        origin,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?;
    let status = TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let origin =
        serde_json::from_value::<TaskOrigin>(origin).map_err(TaskRepositoryError::persistence)?;
    let assignee = assignee_external_id.map(|external_id| Assignee {
        user_id: assignee_id.map(ChatUserId::from_uuid),
        external_id: ExternalUserId::new(external_id),
        display_name: assignee_name.unwrap_or_default(),
    });
    let blockers = blocker_rows
        .into_iter()
        .map(|blocker| {
            Blocker::from_persisted(
                BlockerId::from_uuid(blocker.id),
                blocker.reason,
                blocker.created_by.map(ExternalUserId::new),
                blocker.created_at,
            )
        })
        .collect();

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        status,
        assignee,
        due_date,
        origin,
        blockers,
        created_at,
        updated_at,
    }))
}
