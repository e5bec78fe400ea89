/// Persistence handle shared by the services
///
/// Services never touch the pool directly; they hold an
/// `Arc<dyn Repository>` and call one method per logical read or write.
/// [`SqliteRepository`] runs every write inside its own transaction, so a
/// constraint violation rolls the whole write back and surfaces as the
/// returned `sqlx::Error`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::repository::{Repository, SqliteRepository};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let repo: Arc<dyn Repository> = Arc::new(SqliteRepository::new(pool));
/// let users = repo.list_users().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::models::board::{Board, BoardStatus, NewBoard};
use crate::models::membership::Membership;
use crate::models::task::{AssignedTask, NewTask, Task, TaskStatus};
use crate::models::team::{NewTeam, Team};
use crate::models::user::{NewUser, User};

/// Storage operations needed by the services
#[async_trait]
pub trait Repository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> Result<User, sqlx::Error>;

    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, sqlx::Error>;

    /// Returns None if the user doesn't exist
    async fn update_user_display_name(
        &self,
        id: i64,
        display_name: &str,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn list_team_users(&self, team_id: i64) -> Result<Vec<User>, sqlx::Error>;

    async fn create_team(&self, team: &NewTeam) -> Result<Team, sqlx::Error>;

    async fn list_teams(&self) -> Result<Vec<Team>, sqlx::Error>;

    async fn find_team(&self, id: i64) -> Result<Option<Team>, sqlx::Error>;

    /// Returns None if the team doesn't exist
    async fn update_team(
        &self,
        id: i64,
        description: &str,
        admin: i64,
    ) -> Result<Option<Team>, sqlx::Error>;

    /// Adds every id that resolves to a user; returns how many rows were written
    async fn add_team_members(&self, team_id: i64, user_ids: &[i64]) -> Result<u64, sqlx::Error>;

    /// Removes every listed member; returns how many rows were deleted
    async fn remove_team_members(&self, team_id: i64, user_ids: &[i64])
        -> Result<u64, sqlx::Error>;

    async fn create_board(&self, board: &NewBoard) -> Result<Board, sqlx::Error>;

    async fn find_board(&self, id: i64) -> Result<Option<Board>, sqlx::Error>;

    async fn list_boards(&self, team_id: i64) -> Result<Vec<Board>, sqlx::Error>;

    /// Returns None if the board doesn't exist
    async fn set_board_status(
        &self,
        id: i64,
        status: BoardStatus,
    ) -> Result<Option<Board>, sqlx::Error>;

    async fn create_task(&self, task: &NewTask) -> Result<Task, sqlx::Error>;

    async fn find_task(&self, id: i64) -> Result<Option<Task>, sqlx::Error>;

    /// Returns None if the task doesn't exist
    async fn set_task_status(&self, id: i64, status: TaskStatus)
        -> Result<Option<Task>, sqlx::Error>;

    async fn list_assigned_tasks(&self, board_id: i64) -> Result<Vec<AssignedTask>, sqlx::Error>;
}

/// [`Repository`] backed by a SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn create_user(&self, user: &NewUser) -> Result<User, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let created = User::create(&mut *tx, &user.user_name, &user.display_name).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        User::list(&mut *conn).await
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        User::find_by_id(&mut *conn, id).await
    }

    async fn update_user_display_name(
        &self,
        id: i64,
        display_name: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let updated = User::update_display_name(&mut *tx, id, display_name).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn list_team_users(&self, team_id: i64) -> Result<Vec<User>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        User::list_by_team(&mut *conn, team_id).await
    }

    async fn create_team(&self, team: &NewTeam) -> Result<Team, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let created = Team::create(&mut *tx, team).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn list_teams(&self) -> Result<Vec<Team>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        Team::list(&mut *conn).await
    }

    async fn find_team(&self, id: i64) -> Result<Option<Team>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        Team::find_by_id(&mut *conn, id).await
    }

    async fn update_team(
        &self,
        id: i64,
        description: &str,
        admin: i64,
    ) -> Result<Option<Team>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let updated = Team::update_details(&mut *tx, id, description, admin).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn add_team_members(&self, team_id: i64, user_ids: &[i64]) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut added = 0;
        for &user_id in user_ids {
            if Membership::add(&mut *tx, team_id, user_id).await? {
                added += 1;
            }
        }
        tx.commit().await?;
        Ok(added)
    }

    async fn remove_team_members(
        &self,
        team_id: i64,
        user_ids: &[i64],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut removed = 0;
        for &user_id in user_ids {
            if Membership::remove(&mut *tx, team_id, user_id).await? {
                removed += 1;
            }
        }
        tx.commit().await?;
        Ok(removed)
    }

    async fn create_board(&self, board: &NewBoard) -> Result<Board, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let created = Board::create(&mut *tx, board).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn find_board(&self, id: i64) -> Result<Option<Board>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        Board::find_by_id(&mut *conn, id).await
    }

    async fn list_boards(&self, team_id: i64) -> Result<Vec<Board>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        Board::list_by_team(&mut *conn, team_id).await
    }

    async fn set_board_status(
        &self,
        id: i64,
        status: BoardStatus,
    ) -> Result<Option<Board>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let updated = Board::update_status(&mut *tx, id, status).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let created = Task::create(&mut *tx, task).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn find_task(&self, id: i64) -> Result<Option<Task>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        Task::find_by_id(&mut *conn, id).await
    }

    async fn set_task_status(
        &self,
        id: i64,
        status: TaskStatus,
    ) -> Result<Option<Task>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let updated = Task::update_status(&mut *tx, id, status).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn list_assigned_tasks(&self, board_id: i64) -> Result<Vec<AssignedTask>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        Task::list_assigned(&mut *conn, board_id).await
    }
}
