use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::database::{params::bind_all, DatabaseError};
use crate::filter::ClauseResult;
use crate::schemas::NewUser;

const COLUMNS: &str = "username, first_name, last_name, email, is_admin";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(FromRow)]
struct UserWithPassword {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

/// A user plus the ids of jobs they have applied to.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub jobs: Vec<i32>,
}

impl User {
    /// The user and stored password hash for `username`, if it exists.
    pub async fn find_credentials(pool: &PgPool, username: &str) -> Result<Option<(User, String)>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS}, password FROM users WHERE username = $1");
        let row = sqlx::query_as::<_, UserWithPassword>(&sql)
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|row| (row.user, row.password)))
    }

    /// Insert a user whose password has already been hashed.
    pub async fn register(pool: &PgPool, data: &NewUser, password_hash: &str) -> Result<User, DatabaseError> {
        let existing = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
            .bind(&data.username)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            return Err(DatabaseError::Duplicate(format!("Duplicate username: {}", data.username)));
        }

        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&data.username)
            .bind(password_hash)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(data.is_admin)
            .fetch_one(pool)
            .await?;

        info!("Registered user {} (admin: {})", user.username, user.is_admin);
        Ok(user)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM users ORDER BY username");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?)
    }

    pub async fn get(pool: &PgPool, username: &str) -> Result<UserDetail, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No user: {}", username)))?;

        let jobs = sqlx::query_scalar::<_, i32>("SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id")
            .bind(username)
            .fetch_all(pool)
            .await?;

        Ok(UserDetail { user, jobs })
    }

    /// Apply a partial update built from `USER_UPDATE`.
    pub async fn update(pool: &PgPool, username: &str, set: &ClauseResult) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {COLUMNS}",
            set.clause,
            set.next_param()
        );
        bind_all(sqlx::query_as::<_, User>(&sql), &set.values)
            .bind(username)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No user: {}", username)))
    }

    pub async fn remove(pool: &PgPool, username: &str) -> Result<(), DatabaseError> {
        let deleted = sqlx::query_scalar::<_, String>("DELETE FROM users WHERE username = $1 RETURNING username")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        match deleted {
            Some(_) => {
                info!("Deleted user {}", username);
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("No user: {}", username))),
        }
    }

    /// Record an application; applying twice is a no-op.
    pub async fn apply_to_job(pool: &PgPool, username: &str, job_id: i32) -> Result<(), DatabaseError> {
        let job = sqlx::query_scalar::<_, i32>("SELECT id FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(pool)
            .await?;
        if job.is_none() {
            return Err(DatabaseError::NotFound(format!("No job: {}", job_id)));
        }

        let user = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        if user.is_none() {
            return Err(DatabaseError::NotFound(format!("No user: {}", username)));
        }

        sqlx::query("INSERT INTO applications (job_id, username) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(job_id)
            .bind(username)
            .execute(pool)
            .await?;

        info!("User {} applied to job {}", username, job_id);
        Ok(())
    }
}
