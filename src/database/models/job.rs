use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::info;

use super::company::Company;
use crate::database::{params::bind_all, DatabaseError};
use crate::filter::ClauseResult;
use crate::schemas::NewJob;

const COLUMNS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Job as embedded in a company's detail.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

/// Job row in search results, with the owning company's name.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: Company,
}

impl Job {
    /// Insert a job for an existing company.
    pub async fn create(pool: &PgPool, data: &NewJob) -> Result<Job, DatabaseError> {
        let company = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.company_handle)
            .fetch_optional(pool)
            .await?;
        if company.is_none() {
            return Err(DatabaseError::InvalidReference(format!("No company: {}", data.company_handle)));
        }

        let sql = format!("INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}");
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(&data.title)
            .bind(data.salary)
            .bind(data.equity_decimal())
            .bind(&data.company_handle)
            .fetch_one(pool)
            .await?;

        info!("Created job {} for {}", job.id, job.company_handle);
        Ok(job)
    }

    /// All jobs matching `filter`, ordered by title.
    pub async fn find_all(pool: &PgPool, filter: &ClauseResult) -> Result<Vec<JobListing>, DatabaseError> {
        let sql = format!(
            "SELECT j.id, j.title, j.salary, j.equity, j.company_handle, c.name AS company_name \
             FROM jobs j LEFT JOIN companies c ON c.handle = j.company_handle{} \
             ORDER BY j.title",
            filter.where_sql()
        );
        let jobs = bind_all(sqlx::query_as::<_, JobListing>(&sql), &filter.values)
            .fetch_all(pool)
            .await?;
        Ok(jobs)
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<JobDetail, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No job: {}", id)))?;

        let company = sqlx::query_as::<_, Company>(
            "SELECT handle, name, description, num_employees, logo_url FROM companies WHERE handle = $1",
        )
        .bind(&job.company_handle)
        .fetch_one(pool)
        .await?;

        Ok(JobDetail {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        })
    }

    /// Apply a partial update built from `JOB_UPDATE`.
    pub async fn update(pool: &PgPool, id: i32, set: &ClauseResult) -> Result<Job, DatabaseError> {
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {COLUMNS}",
            set.clause,
            set.next_param()
        );
        bind_all(sqlx::query_as::<_, Job>(&sql), &set.values)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No job: {}", id)))
    }

    pub async fn remove(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let deleted = sqlx::query_scalar::<_, i32>("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match deleted {
            Some(_) => {
                info!("Deleted job {}", id);
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("No job: {}", id))),
        }
    }
}
