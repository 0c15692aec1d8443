use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::info;

use super::job::JobSummary;
use crate::database::{params::bind_all, DatabaseError};
use crate::filter::ClauseResult;
use crate::schemas::NewCompany;

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A company together with the jobs it has posted.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

impl Company {
    /// Insert a new company. Fails with `Duplicate` if the handle is taken.
    pub async fn create(pool: &PgPool, data: &NewCompany) -> Result<Company, DatabaseError> {
        let existing = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.handle)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            return Err(DatabaseError::Duplicate(format!("Duplicate company: {}", data.handle)));
        }

        let sql = format!(
            "INSERT INTO companies ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(&data.handle)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.num_employees)
            .bind(&data.logo_url)
            .fetch_one(pool)
            .await?;

        info!("Created company {}", company.handle);
        Ok(company)
    }

    /// All companies matching `filter`, ordered by name.
    pub async fn find_all(pool: &PgPool, filter: &ClauseResult) -> Result<Vec<Company>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM companies{} ORDER BY name", filter.where_sql());
        let companies = bind_all(sqlx::query_as::<_, Company>(&sql), &filter.values)
            .fetch_all(pool)
            .await?;
        Ok(companies)
    }

    pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No company: {}", handle)))?;

        let jobs = sqlx::query_as::<_, JobSummary>(
            "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
        )
        .bind(handle)
        .fetch_all(pool)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Apply a partial update built from `COMPANY_UPDATE`.
    pub async fn update(pool: &PgPool, handle: &str, set: &ClauseResult) -> Result<Company, DatabaseError> {
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {COLUMNS}",
            set.clause,
            set.next_param()
        );
        bind_all(sqlx::query_as::<_, Company>(&sql), &set.values)
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No company: {}", handle)))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), DatabaseError> {
        let deleted = sqlx::query_scalar::<_, String>("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(pool)
            .await?;

        match deleted {
            Some(_) => {
                info!("Deleted company {}", handle);
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("No company: {}", handle))),
        }
    }
}
