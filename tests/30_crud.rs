mod common;

use anyhow::{Context, Result};
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;
use tokio::sync::Mutex;

use jobly_api::auth::password::hash_password;
use jobly_api::config::{AppConfig, Environment};
use jobly_api::database::DatabaseManager;
use jobly_api::{app, AppState};

const SCHEMA: &str = include_str!("../sql/schema.sql");

/// Every test here rebuilds the same tables.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

struct Seeded {
    state: AppState,
    /// Job ids in title order: J1, J2, J3
    jobs: Vec<i32>,
}

/// State against `DATABASE_URL` (database name swapped to `jobly_test`), or
/// `None` when no database is configured or reachable.
async fn live_state() -> Option<AppState> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set; skipping database tests");
            return None;
        }
    };

    let mut config = AppConfig::for_environment(Environment::Test);
    config.database.url = url;
    let state = common::state_for(config);

    if let Err(e) = DatabaseManager::health_check(&state.pool).await {
        eprintln!("jobly_test unreachable ({}); skipping database tests", e);
        return None;
    }
    Some(state)
}

async fn reset_schema(pool: &PgPool) -> Result<()> {
    sqlx::query("DROP TABLE IF EXISTS applications, users, jobs, companies CASCADE")
        .execute(pool)
        .await?;
    for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("schema statement failed: {}", statement))?;
    }
    Ok(())
}

async fn seed(pool: &PgPool) -> Result<Vec<i32>> {
    for (handle, name, employees) in [("c1", "C1", 1), ("c2", "C2", 2), ("c3", "C3", 3)] {
        sqlx::query("INSERT INTO companies (handle, name, num_employees, description, logo_url) VALUES ($1, $2, $3, $4, $5)")
            .bind(handle)
            .bind(name)
            .bind(employees)
            .bind(format!("Desc{}", employees))
            .bind(format!("http://{}.img", handle))
            .execute(pool)
            .await?;
    }

    let mut jobs = Vec::new();
    for (title, salary, equity) in [("J1", 100, "0.1"), ("J2", 200, "0.2"), ("J3", 300, "0")] {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3::numeric, 'c1') RETURNING id",
        )
        .bind(title)
        .bind(salary)
        .bind(equity)
        .fetch_one(pool)
        .await?;
        jobs.push(id);
    }

    for (username, is_admin) in [("u1", false), ("admin", true)] {
        sqlx::query(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, 'F', 'L', $3, $4)",
        )
        .bind(username)
        .bind(hash_password("password1", 4)?)
        .bind(format!("{}@example.com", username))
        .bind(is_admin)
        .execute(pool)
        .await?;
    }

    Ok(jobs)
}

async fn seeded() -> Result<Option<Seeded>> {
    let Some(state) = live_state().await else {
        return Ok(None);
    };
    reset_schema(&state.pool).await?;
    let jobs = seed(&state.pool).await?;
    Ok(Some(Seeded { state, jobs }))
}

impl Seeded {
    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        common::send(app(self.state.clone()), method, uri, token, body).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<(StatusCode, Value)> {
        self.send(
            Method::POST,
            "/auth/token",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }
}

fn handles(body: &Value) -> Vec<&str> {
    body["data"]["companies"]
        .as_array()
        .map(|companies| companies.iter().filter_map(|c| c["handle"].as_str()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn company_filters_run_against_postgres() -> Result<()> {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = seeded().await? else { return Ok(()) };

    let (status, body) = db.send(Method::GET, "/companies?name=C&minEmployees=2&maxEmployees=3", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(handles(&body), vec!["c2", "c3"]);

    let (_, body) = db.send(Method::GET, "/companies", None, None).await?;
    assert_eq!(handles(&body), vec!["c1", "c2", "c3"]);

    let (_, body) = db.send(Method::GET, "/companies?name=2", None, None).await?;
    assert_eq!(handles(&body), vec!["c2"]);

    // Wildcards are literal
    let (_, body) = db.send(Method::GET, "/companies?name=%25", None, None).await?;
    assert!(handles(&body).is_empty());
    Ok(())
}

#[tokio::test]
async fn job_filters_run_against_postgres() -> Result<()> {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = seeded().await? else { return Ok(()) };

    let (status, body) = db.send(Method::GET, "/jobs?minSalary=150&hasEquity=true", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    let jobs = body["data"]["jobs"].as_array().context("jobs array")?;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["title"], "J2");
    assert_eq!(jobs[0]["companyName"], "C1");

    let (_, body) = db.send(Method::GET, "/jobs?hasEquity=false", None, None).await?;
    assert_eq!(body["data"]["jobs"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn company_patch_persists() -> Result<()> {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = seeded().await? else { return Ok(()) };
    let admin = common::token_for("admin", true);

    let (status, body) = db
        .send(
            Method::PATCH,
            "/companies/c1",
            Some(&admin),
            Some(json!({ "name": "C1-new", "numEmployees": 10 })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["company"],
        json!({
            "handle": "c1",
            "name": "C1-new",
            "description": "Desc1",
            "numEmployees": 10,
            "logoUrl": "http://c1.img"
        })
    );

    let (status, body) = db.send(Method::GET, "/companies/c1", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["company"]["name"], "C1-new");
    assert_eq!(body["data"]["company"]["jobs"].as_array().map(Vec::len), Some(3));

    let (status, _) = db
        .send(Method::PATCH, "/companies/nope", Some(&admin), Some(json!({ "name": "X" })))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn job_patch_casts_equity() -> Result<()> {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = seeded().await? else { return Ok(()) };
    let admin = common::token_for("admin", true);
    let uri = format!("/jobs/{}", db.jobs[0]);

    let (status, body) = db
        .send(Method::PATCH, &uri, Some(&admin), Some(json!({ "salary": 500, "equity": "0.5" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["job"]["salary"], 500);
    assert_eq!(body["data"]["job"]["equity"], "0.5");

    let (_, body) = db.send(Method::GET, &uri, None, None).await?;
    assert_eq!(body["data"]["job"]["company"]["handle"], "c1");
    Ok(())
}

#[tokio::test]
async fn issued_token_passes_self_or_admin() -> Result<()> {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = seeded().await? else { return Ok(()) };

    let (status, body) = db.login("u1", "password1").await?;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().context("token")?.to_string();

    let identity = db.state.jwt.verify(&token)?;
    assert_eq!(identity.username, "u1");
    assert!(!identity.is_admin);

    let (status, body) = db.send(Method::GET, "/users/u1", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "u1");
    assert_eq!(body["data"]["user"]["jobs"], json!([]));

    let (status, _) = db.send(Method::GET, "/users/admin", Some(&token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = db.login("u1", "wrong-password").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = db.login("ghost", "password1").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn user_applies_and_changes_password() -> Result<()> {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = seeded().await? else { return Ok(()) };
    let token = common::token_for("u1", false);
    let job = db.jobs[1];

    for _ in 0..2 {
        let (status, body) = db.send(Method::POST, &format!("/users/u1/jobs/{}", job), Some(&token), None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["applied"], job);
    }

    let (_, body) = db.send(Method::GET, "/users/u1", Some(&token), None).await?;
    assert_eq!(body["data"]["user"]["jobs"], json!([job]));

    let (status, body) = db
        .send(Method::PATCH, "/users/u1", Some(&token), Some(json!({ "password": "newpass1" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["user"].get("password").is_none());

    let (status, _) = db.login("u1", "newpass1").await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = db.login("u1", "password1").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn admin_deletes_company() -> Result<()> {
    let _guard = DB_LOCK.lock().await;
    let Some(db) = seeded().await? else { return Ok(()) };
    let admin = common::token_for("admin", true);

    let (status, body) = db.send(Method::DELETE, "/companies/c3", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], "c3");

    let (status, _) = db.send(Method::GET, "/companies/c3", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
