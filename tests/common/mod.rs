#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use jobly_api::auth::JwtKeys;
use jobly_api::config::{AppConfig, Environment};
use jobly_api::database::DatabaseManager;
use jobly_api::{app, AppState};

/// Nothing listens here, so any query fails fast instead of touching a real database.
pub const UNREACHABLE_DATABASE_URL: &str = "postgres://127.0.0.1:1/jobly_test";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::for_environment(Environment::Test);
    config.database.url = UNREACHABLE_DATABASE_URL.to_string();
    config.database.connection_timeout = 1;
    config
}

/// State over a lazy pool. Must be called inside a tokio runtime.
pub fn test_state() -> AppState {
    state_for(test_config())
}

pub fn state_for(config: AppConfig) -> AppState {
    let pool = DatabaseManager::connect_lazy(&config).expect("lazy pool");
    let jwt = JwtKeys::from_config(&config.security).expect("jwt keys");
    AppState::new(config, pool, jwt)
}

/// In-process router over a lazy pool.
pub fn test_app() -> Router {
    app(test_state())
}

pub fn token_for(username: &str, is_admin: bool) -> String {
    let config = test_config();
    JwtKeys::from_config(&config.security)
        .expect("jwt keys")
        .sign(username, is_admin)
        .expect("sign")
}

/// Send one request through the router and decode the JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).context("response body was not JSON")?
    };
    Ok((status, value))
}

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_jobly-api"));
        cmd.env("APP_ENV", "test")
            .env("JOBLY_API_PORT", port.to_string())
            .env("DATABASE_URL", UNREACHABLE_DATABASE_URL)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK || resp.status() == reqwest::StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
