use axum::{
    handler::Handler,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::handlers::{self, auth, companies, jobs, users};
use crate::middleware::{authenticate, require_admin, require_self_or_admin};
use crate::state::AppState;

/// Full application router: every route sees `authenticate` first, then
/// whatever guard its handler is wrapped in.
pub fn app(state: AppState) -> Router {
    let cors = if state.config.security.enable_cors {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        // Public
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health))
        .merge(auth_routes())
        .merge(company_routes())
        .merge(job_routes())
        .merge(user_routes())
        .fallback(handlers::root::not_found)
        // Global middleware
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(auth::token))
        .route("/auth/register", post(auth::register))
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies",
            get(companies::list).post(companies::create.layer(from_fn(require_admin))),
        )
        .route(
            "/companies/:handle",
            get(companies::get)
                .patch(companies::update.layer(from_fn(require_admin)))
                .delete(companies::remove.layer(from_fn(require_admin))),
        )
}

fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(jobs::list).post(jobs::create.layer(from_fn(require_admin))))
        .route(
            "/jobs/:id",
            get(jobs::get)
                .patch(jobs::update.layer(from_fn(require_admin)))
                .delete(jobs::remove.layer(from_fn(require_admin))),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(users::list.layer(from_fn(require_admin))).post(users::create.layer(from_fn(require_admin))),
        )
        .route(
            "/users/:username",
            get(users::get.layer(from_fn(require_self_or_admin)))
                .patch(users::update.layer(from_fn(require_self_or_admin)))
                .delete(users::remove.layer(from_fn(require_self_or_admin))),
        )
        .route(
            "/users/:username/jobs/:id",
            post(users::apply.layer(from_fn(require_self_or_admin))),
        )
}

/// Install the global subscriber; `RUST_LOG` wins over the configured default.
pub fn init_tracing(config: &AppConfig) {
    let default_filter = if config.api.enable_request_logging {
        "jobly_api=debug,tower_http=debug"
    } else {
        "jobly_api=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build state from `config` and serve until the process is stopped.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;

    let pool = DatabaseManager::connect_lazy(&config)?;
    let jwt = JwtKeys::from_config(&config.security)?;
    let port = config.api.port;
    tracing::info!("Starting Jobly API in {:?} mode", config.environment);

    let state = AppState::new(config, pool, jwt);
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Jobly API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
