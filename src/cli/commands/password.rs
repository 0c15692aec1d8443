use serde_json::json;

use crate::auth::password::hash_password_blocking;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub async fn handle(config: &AppConfig, password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let work_factor = config.security.bcrypt_work_factor;
    let hash = hash_password_blocking(password.to_string(), work_factor).await?;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "hash": hash, "workFactor": work_factor })),
        OutputFormat::Text => println!("{}", hash),
    }
    Ok(())
}
