use serde_json::json;

use crate::auth::JwtKeys;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub fn handle(config: &AppConfig, username: &str, admin: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    config.validate()?;
    let keys = JwtKeys::from_config(&config.security)?;
    let token = keys.sign(username, admin)?;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "username": username, "isAdmin": admin, "token": token })),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
