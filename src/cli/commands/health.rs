use anyhow::Context;
use reqwest::StatusCode;
use serde_json::Value;

use crate::cli::OutputFormat;

pub async fn handle(base_url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let res = reqwest::get(&url)
        .await
        .with_context(|| format!("failed to reach {}", url))?;

    let status = res.status();
    let body = res.json::<Value>().await.context("health response was not JSON")?;

    match output_format {
        OutputFormat::Json => println!("{}", body),
        OutputFormat::Text => {
            let state = body["data"]["status"].as_str().unwrap_or("unknown");
            println!("{} -> {} ({})", url, state, status);
        }
    }

    if status != StatusCode::OK {
        anyhow::bail!("server at {} is degraded", base_url);
    }
    Ok(())
}
