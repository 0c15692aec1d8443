pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "jobly")]
#[command(about = "Jobly CLI - operator tooling for the Jobly API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Issue a credential signed with the configured secret")]
    Token {
        #[arg(help = "Username to embed in the token")]
        username: String,
        #[arg(long, help = "Mark the token as an admin credential")]
        admin: bool,
    },

    #[command(about = "Hash a password at the configured bcrypt work factor")]
    HashPassword {
        #[arg(help = "Plaintext password")]
        password: String,
    },

    #[command(about = "Check health of a running server")]
    Health {
        #[arg(long, default_value = "http://localhost:3001", help = "Server base URL")]
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token { username, admin } => commands::token::handle(&config, &username, admin, output_format),
        Commands::HashPassword { password } => commands::password::handle(&config, &password, output_format).await,
        Commands::Health { url } => commands::health::handle(&url, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_command() {
        let cli = Cli::try_parse_from(["jobly", "--json", "token", "u1", "--admin"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        match cli.command {
            Commands::Token { username, admin } => {
                assert_eq!(username, "u1");
                assert!(admin);
            }
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn health_defaults_to_local_server() {
        let cli = Cli::try_parse_from(["jobly", "health"]).unwrap();
        match cli.command {
            Commands::Health { url } => assert_eq!(url, "http://localhost:3001"),
            _ => panic!("expected health command"),
        }
    }
}
