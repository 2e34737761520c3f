use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a token for a uid and email (same as GET /jwt/:uid/:email)")]
    Mint {
        #[arg(help = "User id")]
        uid: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Override the configured expiry in days")]
        days: Option<i64>,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Mint { uid, email, days } => {
            let security = &config::config().security;
            let claims = Claims::new(uid, email, days.unwrap_or(security.jwt_expiry_days));
            let token = generate_jwt(&claims, &security.jwt_secret)?;

            match output_format {
                OutputFormat::Json => output_success(
                    output_format,
                    &format!("Token issued for '{}'", claims.uid),
                    Some(json!({ "token": token, "exp": claims.exp })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
