use clap::Parser;
use npi_catalog_api::cli::{utils::output_error, Cli, OutputFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = npi_catalog_api::cli::run(cli).await {
        match (output_format, std::env::var("CLI_VERBOSE").as_deref()) {
            (OutputFormat::Text, Ok("true") | Ok("1")) => eprintln!("Error: {e:?}"),
            _ => output_error(output_format, &e.to_string(), None)?,
        }
        std::process::exit(1);
    }

    Ok(())
}
