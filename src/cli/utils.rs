use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config::{AppConfig, StoreBackend};
use crate::store::{self, SharedStore};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Connect to the configured store the same way the server does
pub async fn connect_store(config: &AppConfig) -> anyhow::Result<SharedStore> {
    store::connect(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to document store: {}", e))
}

/// [`connect_store`] for commands that write; the in-memory backend is refused
/// since its contents vanish when the process exits
pub async fn connect_persistent_store(config: &AppConfig) -> anyhow::Result<SharedStore> {
    if config.database.backend == StoreBackend::Memory {
        anyhow::bail!(
            "STORE_BACKEND=memory does not persist past this command; point the CLI at the hosted store"
        );
    }
    connect_store(config).await
}
