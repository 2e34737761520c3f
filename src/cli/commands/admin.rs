use clap::Subcommand;
use mongodb::bson::{doc, Document};
use serde_json::json;

use crate::api::format::bson_to_json;
use crate::cli::utils::{connect_persistent_store, output_success};
use crate::cli::OutputFormat;
use crate::config;
use crate::services::{authorize_admin, ADMIN_ROLE};
use crate::store::{Collection, DocumentStore, InsertAck};

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Create a user record with the admin role")]
    Grant {
        #[arg(help = "User id carried in access tokens")]
        uid: String,
        #[arg(long, help = "Email stored alongside the user")]
        email: Option<String>,
    },

    #[command(about = "Check whether a uid passes the admin gate")]
    Check {
        #[arg(help = "User id to check")]
        uid: String,
    },
}

pub async fn handle(cmd: AdminCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect_persistent_store(config::config()).await?;

    match cmd {
        AdminCommands::Grant { uid, email } => {
            let ack = grant_admin(store.as_ref(), &uid, email.as_deref()).await?;
            output_success(
                output_format,
                &format!("Granted admin role to '{}'", uid),
                Some(json!({ "uid": uid, "insertedId": bson_to_json(&ack.inserted_id) })),
            )
        }
        AdminCommands::Check { uid } => match authorize_admin(store.as_ref(), &uid).await {
            Ok(user) => output_success(
                output_format,
                &format!("'{}' is an admin", uid),
                Some(json!({ "uid": user.uid, "role": user.role })),
            ),
            Err(e) => Err(anyhow::anyhow!("'{}' is not an admin: {}", uid, e)),
        },
    }
}

/// Admin accounts are provisioned out-of-band; this is the bootstrap path.
pub async fn grant_admin(
    store: &dyn DocumentStore,
    uid: &str,
    email: Option<&str>,
) -> anyhow::Result<InsertAck> {
    if let Some(existing) = store.find_one(Collection::Users, doc! { "uid": uid }).await? {
        anyhow::bail!(
            "a user record for '{}' already exists (role: {})",
            uid,
            existing.get_str("role").unwrap_or("<none>")
        );
    }

    let mut user = Document::new();
    user.insert("uid", uid);
    if let Some(email) = email {
        user.insert("email", email);
    }
    user.insert("role", ADMIN_ROLE);

    Ok(store.insert_one(Collection::Users, user).await?)
}
