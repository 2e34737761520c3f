#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use npi_catalog_api::auth::{generate_jwt, Claims, TokenSettings};
use npi_catalog_api::store::{Collection, DocumentStore, MemoryStore};
use npi_catalog_api::{app, AppState};
use reqwest::StatusCode;
use serde_json::Value;

pub const SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: MemoryStore,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Insert a user record straight into the store
    pub async fn seed_user(&self, uid: &str, role: &str) -> Result<()> {
        let user = npi_catalog_api::api::format::json_to_document(serde_json::json!({
            "uid": uid,
            "email": format!("{}@example.com", uid),
            "role": role,
        }))?;
        self.store.insert_one(Collection::Users, user).await?;
        Ok(())
    }

    pub async fn get_json(&self, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).send().await?;
        let status = res.status();
        Ok((status, res.json::<Value>().await?))
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Start the full router over a fresh in-memory store on an unused port
pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let store = MemoryStore::new();
    let state = AppState::new(Arc::new(store.clone()), TokenSettings::new(SECRET, 30));
    let router = app(state, &["*".to_string()]);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let server = TestServer {
        port,
        base_url,
        store,
        client: reqwest::Client::new(),
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

pub fn token_for(uid: &str, secret: &str) -> String {
    generate_jwt(&Claims::new(uid, format!("{}@example.com", uid), 30), secret)
        .expect("token generation")
}

/// Sign an arbitrary claims payload, for tokens this server would never issue
pub fn sign_payload(payload: &Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        payload,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token signing")
}
