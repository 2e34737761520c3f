use mongodb::bson::{self, doc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::store::{Collection, DocumentStore};

pub const ADMIN_ROLE: &str = "admin";

/// User record as stored in the users collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Resolve `uid` to a user record and admit it only when its role is exactly "admin".
///
/// Performs a single store read. Unknown users and any other role are denied
/// with the same Forbidden outcome so callers cannot probe which uids exist.
pub async fn authorize_admin(store: &dyn DocumentStore, uid: &str) -> Result<UserRecord, ApiError> {
    let document = store
        .find_one(Collection::Users, doc! { "uid": uid })
        .await?;

    let Some(document) = document else {
        tracing::warn!(uid, "Authorization denied: no user record");
        return Err(ApiError::access_denied());
    };

    let user: UserRecord = bson::from_document(document).map_err(|e| {
        tracing::warn!(uid, "Authorization denied: malformed user record: {}", e);
        ApiError::access_denied()
    })?;

    if !user.is_admin() {
        tracing::warn!(uid, role = ?user.role, "Authorization denied: role is not admin");
        return Err(ApiError::access_denied());
    }

    tracing::debug!(uid, "Authorization granted");
    Ok(user)
}
