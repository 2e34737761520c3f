// handlers/admin/activities.rs - Activity post writes (admin gate required)

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use mongodb::bson::{doc, DateTime};
use serde_json::Value;

use crate::api::format::json_to_document;
use crate::error::ApiError;
use crate::middleware::AdminContext;
use crate::store::{parse_object_id, Collection, DeleteAck, InsertAck};
use crate::AppState;

/// Server-assigned creation timestamp field
pub const ADDED_ON_FIELD: &str = "addedOn";

/// POST /add-activity
///
/// Body carries `title`, `shortDescription`, `activityCover` and `post`; it is
/// stored as sent apart from `addedOn`, which always reflects server time.
pub async fn activity_post(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Json(body): Json<Value>,
) -> Result<Json<InsertAck>, ApiError> {
    let mut document = json_to_document(body)?;
    document.insert(ADDED_ON_FIELD, DateTime::now());

    let ack = state.store.insert_one(Collection::Activities, document).await?;
    tracing::info!(id = %ack.inserted_id, admin = %admin.user.uid, "Activity added");
    Ok(Json(ack))
}

/// DELETE /activities/:id
pub async fn activity_delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    let id = parse_object_id(&id)?;
    let ack = state
        .store
        .delete_one(Collection::Activities, doc! { "_id": id })
        .await?;
    tracing::info!(
        activity = %id,
        admin = %admin.user.uid,
        deleted = ack.deleted_count,
        "Activity deleted"
    );
    Ok(Json(ack))
}
