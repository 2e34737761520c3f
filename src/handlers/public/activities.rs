// handlers/public/activities.rs - Read-only activity post endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::{doc, Document};
use serde_json::Value;

use crate::api::format::{document_to_json, documents_to_json};
use crate::error::ApiError;
use crate::store::{parse_object_id, Collection, FindOptions};
use crate::AppState;

/// GET /activities - listing never carries the post body
pub async fn activities_get(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let options = FindOptions::default().projection(doc! { "post": 0 });
    let activities = state
        .store
        .find(Collection::Activities, Document::new(), options)
        .await?;
    Ok(Json(documents_to_json(&activities)))
}

/// GET /activity/:id - full post, `null` when absent
pub async fn activity_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_object_id(&id)?;
    let activity = state
        .store
        .find_one(Collection::Activities, doc! { "_id": id })
        .await?;
    Ok(Json(activity.as_ref().map_or(Value::Null, document_to_json)))
}
