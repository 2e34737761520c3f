// handlers/public/categories.rs - Category tree management
//
// Categories embed their subcategories as an ordered array. Adding a
// subcategory appends to it; removing one pulls every element whose
// `subcategorySlug` matches. Neither touches products that reference them.

use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::{doc, Bson, Document};
use serde_json::Value;

use crate::api::format::{document_to_json, documents_to_json, json_to_document};
use crate::error::ApiError;
use crate::store::{parse_object_id, ArrayUpdate, Collection, DeleteAck, FindOptions, InsertAck, UpdateAck};
use crate::AppState;

const SUBCATEGORIES_FIELD: &str = "subCategories";

/// GET /allcategories
pub async fn categories_get(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let categories = state
        .store
        .find(Collection::Categories, Document::new(), FindOptions::default())
        .await?;
    Ok(Json(documents_to_json(&categories)))
}

/// GET /allcategories/:categorySlug - `null` when no category has the slug
pub async fn category_get(
    State(state): State<AppState>,
    Path(category_slug): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let category = state
        .store
        .find_one(Collection::Categories, doc! { "categorySlug": category_slug })
        .await?;
    Ok(Json(category.as_ref().map_or(Value::Null, document_to_json)))
}

/// POST /addCategory
pub async fn category_post(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<InsertAck>, ApiError> {
    let document = json_to_document(body)?;
    let ack = state.store.insert_one(Collection::Categories, document).await?;
    tracing::info!(id = %ack.inserted_id, "Category inserted");
    Ok(Json(ack))
}

/// PUT /addCategory/:id - append one subcategory
pub async fn subcategory_put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<UpdateAck>, ApiError> {
    let id = parse_object_id(&id)?;
    let subcategory = json_to_document(body)?;

    let ack = state
        .store
        .update_one(
            Collection::Categories,
            doc! { "_id": id },
            ArrayUpdate::push(SUBCATEGORIES_FIELD, Bson::Document(subcategory)),
        )
        .await
        .map_err(|e| {
            tracing::error!(category = %id, "Failed to add subcategory: {}", e);
            ApiError::internal_server_error("Internal Server Error")
        })?;
    Ok(Json(ack))
}

/// DELETE /deleteCategory/:categoryId
pub async fn category_delete(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    let id = parse_object_id(&category_id)?;
    let ack = state
        .store
        .delete_one(Collection::Categories, doc! { "_id": id })
        .await?;
    tracing::info!(category = %id, deleted = ack.deleted_count, "Category deleted");
    Ok(Json(ack))
}

/// DELETE /deleteCategory/:categoryId/:subcategorySlug
///
/// A slug that matches nothing still succeeds; `modifiedCount` reports 0.
pub async fn subcategory_delete(
    State(state): State<AppState>,
    Path((category_id, subcategory_slug)): Path<(String, String)>,
) -> Result<Json<UpdateAck>, ApiError> {
    let id = parse_object_id(&category_id)?;

    let ack = state
        .store
        .update_one(
            Collection::Categories,
            doc! { "_id": id },
            ArrayUpdate::pull(
                SUBCATEGORIES_FIELD,
                doc! { "subcategorySlug": subcategory_slug },
            ),
        )
        .await
        .map_err(|e| {
            tracing::error!(category = %id, "Failed to remove subcategory: {}", e);
            ApiError::internal_server_error("Internal Server Error")
        })?;
    Ok(Json(ack))
}
