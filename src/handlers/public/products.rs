// handlers/public/products.rs - Product listing, lookup and insertion

use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::{doc, Document};
use serde_json::Value;

use crate::api::format::{documents_to_json, json_to_document};
use crate::error::ApiError;
use crate::store::{parse_object_id, Collection, FindOptions, InsertAck};
use crate::AppState;

/// Number of products surfaced on the landing page
pub const HOT_PRODUCT_LIMIT: i64 = 6;

/// GET /products
pub async fn products_get(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let products = state
        .store
        .find(Collection::Products, Document::new(), FindOptions::default())
        .await?;
    Ok(Json(documents_to_json(&products)))
}

/// GET /hot-products - first six products, card fields only
pub async fn hot_products_get(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let options = FindOptions::default()
        .projection(doc! { "_id": 0, "title": 1, "image": 1, "subCategoryName": 1 })
        .limit(HOT_PRODUCT_LIMIT);

    let products = state
        .store
        .find(Collection::Products, Document::new(), options)
        .await?;
    Ok(Json(documents_to_json(&products)))
}

/// GET /allproducts/:categoryName/:subCategoryName
pub async fn products_by_subcategory_get(
    State(state): State<AppState>,
    Path((category_name, sub_category_name)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let filter = doc! {
        "categoryName": category_name,
        "subCategoryName": sub_category_name,
    };
    let products = state
        .store
        .find(Collection::Products, filter, FindOptions::default())
        .await?;
    Ok(Json(documents_to_json(&products)))
}

/// GET /categoryProducts/:categoryName
pub async fn products_by_category_get(
    State(state): State<AppState>,
    Path(category_name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let products = state
        .store
        .find(
            Collection::Products,
            doc! { "categoryName": category_name },
            FindOptions::default(),
        )
        .await?;
    Ok(Json(documents_to_json(&products)))
}

/// GET /products/:id - returns an array holding zero or one product
pub async fn product_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_object_id(&id)?;
    let products = state
        .store
        .find(Collection::Products, doc! { "_id": id }, FindOptions::default())
        .await?;
    Ok(Json(documents_to_json(&products)))
}

/// POST /products - stores the body as-is
pub async fn products_post(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<InsertAck>, ApiError> {
    let document = json_to_document(body)?;
    let ack = state.store.insert_one(Collection::Products, document).await?;
    tracing::info!(id = %ack.inserted_id, "Product inserted");
    Ok(Json(ack))
}
