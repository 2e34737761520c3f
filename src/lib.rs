pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod store;

use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenSettings;
use crate::store::SharedStore;

/// Dependencies threaded into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub tokens: TokenSettings,
}

impl AppState {
    pub fn new(store: SharedStore, tokens: TokenSettings) -> Self {
        Self { store, tokens }
    }
}

/// Full HTTP surface with CORS and request tracing applied
pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(admin_routes(state.clone()))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router<AppState> {
    use handlers::public;

    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Products
        .route("/products", get(public::products_get).post(public::products_post))
        .route("/hot-products", get(public::hot_products_get))
        .route("/products/:id", get(public::product_get))
        .route(
            "/allproducts/:categoryName/:subCategoryName",
            get(public::products_by_subcategory_get),
        )
        .route("/categoryProducts/:categoryName", get(public::products_by_category_get))
        // Categories
        .route("/allcategories", get(public::categories_get))
        .route("/allcategories/:categorySlug", get(public::category_get))
        .route("/addCategory", post(public::category_post))
        .route("/addCategory/:id", put(public::subcategory_put))
        .route("/deleteCategory/:categoryId", delete(public::category_delete))
        .route(
            "/deleteCategory/:categoryId/:subcategorySlug",
            delete(public::subcategory_delete),
        )
        // Activities (read)
        .route("/activities", get(public::activities_get))
        .route("/activity/:id", get(public::activity_get))
        // Token issuance
        .route("/jwt/:uid/:email", get(public::token_get))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    use handlers::admin;

    Router::new()
        .route("/add-activity", post(admin::activity_post))
        .route("/activities/:id", delete(admin::activity_delete))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::require_admin,
        ))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    // Credentials stay off: browsers reject them alongside a wildcard origin
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}
