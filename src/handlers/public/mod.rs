// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Catalog reads and writes, activity reads, token issuance and health.

pub mod activities;
pub mod categories;
pub mod health;
pub mod products;
pub mod token;

pub use activities::{activities_get, activity_get};
pub use categories::{
    categories_get, category_delete, category_get, category_post, subcategory_delete,
    subcategory_put,
};
pub use health::{health, root};
pub use products::{
    hot_products_get, product_get, products_by_category_get, products_by_subcategory_get,
    products_get, products_post,
};
pub use token::token_get;
