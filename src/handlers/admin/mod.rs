// handlers/admin/mod.rs - Admin handlers
//
// Security Level: bearer token whose uid resolves to a user with role "admin"
// Middleware: require_admin (route layer), which injects AdminContext

pub mod activities;

pub use activities::{activity_delete, activity_post};
