pub mod authorization;

pub use authorization::{authorize_admin, UserRecord, ADMIN_ROLE};
