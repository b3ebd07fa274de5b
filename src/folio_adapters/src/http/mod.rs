pub mod cookies;
pub mod routes;

pub use cookies::{create_refresh_cookie, create_refresh_removal_cookie};
