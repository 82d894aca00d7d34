// service/src/web/mod.rs

// Declare child modules
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use extractors::AuthenticatedUser;
pub use middleware::catch_panics;
pub use routes::configure_app_routes;
