pub mod admin;
pub mod auth;
pub mod catalog;
pub mod course;
pub mod health;

pub use auth::auth_routes;
pub use catalog::catalog_public_routes;
pub use course::course_routes;
pub use health::{AppStartTime, HealthService, health_routes};
