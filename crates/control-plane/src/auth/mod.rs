// Authentication for the HTTP layer
//
// - config: environment-driven auth settings
// - middleware: the AuthUser extractor (request gate)
// - routes: register, login, logout, profile

pub mod config;
pub mod middleware;
pub mod routes;

pub use config::AuthConfig;
pub use middleware::{AuthState, AuthUser, FromRef};
pub use routes::routes;
