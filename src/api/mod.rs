//! HTTP endpoint for asking questions against the ingested documents

pub mod handlers;
pub mod routes;
pub mod server;
pub mod session;
pub mod types;

pub use handlers::AppState;
pub use server::build_app;
pub use server::serve_api;
pub use session::SessionManager;
