//! Axum integration for the Gatehouse authentication library.
//!
//! Route handlers, auth middleware, and the boundary error translator that
//! maps the application layer's failures onto HTTP statuses. Everything here
//! is transport glue; the rules live in `gatehouse_application`.

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

pub use error::ApiError;
pub use extract::{CurrentUser, MaybeUser};
pub use state::AppState;
