//! HTTP API layer for hushboard.
//!
//! - **Endpoints**: posts, replies, messages, reports and admin review
//! - **Extractors**: authenticated user, client address
//! - **Middleware**: identity-token authentication and user provisioning
//!
//! Every endpoint is a `POST` with a JSON body. Successful responses are
//! wrapped as `{ "data": ... }`; failures as `{ "error": { code, message } }`.

pub mod endpoints;
pub mod extractors;
pub mod identity;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use identity::{Claims, TokenVerifier};
pub use middleware::{AppState, auth_middleware};
