//! Web server module
//!
//! Provides the JSON API: `/apply` drafts an application email, `/send`
//! delivers one over SMTP and `/health` reports liveness.

mod handlers;
mod routes;
mod state;

pub use handlers::{ApiError, ApplyResponse, SendRequest, SendResponse};
pub use routes::create_router;
pub use state::{AppState, ProviderStatus};
