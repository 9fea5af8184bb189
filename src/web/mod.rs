//! HTTP surface for msgdrop.
//!
//! REST endpoints for account/service management plus the unauthenticated
//! long-poll retrieval link.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
