//! Remote REST boundary for the Olympiad Prep client.
//!
//! Every network interaction funnels through the gateway traits here; the
//! HTTP implementation normalizes the server's loosely-shaped JSON into the
//! strict `prep-core` model at this boundary, so nothing above it ever sees
//! a raw response body.

#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod dto;
pub mod envelope;
pub mod error;
pub mod fake;
pub mod gateway;
pub mod session;

pub use client::HttpApi;
pub use config::ApiConfig;
pub use error::{ApiError, DtoError, EnvelopeError, SessionStoreError};
pub use fake::InMemoryApi;
pub use gateway::{AttemptGateway, AuthGateway, CatalogGateway};
pub use session::{InMemorySessionStore, JsonFileSessionStore, ResumePoint, Session, SessionStore};
