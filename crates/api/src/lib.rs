//! Vidlate API server library.
//!
//! Client-facing submission and status endpoints that forward to the
//! transcription/translation backend. Exposes config, state, error handling
//! and routes so integration tests and the binary entrypoint share them.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;
