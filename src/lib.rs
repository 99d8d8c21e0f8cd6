//! Request authentication middleware for axum services.
//!
//! - `services::auth`: public key loading, token verification, claim assertions, security context
//! - `services::csrf`: double-submit CSRF protection
//! - `middleware`: axum layers wiring the services into a router
//! - `app`: startup composition for the bundled server

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
