//! # API Module
//!
//! HTTP endpoints of the short-lived local server that completes the Spotify
//! login.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the OAuth redirect, checks the `state` token,
//!   exchanges the authorization code and hands the result to the waiting
//!   orchestrator. Responds `200` on success, `404` on a state mismatch and
//!   `403` when no token could be obtained. Only the first request counts;
//!   later ones get `410`.
//! - [`health`] - Status and version, handy to check the listener is up.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use axum::{Extension, Router, routing::get};
//! use spofix::api::{CallbackState, callback, health};
//!
//! let (tx, rx) = tokio::sync::oneshot::channel();
//! let state = Arc::new(CallbackState::new(expected_state, config, tx));
//! let app = Router::new()
//!     .route("/callback", get(callback).layer(Extension(state)))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::CallbackParams;
pub use callback::CallbackState;
pub use callback::callback;
pub use health::health;
