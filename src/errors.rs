//! Process-level error types.
//!
//! A [`FixError`] that reaches the binary is fatal for the run: it is printed
//! and the process exits. [`FixError::Api`] carries remote failures of the
//! steps that cannot be skipped (profile lookup, playlist listing); while
//! rebuilding, API errors stay [`ApiError`]s and are downgraded to
//! per-playlist or per-track warnings.

use std::{io, time::Duration};

use thiserror::Error;

use crate::spotify::ApiError;

#[derive(Debug, Error)]
pub enum FixError {
    /// The operating system could not supply random bytes for the state token.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// The `state` parameter of the OAuth redirect did not match the one we issued.
    #[error("authorization state mismatch, the login attempt cannot be trusted")]
    AuthorizationStateMismatch,

    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("cannot bind callback listener on {addr}: {source}")]
    ListenerBind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The callback listener went away without delivering a login.
    #[error("callback listener stopped before a login was delivered")]
    CallbackDropped,

    #[error("login was not completed within {} seconds", .0.as_secs())]
    LoginTimedOut(Duration),

    #[error("cannot read console input: {0}")]
    ConsoleInput(#[source] io::Error),

    #[error("invalid selection '{0}', expected a number")]
    InvalidSelectionToken(String),

    #[error("selection {index} is out of range, pick a number between 1 and {total}")]
    SelectionOutOfRange { index: i64, total: usize },

    #[error("no playlists selected")]
    EmptySelection,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
