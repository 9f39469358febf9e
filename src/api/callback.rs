use std::sync::Arc;

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use serde::Deserialize;
use tokio::sync::{Mutex, oneshot};

use crate::{
    config::Config,
    errors::FixError,
    spotify::auth::{self, LoginResult},
    warning,
};

/// Query parameters of the OAuth redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Shared state of the callback route.
///
/// The sender is taken by the first request, so the login result is handed
/// over at most once and the state token cannot be replayed.
pub struct CallbackState {
    expected_state: String,
    config: Config,
    sender: Mutex<Option<oneshot::Sender<LoginResult>>>,
}

impl CallbackState {
    pub fn new(
        expected_state: String,
        config: Config,
        sender: oneshot::Sender<LoginResult>,
    ) -> Self {
        Self {
            expected_state,
            config,
            sender: Mutex::new(Some(sender)),
        }
    }
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(shared_state): Extension<Arc<CallbackState>>,
) -> (StatusCode, Html<&'static str>) {
    let Some(sender) = shared_state.sender.lock().await.take() else {
        return (
            StatusCode::GONE,
            Html("<h4>Login already handled. You can close this window.</h4>"),
        );
    };

    if params.state.as_deref() != Some(shared_state.expected_state.as_str()) {
        warning!("State mismatch on login callback");
        let _ = sender.send(Err(FixError::AuthorizationStateMismatch));
        return (StatusCode::NOT_FOUND, Html("<h4>State mismatch.</h4>"));
    }

    let code = match (params.code, params.error) {
        (Some(code), None) => code,
        (_, Some(error)) => {
            let _ = sender.send(Err(FixError::TokenExchangeFailed(format!(
                "authorization denied: {}",
                error
            ))));
            return (StatusCode::FORBIDDEN, Html("<h4>Couldn't get token.</h4>"));
        }
        (None, None) => {
            let _ = sender.send(Err(FixError::TokenExchangeFailed(
                "missing authorization code".to_string(),
            )));
            return (StatusCode::FORBIDDEN, Html("<h4>Couldn't get token.</h4>"));
        }
    };

    match auth::exchange_code(&shared_state.config, &code).await {
        Ok(token) => {
            let _ = sender.send(Ok(token));
            (
                StatusCode::OK,
                Html("<h2>Login completed!</h2><p>You can close this window.</p>"),
            )
        }
        Err(e) => {
            let _ = sender.send(Err(FixError::TokenExchangeFailed(e.to_string())));
            (StatusCode::FORBIDDEN, Html("<h4>Couldn't get token.</h4>"))
        }
    }
}
