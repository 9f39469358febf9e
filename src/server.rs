use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle, time::timeout};

use crate::{
    api::{self, CallbackState},
    config::Config,
    errors::FixError,
    spotify::auth::LoginResult,
    warning,
};

/// Upper bound for draining the callback listener after the login.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub fn router(state: Arc<CallbackState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Local listener for the OAuth redirect.
pub struct CallbackServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl CallbackServer {
    /// Binds the listener. Failing to bind is fatal for the run.
    pub async fn bind(addr: &str) -> Result<Self, FixError> {
        let bind_error = |source| FixError::ListenerBind {
            addr: addr.to_string(),
            source,
        };

        let listener = TcpListener::bind(addr).await.map_err(bind_error)?;
        let addr = listener.local_addr().map_err(bind_error)?;
        Ok(Self { listener, addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Starts serving in a background task.
    ///
    /// The returned receiver yields exactly one login result. The server keeps
    /// running until [`ServerHandle::shutdown`] is called or the handle is
    /// dropped.
    pub fn spawn(
        self,
        expected_state: String,
        config: Config,
    ) -> (oneshot::Receiver<LoginResult>, ServerHandle) {
        let (sender, receiver) = oneshot::channel();
        let (shutdown, signal) = oneshot::channel::<()>();
        let state = Arc::new(CallbackState::new(expected_state, config, sender));
        let app = router(state);
        let listener = self.listener;

        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = signal.await;
            });
            if let Err(e) = serve.await {
                warning!("Callback server stopped: {}", e);
            }
        });

        (receiver, ServerHandle { shutdown, task })
    }
}

/// Handle to a callback listener served in the background.
pub struct ServerHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Stops accepting connections and waits until responses already in
    /// flight have been written, for at most [`SHUTDOWN_GRACE`].
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if timeout(SHUTDOWN_GRACE, self.task).await.is_err() {
            warning!("Callback server did not stop within {:?}", SHUTDOWN_GRACE);
        }
    }
}
