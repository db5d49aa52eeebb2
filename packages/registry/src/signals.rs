//! Process termination signals.
//!
//! The library never exits the process. A [`ShutdownHandler`] listens for the
//! first termination signal and cancels a [`CancellationToken`]; whoever
//! holds the token deregisters and decides how to exit. Only one handler
//! should be installed per process.
use derive_more::Display;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::REGISTRY_CLIENT_LOG_TARGET;

/// The signal that asked the process to stop.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    #[display("interrupt")]
    Interrupt,
    #[display("terminate")]
    Terminate,
}

/// Resolves on the first `SIGINT` or `SIGTERM` (ctrl-c only, on non-unix
/// platforms).
///
/// # Errors
///
/// Will return an error if a signal listener can not be registered.
pub async fn shutdown_signal() -> Result<Signal, std::io::Error> {
    #[cfg(unix)]
    let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    #[cfg(unix)]
    let terminate = async move {
        terminate.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        interrupt = tokio::signal::ctrl_c() => interrupt.map(|()| Signal::Interrupt),
        () = terminate => Ok(Signal::Terminate),
    }
}

/// One-shot listener turning the first termination signal into a cancelled
/// token. A second signal is not handled.
#[derive(Debug)]
pub struct ShutdownHandler {
    token: CancellationToken,
    listener: JoinHandle<()>,
}

impl ShutdownHandler {
    /// Spawns the listener. It must be called within a tokio runtime.
    #[must_use]
    pub fn install() -> Self {
        let token = CancellationToken::new();

        let listener = tokio::spawn(listen(token.clone()));

        Self { token, listener }
    }

    /// The token cancelled on the first signal.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Drop for ShutdownHandler {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

async fn listen(token: CancellationToken) {
    tokio::select! {
        () = token.cancelled() => {}
        signal = shutdown_signal() => {
            match signal {
                Ok(signal) => tracing::info!(target: REGISTRY_CLIENT_LOG_TARGET, %signal, "termination signal received"),
                Err(e) => tracing::error!(target: REGISTRY_CLIENT_LOG_TARGET, %e, "unable to listen for termination signals, shutting down"),
            }

            token.cancel();
        }
    }
}
