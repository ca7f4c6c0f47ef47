use async_trait::async_trait;
use futures::future::select_all;
use tokio::{
    signal::unix::{Signal, SignalKind, signal},
    sync::Mutex,
};

use crate::core::{ShutdownKind, SignalHandler};

impl From<ShutdownKind> for SignalKind {
    fn from(kind: ShutdownKind) -> Self {
        match kind {
            ShutdownKind::Terminate => SignalKind::terminate(),
            ShutdownKind::Interrupt => SignalKind::interrupt(),
            ShutdownKind::Hangup => SignalKind::hangup(),
        }
    }
}

/// Listens for shutdown signals from the moment it is built, so a signal
/// delivered during startup is not lost.
pub struct UnixSignalHandler {
    signals: Mutex<Vec<(ShutdownKind, Signal)>>,
}

impl UnixSignalHandler {
    /// SIGTERM, SIGINT and SIGHUP. Must be called inside the runtime.
    pub fn new() -> anyhow::Result<Self> {
        Self::listen(&[
            ShutdownKind::Terminate,
            ShutdownKind::Interrupt,
            ShutdownKind::Hangup,
        ])
    }

    pub fn listen(kinds: &[ShutdownKind]) -> anyhow::Result<Self> {
        let signals = kinds
            .iter()
            .map(|&kind| Ok((kind, signal(kind.into())?)))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            signals: Mutex::new(signals),
        })
    }
}

#[async_trait]
impl SignalHandler for UnixSignalHandler {
    async fn wait_for_shutdown(&self) -> anyhow::Result<ShutdownKind> {
        let mut signals = self.signals.lock().await;
        anyhow::ensure!(!signals.is_empty(), "no shutdown signals registered");

        let waits = signals.iter_mut().map(|(kind, sig)| {
            Box::pin(async move {
                sig.recv().await;
                *kind
            })
        });
        let (kind, _, _) = select_all(waits).await;

        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_empty_listener_is_an_error() {
        let handler = UnixSignalHandler::listen(&[]).unwrap();
        assert!(handler.wait_for_shutdown().await.is_err());
    }

    #[tokio::test]
    async fn test_reports_which_signal_arrived() {
        let handler = UnixSignalHandler::listen(&[ShutdownKind::Hangup]).unwrap();

        let status = std::process::Command::new("kill")
            .args(["-HUP", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let kind = tokio::time::timeout(Duration::from_secs(2), handler.wait_for_shutdown())
            .await
            .expect("SIGHUP should be observed")
            .unwrap();
        assert_eq!(kind, ShutdownKind::Hangup);
    }
}
