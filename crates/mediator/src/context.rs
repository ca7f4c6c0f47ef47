use tokio_util::sync::CancellationToken;

/// Per-call state handed to every handler.
///
/// The mediator never cancels a context itself; whatever token the caller
/// supplies is forwarded as-is.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel_token: CancellationToken,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cancel_token(cancel_token: CancellationToken) -> Self {
        Self { cancel_token }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    pub async fn cancelled(&self) {
        self.cancel_token.cancelled().await
    }
}
