use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::models::Incoming;

#[async_trait]
pub trait CommandConsumer: Send + Sync + 'static {
    async fn consume(&self, ch: mpsc::Receiver<Incoming>);
}
