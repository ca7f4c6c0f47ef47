use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::models::Incoming;

#[async_trait]
pub trait CommandSource: Send + Sync + 'static {
    async fn fetch(&self) -> anyhow::Result<mpsc::Receiver<Incoming>>;
}
