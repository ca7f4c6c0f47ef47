use async_trait::async_trait;

#[async_trait]
pub trait Sender: Send + Sync + 'static {
    async fn send(&self, message: &str) -> anyhow::Result<()>;
}
