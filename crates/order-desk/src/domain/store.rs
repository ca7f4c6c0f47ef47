use async_trait::async_trait;

use crate::domain::models::{NewOrder, OrderView};

#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
    async fn insert(&self, order: NewOrder) -> anyhow::Result<OrderView>;

    async fn get(&self, id: u64) -> anyhow::Result<Option<OrderView>>;

    /// All orders, lowest id first.
    async fn list(&self) -> anyhow::Result<Vec<OrderView>>;
}
