use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    models::{NewOrder, OrderView},
    store::OrderStore,
};

/// Process-local order table. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryOrderStore {
    next_id: AtomicU64,
    orders: RwLock<BTreeMap<u64, OrderView>>,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: NewOrder) -> anyhow::Result<OrderView> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let view = OrderView {
            id,
            customer: order.customer,
            product: order.product,
            qty: order.qty,
        };

        self.orders.write().await.insert(id, view.clone());
        Ok(view)
    }

    async fn get(&self, id: u64) -> anyhow::Result<Option<OrderView>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<OrderView>> {
        Ok(self.orders.read().await.values().cloned().collect())
    }
}
