use async_trait::async_trait;
use mediator::{Context, NotificationHandler};
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::requests::OrderPlaced;

/// In-memory record of placed orders.
#[derive(Default)]
pub struct AuditTrail {
    entries: Mutex<Vec<String>>,
}

impl AuditTrail {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<String> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl NotificationHandler<OrderPlaced> for AuditTrail {
    async fn handle(&self, event: OrderPlaced, _ctx: &Context) -> anyhow::Result<()> {
        let entry = format!("order {} placed by {}", event.order_id, event.customer);
        info!("{}", entry);
        self.entries.lock().await.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_each_order() {
        let audit = AuditTrail::new();
        for (order_id, customer) in [(1, "Alice"), (2, "Bob")] {
            audit
                .handle(
                    OrderPlaced {
                        order_id,
                        customer: customer.into(),
                    },
                    &Context::new(),
                )
                .await
                .unwrap();
        }

        assert_eq!(
            audit.entries().await,
            vec!["order 1 placed by Alice", "order 2 placed by Bob"]
        );
    }
}
