use std::sync::Arc;

use async_trait::async_trait;
use mediator::{Context, RequestHandler};

use crate::domain::{models::OrderView, requests::GetOrderRequest, store::OrderStore};

pub struct GetOrder {
    store: Arc<dyn OrderStore>,
}

impl GetOrder {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<GetOrderRequest> for GetOrder {
    /// An unknown id is `None`, not an error.
    async fn handle(
        &self,
        request: GetOrderRequest,
        _ctx: &Context,
    ) -> anyhow::Result<Option<OrderView>> {
        self.store.get(request.order_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::models::NewOrder, infra::store::MemoryOrderStore};

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let handler = GetOrder::new(Arc::new(MemoryOrderStore::new()));
        let view = handler
            .handle(GetOrderRequest { order_id: 7 }, &Context::new())
            .await
            .unwrap();
        assert_eq!(view, None);
    }

    #[tokio::test]
    async fn test_known_id_is_returned() {
        let store = Arc::new(MemoryOrderStore::new());
        let stored = store
            .insert(NewOrder {
                customer: "Bob".into(),
                product: "Gadget".into(),
                qty: 2,
            })
            .await
            .unwrap();

        let handler = GetOrder::new(store);
        let view = handler
            .handle(GetOrderRequest { order_id: stored.id }, &Context::new())
            .await
            .unwrap();
        assert_eq!(view, Some(stored));
    }
}
