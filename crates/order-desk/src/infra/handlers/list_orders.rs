use std::sync::Arc;

use async_trait::async_trait;
use mediator::{Context, RequestHandler};

use crate::domain::{models::OrderView, requests::ListOrdersRequest, store::OrderStore};

pub struct ListOrders {
    store: Arc<dyn OrderStore>,
}

impl ListOrders {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<ListOrdersRequest> for ListOrders {
    async fn handle(
        &self,
        _request: ListOrdersRequest,
        _ctx: &Context,
    ) -> anyhow::Result<Vec<OrderView>> {
        self.store.list().await
    }
}
