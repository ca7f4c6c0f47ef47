use std::sync::Arc;

use async_trait::async_trait;
use mediator::{Context, RequestHandler};

use crate::domain::{
    models::{NewOrder, OrderError},
    requests::CreateOrderRequest,
    store::OrderStore,
};

pub struct CreateOrder {
    store: Arc<dyn OrderStore>,
}

impl CreateOrder {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<CreateOrderRequest> for CreateOrder {
    async fn handle(&self, request: CreateOrderRequest, ctx: &Context) -> anyhow::Result<u64> {
        let order = NewOrder {
            customer: request.customer,
            product: request.product,
            qty: request.qty,
        };
        order.validate()?;

        if ctx.is_cancelled() {
            return Err(OrderError::Cancelled.into());
        }

        let view = self.store.insert(order).await?;
        Ok(view.id)
    }
}
