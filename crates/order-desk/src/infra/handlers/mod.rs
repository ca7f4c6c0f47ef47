pub mod audit;
pub mod create_order;
pub mod get_order;
pub mod list_orders;

use std::sync::Arc;

use mediator::{LoggingMiddleware, Mediator, RegistrationError};

use crate::domain::{
    requests::{CreateOrderRequest, GetOrderRequest, ListOrdersRequest, OrderPlaced},
    store::OrderStore,
};

use self::{
    audit::AuditTrail, create_order::CreateOrder, get_order::GetOrder, list_orders::ListOrders,
};

/// Every request and notification handler the process serves. A duplicate
/// binding here is a startup failure.
pub fn registry(
    store: Arc<dyn OrderStore>,
    audit: Arc<AuditTrail>,
) -> Result<Mediator, RegistrationError> {
    let create = LoggingMiddleware::new(CreateOrder::new(store.clone()));
    let get = LoggingMiddleware::new(GetOrder::new(store.clone()));
    let list = LoggingMiddleware::new(ListOrders::new(store));

    let mut builder = Mediator::builder();
    builder
        .register::<CreateOrderRequest, _>(create)?
        .register::<GetOrderRequest, _>(get)?
        .register::<ListOrdersRequest, _>(list)?
        .subscribe::<OrderPlaced, _>(audit);

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use mediator::RequestKind;

    use super::*;
    use crate::infra::store::MemoryOrderStore;

    #[test]
    fn test_registry_binds_every_request() {
        let mediator = registry(
            Arc::new(MemoryOrderStore::new()),
            Arc::new(AuditTrail::new()),
        )
        .unwrap();

        let kinds: Vec<RequestKind> = mediator.request_kinds().collect();
        assert_eq!(
            kinds,
            vec![
                RequestKind::of::<CreateOrderRequest>(),
                RequestKind::of::<GetOrderRequest>(),
                RequestKind::of::<ListOrdersRequest>(),
            ]
        );
    }
}
