use mediator::{Notification, Request};

use crate::domain::models::OrderView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderRequest {
    pub customer: String,
    pub product: String,
    pub qty: u32,
}

impl Request for CreateOrderRequest {
    type Response = u64;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOrderRequest {
    pub order_id: u64,
}

impl Request for GetOrderRequest {
    type Response = Option<OrderView>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOrdersRequest;

impl Request for ListOrdersRequest {
    type Response = Vec<OrderView>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlaced {
    pub order_id: u64,
    pub customer: String,
}

impl Notification for OrderPlaced {}
