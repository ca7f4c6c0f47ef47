use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    pub id: u64,
    pub customer: String,
    pub product: String,
    pub qty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer: String,
    pub product: String,
    pub qty: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("request cancelled before it was stored")]
    Cancelled,
}

impl NewOrder {
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.customer.trim().is_empty() {
            return Err(OrderError::Blank("customer"));
        }
        if self.product.trim().is_empty() {
            return Err(OrderError::Blank("product"));
        }
        if self.qty == 0 {
            return Err(OrderError::ZeroQuantity);
        }
        Ok(())
    }
}

/// One line of operator input, already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create {
        customer: String,
        product: String,
        qty: u32,
    },
    Get {
        order_id: u64,
    },
    List,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unbalanced quotes")]
    Unbalanced,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{field} must be a non-negative integer, got '{value}'")]
    NotANumber { field: &'static str, value: String },
}

/// A command together with the input line it came from.
#[derive(Debug)]
pub struct Incoming {
    pub line: u64,
    pub command: Result<Command, ParseError>,
}

impl Incoming {
    /// True for commands that change the store.
    pub fn is_write(&self) -> bool {
        matches!(self.command, Ok(Command::Create { .. }))
    }
}
