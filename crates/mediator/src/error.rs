use std::any::TypeId;

use thiserror::Error;

/// Startup-time failures while building the handler table.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("a handler is already registered for request `{request}`")]
    DuplicateRegistration { request: &'static str },

    #[error("handler bound to request `{request}` expects `{expected}`, found `{found}`")]
    TypeMismatch {
        request: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Dispatch-time failures.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("no handler registered for request `{request}`")]
    NoHandlerRegistered { request: &'static str },

    /// A value crossing the type-erased handler boundary was not of the
    /// declared type. Only reachable through a hand-written
    /// [`DynHandler`](crate::DynHandler).
    #[error("handler boundary for `{request}` expected `{expected}`, got a value of {found:?}")]
    ErasedTypeMismatch {
        request: &'static str,
        expected: &'static str,
        found: TypeId,
    },

    #[error(transparent)]
    Handler(anyhow::Error),
}

impl SendError {
    pub fn is_no_handler(&self) -> bool {
        matches!(self, Self::NoHandlerRegistered { .. })
    }

    /// The handler's own error, if this failure came from a handler.
    pub fn handler_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Handler(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_handler_error(self) -> Option<anyhow::Error> {
        match self {
            Self::Handler(e) => Some(e),
            _ => None,
        }
    }
}
