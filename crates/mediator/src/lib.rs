pub mod context;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod notification;
pub mod registry;
pub mod request;

pub use context::Context;
pub use error::{RegistrationError, SendError};
pub use handler::{AnyBox, DynHandler, FnHandler, RequestHandler, TypedHandler, handler_fn};
pub use middleware::LoggingMiddleware;
pub use notification::{Notification, NotificationHandler};
pub use registry::{Binding, Mediator, RegistryBuilder};
pub use request::{Request, RequestKind, TypeTag};
