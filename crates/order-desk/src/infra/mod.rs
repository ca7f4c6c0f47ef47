pub mod config;
pub mod consumer;
pub mod handlers;
pub mod logging;
pub mod sender;
pub mod signal;
pub mod source;
pub mod store;

pub use config::{Config, Settings};
pub use consumer::Consumer;
pub use logging::LogGuard;
pub use sender::StdoutSender;
pub use signal::UnixSignalHandler;
pub use source::LineSource;
pub use store::MemoryOrderStore;
