pub mod consumer;

pub use consumer::Consumer;
