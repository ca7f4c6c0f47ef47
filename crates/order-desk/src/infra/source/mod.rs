pub mod lines;
pub mod parser;

pub use lines::LineSource;
