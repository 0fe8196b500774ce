pub mod console;
pub mod json;

pub use console::ConsoleSink;
pub use json::JsonFileSink;
