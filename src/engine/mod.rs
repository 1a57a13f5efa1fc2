pub mod driver;
pub mod error_sink;
