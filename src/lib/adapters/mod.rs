pub mod http;
pub mod views;

pub use http::*;
