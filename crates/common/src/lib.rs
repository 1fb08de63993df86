pub mod types;
pub mod utils;
pub mod admin_http;
