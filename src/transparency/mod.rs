pub mod client;
pub mod error;
pub mod parser;
pub mod request;
