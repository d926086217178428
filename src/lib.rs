pub mod types;
pub mod error;
pub mod services;
pub mod handlers;
pub mod config;
pub mod cli;
pub mod logger;

pub use error::*;
pub use services::*;
