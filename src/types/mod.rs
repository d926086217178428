// export modules
pub mod alert;
pub mod api;
pub mod config;
pub mod exchange;
pub mod order;

pub use alert::*;
pub use api::*;
pub use config::*;
pub use exchange::*;
pub use order::*;
