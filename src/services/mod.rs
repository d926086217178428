// export modules
pub mod exchange;
pub mod order_builder;
pub mod relay;
pub mod signer;
pub mod validator;

pub use exchange::*;
pub use order_builder::*;
pub use relay::*;
pub use signer::*;
pub use validator::*;
