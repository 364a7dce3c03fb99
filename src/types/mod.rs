//! Type definitions

pub mod duty_log;
pub mod location;
pub mod messages;
pub mod route;
pub mod stop;
pub mod trip;

pub use duty_log::*;
pub use location::*;
pub use messages::*;
pub use route::*;
pub use stop::*;
pub use trip::*;
