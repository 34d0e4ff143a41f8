pub mod codec;
pub mod collab;
pub mod handlers;
pub mod model;
pub mod of;

mod constants;
mod error;
mod lollipop;
mod retransmission;

pub use constants::*;
pub use error::*;
pub use lollipop::*;
pub use retransmission::*;
