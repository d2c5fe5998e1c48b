pub mod avatar;
pub mod common;

pub use avatar::*;
pub use common::*;
