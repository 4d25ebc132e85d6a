//! Contract bindings and call encoding for the yield pool

pub mod intent;
pub mod pool;

pub use intent::{decode_uint_return, CallIntent};
pub use pool::*;
