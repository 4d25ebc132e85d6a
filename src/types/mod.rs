//! Types for the user-facing API

pub mod pool;
pub mod transaction;

pub use pool::{PoolInfo, UserPosition};
pub use transaction::{Receipt, ReceiptStatus, SignedTransaction, UnsignedTransaction};
