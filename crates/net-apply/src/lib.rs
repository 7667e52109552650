//! ifcfg network apply
//!
//! Transactional application of interface configuration with rollback support

pub mod rollback;
pub mod service;
pub mod transaction;


pub use rollback::Snapshot;
pub use service::{IfUpDownController, ServiceController};
pub use transaction::{InterfaceApplier, InterfaceLocks, Transaction, TransactionState};
