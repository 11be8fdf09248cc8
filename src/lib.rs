pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::LedgerError;
pub use crate::core::service::LedgerService;
pub use crate::core::split::{SplitSpec, compute_shares};
pub use crate::infrastructure::storage::Storage;
pub use crate::infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
