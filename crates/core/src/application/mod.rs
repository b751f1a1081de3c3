// Application Layer - Use Cases and Business Logic

pub mod inventory;
pub mod lease;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use inventory::InventoryService;
pub use lease::{CreateLeaseRequest, ExtendLeaseRequest, LeaseService};
pub use search::SearchService;
