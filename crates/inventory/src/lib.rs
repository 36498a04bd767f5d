//! Surplus inventory entities.
//!
//! This crate contains the records the store persists (items, bids, donation
//! claims), their status state machines and the derived read views
//! (per-user transaction history, per-business summary). Everything here is
//! deterministic domain logic (no IO, no storage).

pub mod analytics;
pub mod bid;
pub mod donation;
pub mod item;
pub mod transaction;

pub use analytics::{BusinessSummary, CategoryTotal, StrategyCounts, UrgencyCounts};
pub use bid::{Bid, BidStatus};
pub use donation::{ClaimStatus, DonationClaim};
pub use item::{Category, Coordinates, InventoryItem, ItemStatus, NewInventoryItem, Unit};
pub use transaction::{
    TransactionKind, UNKNOWN_ITEM_NAME, UserTransaction, UserTransactionStatus,
    item_name_or_unknown, user_transactions,
};
