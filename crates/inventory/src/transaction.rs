//! Per-user transaction history: a user's bids and donation claims merged into
//! one list with a single status vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodsaver_core::{ItemId, Money, UserId, find_by_id};

use crate::bid::{Bid, BidStatus};
use crate::donation::{ClaimStatus, DonationClaim};
use crate::item::InventoryItem;

/// Display name for bids/claims whose item has been deleted.
pub const UNKNOWN_ITEM_NAME: &str = "Unknown Item";

/// Unified status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserTransactionStatus {
    Pending,
    Approved,
    Rejected,
    Won,
}

impl From<BidStatus> for UserTransactionStatus {
    fn from(status: BidStatus) -> Self {
        match status {
            BidStatus::Accepted => UserTransactionStatus::Won,
            BidStatus::Rejected => UserTransactionStatus::Rejected,
            BidStatus::Pending => UserTransactionStatus::Pending,
        }
    }
}

impl From<ClaimStatus> for UserTransactionStatus {
    fn from(status: ClaimStatus) -> Self {
        match status {
            ClaimStatus::Approved | ClaimStatus::Collected => UserTransactionStatus::Approved,
            ClaimStatus::Pending => UserTransactionStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionKind {
    Bid { amount: Money },
    Donation { quantity: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTransaction {
    /// Id of the underlying bid or claim.
    pub id: Uuid,
    pub item_id: ItemId,
    pub item_name: String,
    #[serde(flatten)]
    pub kind: TransactionKind,
    pub status: UserTransactionStatus,
    pub created_at: DateTime<Utc>,
}

/// Item name, or [`UNKNOWN_ITEM_NAME`] for dangling references.
pub fn item_name_or_unknown(items: &[InventoryItem], item_id: &ItemId) -> String {
    find_by_id(items, item_id)
        .map(|item| item.name().to_string())
        .unwrap_or_else(|| UNKNOWN_ITEM_NAME.to_string())
}

/// Merge `user_id`'s bids and claims, newest first.
pub fn user_transactions(
    user_id: UserId,
    items: &[InventoryItem],
    bids: &[Bid],
    claims: &[DonationClaim],
) -> Vec<UserTransaction> {
    let from_bids = bids.iter().filter(|b| b.user_id == user_id).map(|b| UserTransaction {
        id: b.id.into(),
        item_id: b.item_id,
        item_name: item_name_or_unknown(items, &b.item_id),
        kind: TransactionKind::Bid { amount: b.amount },
        status: b.status.into(),
        created_at: b.created_at,
    });

    let from_claims = claims
        .iter()
        .filter(|c| c.user_id == user_id)
        .map(|c| UserTransaction {
            id: c.id.into(),
            item_id: c.item_id,
            item_name: item_name_or_unknown(items, &c.item_id),
            kind: TransactionKind::Donation {
                quantity: c.quantity,
            },
            status: c.status.into(),
            created_at: c.created_at,
        });

    let mut all: Vec<UserTransaction> = from_bids.chain(from_claims).collect();
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    all
}
