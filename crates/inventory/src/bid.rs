use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodsaver_core::{BidId, DomainError, DomainResult, Entity, ItemId, Money, UserId};

/// Bid status lifecycle: `pending -> accepted | rejected`, both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
        }
    }

    pub fn can_transition_to(&self, next: BidStatus) -> bool {
        matches!(
            (*self, next),
            (BidStatus::Pending, BidStatus::Accepted | BidStatus::Rejected)
        )
    }
}

impl core::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for BidStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BidStatus::Pending),
            "accepted" => Ok(BidStatus::Accepted),
            "rejected" => Ok(BidStatus::Rejected),
            other => Err(DomainError::validation(format!("unknown bid status {other:?}"))),
        }
    }
}

/// A monetary offer for an item open for bidding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: BidId,
    pub item_id: ItemId,
    pub user_id: UserId,
    pub user_email: String,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
    pub status: BidStatus,
}

impl Bid {
    /// A new pending bid. Whether the item is open for bidding and whether the
    /// amount makes sense is left to the caller.
    pub fn place(
        id: BidId,
        item_id: ItemId,
        user_id: UserId,
        user_email: impl Into<String>,
        amount: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            item_id,
            user_id,
            user_email: user_email.into(),
            amount,
            created_at,
            status: BidStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == BidStatus::Pending
    }

    pub fn transition_to(&mut self, next: BidStatus) -> DomainResult<BidStatus> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition("bid", self.status, next));
        }
        let previous = self.status;
        self.status = next;
        Ok(previous)
    }
}

impl Entity for Bid {
    type Id = BidId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid() -> Bid {
        Bid::place(
            BidId::new(),
            ItemId::new(),
            UserId::new(),
            "sam@example.com",
            Money::from_cents(2500),
            Utc::now(),
        )
    }

    #[test]
    fn placed_bids_are_pending() {
        assert!(bid().is_pending());
    }

    #[test]
    fn decided_bids_are_final() {
        let mut b = bid();
        assert_eq!(b.transition_to(BidStatus::Accepted).unwrap(), BidStatus::Pending);
        assert!(matches!(
            b.transition_to(BidStatus::Rejected),
            Err(DomainError::InvalidTransition { entity: "bid", .. })
        ));
        assert_eq!(b.status, BidStatus::Accepted);
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let b = bid();
        let value = serde_json::to_value(&b).unwrap();
        assert_eq!(value["userEmail"], "sam@example.com");
        assert_eq!(value["amount"], 25.0);
        assert_eq!(value["status"], "pending");
        let back: Bid = serde_json::from_value(value).unwrap();
        assert_eq!(back, b);
    }
}
