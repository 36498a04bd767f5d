use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodsaver_core::{ClaimId, DomainError, DomainResult, Entity, ItemId, UserId};

/// Claim status lifecycle: `pending -> approved -> collected`, and
/// `pending -> collected` for walk-in pickups. `collected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Collected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Collected => "collected",
        }
    }

    pub fn can_transition_to(&self, next: ClaimStatus) -> bool {
        matches!(
            (*self, next),
            (ClaimStatus::Pending, ClaimStatus::Approved | ClaimStatus::Collected)
                | (ClaimStatus::Approved, ClaimStatus::Collected)
        )
    }
}

impl core::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ClaimStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ClaimStatus::Pending),
            "approved" => Ok(ClaimStatus::Approved),
            "collected" => Ok(ClaimStatus::Collected),
            other => Err(DomainError::validation(format!("unknown claim status {other:?}"))),
        }
    }
}

/// A request to receive part of a donated item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationClaim {
    pub id: ClaimId,
    pub item_id: ItemId,
    pub user_id: UserId,
    pub user_email: String,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub status: ClaimStatus,
}

impl DonationClaim {
    /// A new pending claim. Outstanding claims on the same item are not summed;
    /// callers check the requested quantity against the item's current stock.
    pub fn request(
        id: ClaimId,
        item_id: ItemId,
        user_id: UserId,
        user_email: impl Into<String>,
        quantity: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            item_id,
            user_id,
            user_email: user_email.into(),
            quantity,
            created_at,
            status: ClaimStatus::Pending,
        }
    }

    pub fn transition_to(&mut self, next: ClaimStatus) -> DomainResult<ClaimStatus> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition("donation claim", self.status, next));
        }
        let previous = self.status;
        self.status = next;
        Ok(previous)
    }
}

impl Entity for DonationClaim {
    type Id = ClaimId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
