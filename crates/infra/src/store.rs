//! Inventory store: the read/write surface over items, bids and donation claims.
//!
//! ## Persistence model
//!
//! Each collection lives under its own key as a JSON array. Every mutation
//! loads the collection(s) it touches, applies the change through the entity's
//! own methods (so the status state machines are always enforced), and writes
//! the result back.
//!
//! ## Consistency
//!
//! Mutations hold `write_lock` for their whole read-modify-write cycle. Changes
//! that span collections (leaving `bidding` rejects the item's pending bids,
//! accepting a bid sells the item) go out as one `write_batch`, so they land
//! together or not at all.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, info, warn};

use foodsaver_ai::{Recommender, RuleBasedRecommender};
use foodsaver_core::{
    BidId, BusinessId, ClaimId, Clock, DomainError, Entity, ItemId, Money, SystemClock, UserId,
    find_by_id, position_of,
};
use foodsaver_inventory::{
    Bid, BidStatus, BusinessSummary, ClaimStatus, DonationClaim, InventoryItem, ItemStatus,
    NewInventoryItem, UserTransaction,
};

use crate::config::CollectionKeys;
use crate::storage::{KeyValueStore, StorageError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A stored collection does not decode into its entity type.
    #[error("collection {key:?} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct InventoryStore<S, C = SystemClock, R = RuleBasedRecommender> {
    storage: S,
    clock: C,
    recommender: R,
    keys: CollectionKeys,
    write_lock: Mutex<()>,
}

impl<S> InventoryStore<S>
where
    S: KeyValueStore,
{
    /// Store on wall-clock time with the canonical rule table.
    pub fn new(storage: S, keys: CollectionKeys) -> Self {
        Self {
            storage,
            clock: SystemClock,
            recommender: RuleBasedRecommender::default(),
            keys,
            write_lock: Mutex::new(()),
        }
    }
}

impl<S, C, R> InventoryStore<S, C, R>
where
    S: KeyValueStore,
    C: Clock,
    R: Recommender,
{
    pub fn with_clock<C2: Clock>(self, clock: C2) -> InventoryStore<S, C2, R> {
        InventoryStore {
            storage: self.storage,
            clock,
            recommender: self.recommender,
            keys: self.keys,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_recommender<R2: Recommender>(self, recommender: R2) -> InventoryStore<S, C, R2> {
        InventoryStore {
            storage: self.storage,
            clock: self.clock,
            recommender,
            keys: self.keys,
            write_lock: Mutex::new(()),
        }
    }

    pub fn keys(&self) -> &CollectionKeys {
        &self.keys
    }

    // ---- items -------------------------------------------------------------

    /// Validate and register a new item with a fresh recommendation.
    pub fn add_item(&self, draft: NewInventoryItem) -> StoreResult<InventoryItem> {
        draft.validate()?;

        let _guard = self.lock();
        let mut items: Vec<InventoryItem> = self.load(&self.keys.inventory)?;

        let now = self.clock.now();
        let recommendation = self
            .recommender
            .recommend(&draft.recommendation_input(), self.clock.today());
        let item = InventoryItem::create(ItemId::new(), draft, now, Some(recommendation))?;

        items.push(item.clone());
        self.save(&self.keys.inventory, &items)?;

        info!(
            item_id = %item.id(),
            business_id = %item.business_id(),
            strategy = %item.recommendation().map(|r| r.strategy.as_str()).unwrap_or("none"),
            "inventory item added"
        );
        Ok(item)
    }

    pub fn get_item(&self, item_id: ItemId) -> StoreResult<InventoryItem> {
        let items: Vec<InventoryItem> = self.load(&self.keys.inventory)?;
        find_by_id(&items, &item_id)
            .cloned()
            .ok_or_else(|| not_found("item", item_id))
    }

    pub fn items(&self) -> StoreResult<Vec<InventoryItem>> {
        self.load(&self.keys.inventory)
    }

    pub fn bids(&self) -> StoreResult<Vec<Bid>> {
        self.load(&self.keys.bids)
    }

    pub fn donations(&self) -> StoreResult<Vec<DonationClaim>> {
        self.load(&self.keys.donations)
    }

    /// Move an item to `status`. Leaving `bidding` rejects its pending bids in
    /// the same write.
    pub fn update_status(&self, item_id: ItemId, status: ItemStatus) -> StoreResult<InventoryItem> {
        let _guard = self.lock();
        let mut items: Vec<InventoryItem> = self.load(&self.keys.inventory)?;
        let pos = position_of(&items, &item_id).ok_or_else(|| not_found("item", item_id))?;

        let previous = items[pos].transition_to(status)?;
        let updated = items[pos].clone();
        self.commit_item_change(item_id, previous, status, &items)?;

        info!(item_id = %item_id, from = %previous, to = %status, "item status updated");
        Ok(updated)
    }

    /// Act on the item's attached recommendation ("apply strategy").
    pub fn apply_recommendation(&self, item_id: ItemId) -> StoreResult<InventoryItem> {
        let _guard = self.lock();
        let mut items: Vec<InventoryItem> = self.load(&self.keys.inventory)?;
        let pos = position_of(&items, &item_id).ok_or_else(|| not_found("item", item_id))?;

        let previous = items[pos].status();
        let strategy = items[pos].apply_recommendation()?;
        let updated = items[pos].clone();
        self.commit_item_change(item_id, previous, updated.status(), &items)?;

        info!(
            item_id = %item_id,
            strategy = %strategy,
            status = %updated.status(),
            "recommendation applied"
        );
        Ok(updated)
    }

    /// Ask a new price for the item; an active item becomes `reduced`.
    pub fn update_price(&self, item_id: ItemId, price: Money) -> StoreResult<InventoryItem> {
        let _guard = self.lock();
        let mut items: Vec<InventoryItem> = self.load(&self.keys.inventory)?;
        let pos = position_of(&items, &item_id).ok_or_else(|| not_found("item", item_id))?;

        items[pos].set_reduced_price(price)?;
        let updated = items[pos].clone();
        self.save(&self.keys.inventory, &items)?;

        info!(item_id = %item_id, price = %price, "item price updated");
        Ok(updated)
    }

    /// Remove an item. Its bids and claims stay; history shows them against
    /// an unknown item.
    pub fn delete_item(&self, item_id: ItemId) -> StoreResult<InventoryItem> {
        let _guard = self.lock();
        let mut items: Vec<InventoryItem> = self.load(&self.keys.inventory)?;
        let pos = position_of(&items, &item_id).ok_or_else(|| not_found("item", item_id))?;

        let removed = items.remove(pos);
        self.save(&self.keys.inventory, &items)?;

        info!(item_id = %item_id, "inventory item deleted");
        Ok(removed)
    }

    /// Recompute the attached recommendation as of the clock's current date.
    pub fn refresh_recommendation(&self, item_id: ItemId) -> StoreResult<InventoryItem> {
        let _guard = self.lock();
        let mut items: Vec<InventoryItem> = self.load(&self.keys.inventory)?;
        let pos = position_of(&items, &item_id).ok_or_else(|| not_found("item", item_id))?;

        let recommendation = self
            .recommender
            .recommend(&items[pos].recommendation_input(), self.clock.today());
        debug!(
            item_id = %item_id,
            strategy = %recommendation.strategy,
            urgency = %recommendation.urgency_level,
            "recommendation refreshed"
        );
        items[pos].replace_recommendation(recommendation);
        let updated = items[pos].clone();
        self.save(&self.keys.inventory, &items)?;
        Ok(updated)
    }

    // ---- bids --------------------------------------------------------------

    /// Record a pending bid. Item status and amount are not checked here.
    pub fn place_bid(
        &self,
        item_id: ItemId,
        user_id: UserId,
        user_email: &str,
        amount: Money,
    ) -> StoreResult<Bid> {
        let _guard = self.lock();
        let mut bids: Vec<Bid> = self.load(&self.keys.bids)?;

        let bid = Bid::place(
            BidId::new(),
            item_id,
            user_id,
            user_email,
            amount,
            self.clock.now(),
        );
        bids.push(bid.clone());
        self.save(&self.keys.bids, &bids)?;

        info!(bid_id = %bid.id, item_id = %item_id, amount = %amount, "bid placed");
        Ok(bid)
    }

    pub fn update_bid_status(&self, bid_id: BidId, status: BidStatus) -> StoreResult<Bid> {
        let _guard = self.lock();
        let mut bids: Vec<Bid> = self.load(&self.keys.bids)?;
        let pos = position_of(&bids, &bid_id).ok_or_else(|| not_found("bid", bid_id))?;

        let previous = bids[pos].transition_to(status)?;
        let updated = bids[pos].clone();
        self.save(&self.keys.bids, &bids)?;

        info!(bid_id = %bid_id, from = %previous, to = %status, "bid status updated");
        Ok(updated)
    }

    /// Accept one bid: the other pending bids on the item are rejected and the
    /// item (if it still exists) is sold, in one write.
    pub fn accept_bid(&self, bid_id: BidId) -> StoreResult<Bid> {
        let _guard = self.lock();
        let mut bids: Vec<Bid> = self.load(&self.keys.bids)?;
        let pos = position_of(&bids, &bid_id).ok_or_else(|| not_found("bid", bid_id))?;

        bids[pos].transition_to(BidStatus::Accepted)?;
        let accepted = bids[pos].clone();
        let rejected = reject_pending_bids(&mut bids, accepted.item_id)?;

        let mut entries = vec![encode(&self.keys.bids, &bids)?];
        let mut items: Vec<InventoryItem> = self.load(&self.keys.inventory)?;
        match position_of(&items, &accepted.item_id) {
            Some(item_pos) => {
                items[item_pos].transition_to(ItemStatus::Sold)?;
                entries.push(encode(&self.keys.inventory, &items)?);
            }
            None => warn!(
                bid_id = %bid_id,
                item_id = %accepted.item_id,
                "accepted bid refers to a missing item"
            ),
        }
        self.storage.write_batch(entries)?;

        info!(
            bid_id = %bid_id,
            item_id = %accepted.item_id,
            rejected,
            "bid accepted"
        );
        Ok(accepted)
    }

    // ---- donation claims ---------------------------------------------------

    /// Record a pending claim. Each claim is checked against the item's stock
    /// on its own; outstanding claims are not summed.
    pub fn claim_donation(
        &self,
        item_id: ItemId,
        user_id: UserId,
        user_email: &str,
        quantity: u32,
    ) -> StoreResult<DonationClaim> {
        if quantity == 0 {
            return Err(DomainError::validation("claimed quantity must be positive").into());
        }

        let _guard = self.lock();
        let items: Vec<InventoryItem> = self.load(&self.keys.inventory)?;
        match find_by_id(&items, &item_id) {
            Some(item) if quantity > item.quantity() => {
                return Err(DomainError::validation(format!(
                    "claimed quantity {quantity} exceeds available {} {}",
                    item.quantity(),
                    item.unit()
                ))
                .into());
            }
            Some(_) => {}
            None => warn!(item_id = %item_id, "donation claimed for a missing item"),
        }

        let mut claims: Vec<DonationClaim> = self.load(&self.keys.donations)?;
        let claim = DonationClaim::request(
            ClaimId::new(),
            item_id,
            user_id,
            user_email,
            quantity,
            self.clock.now(),
        );
        claims.push(claim.clone());
        self.save(&self.keys.donations, &claims)?;

        info!(claim_id = %claim.id, item_id = %item_id, quantity, "donation claimed");
        Ok(claim)
    }

    pub fn update_donation_status(
        &self,
        claim_id: ClaimId,
        status: ClaimStatus,
    ) -> StoreResult<DonationClaim> {
        let _guard = self.lock();
        let mut claims: Vec<DonationClaim> = self.load(&self.keys.donations)?;
        let pos = position_of(&claims, &claim_id)
            .ok_or_else(|| not_found("donation claim", claim_id))?;

        let previous = claims[pos].transition_to(status)?;
        let updated = claims[pos].clone();
        self.save(&self.keys.donations, &claims)?;

        info!(claim_id = %claim_id, from = %previous, to = %status, "donation claim updated");
        Ok(updated)
    }

    // ---- queries -----------------------------------------------------------

    pub fn business_inventory(&self, business_id: BusinessId) -> StoreResult<Vec<InventoryItem>> {
        let items = self.items_where(|item| item.business_id() == business_id)?;
        debug!(business_id = %business_id, count = items.len(), "business inventory loaded");
        Ok(items)
    }

    pub fn available_for_bidding(&self) -> StoreResult<Vec<InventoryItem>> {
        self.items_where(|item| item.status() == ItemStatus::Bidding)
    }

    pub fn available_for_donation(&self) -> StoreResult<Vec<InventoryItem>> {
        self.items_where(|item| item.status() == ItemStatus::Donated)
    }

    pub fn item_bids(&self, item_id: ItemId) -> StoreResult<Vec<Bid>> {
        let mut bids = self.bids()?;
        bids.retain(|bid| bid.item_id == item_id);
        Ok(bids)
    }

    pub fn item_donations(&self, item_id: ItemId) -> StoreResult<Vec<DonationClaim>> {
        let mut claims = self.donations()?;
        claims.retain(|claim| claim.item_id == item_id);
        Ok(claims)
    }

    /// The user's bids and claims, newest first.
    pub fn user_transactions(&self, user_id: UserId) -> StoreResult<Vec<UserTransaction>> {
        let items = self.items()?;
        let bids = self.bids()?;
        let claims = self.donations()?;
        let history = foodsaver_inventory::user_transactions(user_id, &items, &bids, &claims);
        debug!(user_id = %user_id, count = history.len(), "user transactions loaded");
        Ok(history)
    }

    pub fn business_summary(&self, business_id: BusinessId) -> StoreResult<BusinessSummary> {
        let items = self.business_inventory(business_id)?;
        Ok(BusinessSummary::from_items(&items))
    }

    // ---- internals ---------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The mutex guards no data, so poisoning is ignored.
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        match self.storage.get(key)? {
            None | Some(JsonValue::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save<T: Serialize>(&self, key: &str, values: &[T]) -> StoreResult<()> {
        let (key, value) = encode(key, values)?;
        self.storage.set(&key, value)?;
        Ok(())
    }

    fn items_where(
        &self,
        predicate: impl Fn(&InventoryItem) -> bool,
    ) -> StoreResult<Vec<InventoryItem>> {
        let mut items = self.items()?;
        items.retain(|item| predicate(item));
        Ok(items)
    }

    /// Persist `items`; when the item just left `bidding`, its pending bids are
    /// rejected and written in the same batch.
    fn commit_item_change(
        &self,
        item_id: ItemId,
        previous: ItemStatus,
        current: ItemStatus,
        items: &[InventoryItem],
    ) -> StoreResult<()> {
        let mut entries = vec![encode(&self.keys.inventory, items)?];

        if previous == ItemStatus::Bidding && current != ItemStatus::Bidding {
            let mut bids: Vec<Bid> = self.load(&self.keys.bids)?;
            let rejected = reject_pending_bids(&mut bids, item_id)?;
            if rejected > 0 {
                info!(item_id = %item_id, rejected, "pending bids rejected on leaving bidding");
                entries.push(encode(&self.keys.bids, &bids)?);
            }
        }

        self.storage.write_batch(entries)?;
        Ok(())
    }
}

fn not_found(entity: &str, id: impl core::fmt::Display) -> StoreError {
    DomainError::not_found(format!("{entity} {id} not found")).into()
}

fn encode<T: Serialize>(key: &str, values: &[T]) -> StoreResult<(String, JsonValue)> {
    let value = serde_json::to_value(values).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    Ok((key.to_string(), value))
}

/// Reject every still-pending bid on `item_id`. Returns how many were rejected.
fn reject_pending_bids(bids: &mut [Bid], item_id: ItemId) -> StoreResult<usize> {
    let mut rejected = 0;
    for bid in bids
        .iter_mut()
        .filter(|bid| bid.item_id == item_id && bid.is_pending())
    {
        bid.transition_to(BidStatus::Rejected)?;
        rejected += 1;
    }
    Ok(rejected)
}
