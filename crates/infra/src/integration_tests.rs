//! Integration tests for the file-backed store.
//!
//! Tests: InventoryStore → JsonFileStore → disk → reopened InventoryStore
//!
//! Verifies:
//! - Everything the store returns survives a restart unchanged
//! - The on-disk layout is three camelCase JSON arrays
//! - Cross-collection writes land together

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};

    use foodsaver_ai::Strategy;
    use foodsaver_core::{BusinessId, FixedClock, Money, UserId};
    use foodsaver_inventory::{
        BidStatus, Category, ClaimStatus, ItemStatus, NewInventoryItem, Unit,
        UserTransactionStatus,
    };

    use crate::config::{CollectionKeys, StoreConfig};
    use crate::storage::{JsonFileStore, KeyValueStore};
    use crate::store::InventoryStore;

    type FileStore = InventoryStore<JsonFileStore, Arc<FixedClock>>;

    fn temp_config() -> StoreConfig {
        StoreConfig {
            data_path: std::env::temp_dir()
                .join(format!("foodsaver-it-{}", uuid::Uuid::now_v7()))
                .join("data.json"),
            keys: CollectionKeys::default(),
        }
    }

    fn open(config: &StoreConfig, clock: &Arc<FixedClock>) -> FileStore {
        let storage = JsonFileStore::open(&config.data_path).unwrap();
        InventoryStore::new(storage, config.keys.clone()).with_clock(clock.clone())
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    fn draft(business: BusinessId, name: &str, quantity: u32, days_left: i64) -> NewInventoryItem {
        NewInventoryItem {
            business_id: business,
            business_name: "Harbour Deli".to_string(),
            name: name.to_string(),
            category: Category::Dairy,
            quantity,
            unit: Unit::Packs,
            original_price: Money::from_cents(1_000),
            expiry_date: Utc
                .with_ymd_and_hms(2024, 5, 10, 0, 0, 0)
                .unwrap()
                .date_naive()
                + Duration::days(days_left),
            location: "4 Quay St".to_string(),
            coordinates: None,
        }
    }

    #[test]
    fn full_flow_survives_a_restart() {
        let config = temp_config();
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 5, 10, 14, 0, 0).unwrap(),
        ));
        let business = BusinessId::new();
        let buyer = UserId::new();
        let charity = UserId::new();

        let store = open(&config, &clock);
        let yoghurt = store.add_item(draft(business, "Greek yoghurt", 10, 5)).unwrap();
        let cheese = store.add_item(draft(business, "Cheddar block", 80, 2)).unwrap();
        let milk = store.add_item(draft(business, "Whole milk", 12, 1)).unwrap();

        let reduced = store.apply_recommendation(yoghurt.id_typed()).unwrap();
        assert_eq!(reduced.reduced_price(), Some(Money::from_cents(700)));
        assert_eq!(cheese.recommendation().unwrap().strategy, Strategy::Bidding);
        store.apply_recommendation(cheese.id_typed()).unwrap();
        store.apply_recommendation(milk.id_typed()).unwrap();

        clock.advance(Duration::minutes(10));
        let low = store
            .place_bid(cheese.id_typed(), UserId::new(), "low@example.com", Money::from_cents(300))
            .unwrap();
        clock.advance(Duration::minutes(10));
        let high = store
            .place_bid(cheese.id_typed(), buyer, "buyer@example.com", Money::from_cents(450))
            .unwrap();
        clock.advance(Duration::minutes(10));
        let claim = store
            .claim_donation(milk.id_typed(), charity, "food@bank.org", 12)
            .unwrap();
        store.accept_bid(high.id).unwrap();
        store
            .update_donation_status(claim.id, ClaimStatus::Approved)
            .unwrap();

        let items_before = store.items().unwrap();
        let bids_before = store.bids().unwrap();
        let claims_before = store.donations().unwrap();
        drop(store);

        let reopened = open(&config, &clock);
        assert_eq!(reopened.items().unwrap(), items_before);
        assert_eq!(reopened.bids().unwrap(), bids_before);
        assert_eq!(reopened.donations().unwrap(), claims_before);
        assert_eq!(reopened.get_item(yoghurt.id_typed()).unwrap(), reduced);

        assert_eq!(
            reopened.get_item(cheese.id_typed()).unwrap().status(),
            ItemStatus::Sold
        );
        let low_after = reopened
            .bids()
            .unwrap()
            .into_iter()
            .find(|b| b.id == low.id)
            .unwrap();
        assert_eq!(low_after.status, BidStatus::Rejected);

        let history = reopened.user_transactions(buyer).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, UserTransactionStatus::Won);
        assert_eq!(history[0].item_name, "Cheddar block");

        assert_eq!(
            reopened.available_for_donation().unwrap()[0].id_typed(),
            milk.id_typed()
        );

        cleanup(&config.data_path);
    }

    #[test]
    fn on_disk_layout_is_camel_case_json() {
        let config = temp_config();
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 5, 10, 14, 0, 0).unwrap(),
        ));
        let store = open(&config, &clock);
        let item = store
            .add_item(draft(BusinessId::new(), "Butter", 10, 5))
            .unwrap();
        store.update_price(item.id_typed(), Money::from_cents(850)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&config.data_path).unwrap()).unwrap();
        let stored = &raw["inventory"][0];
        assert_eq!(stored["name"], "Butter");
        assert_eq!(stored["status"], "reduced");
        assert_eq!(stored["originalPrice"], 10.0);
        assert_eq!(stored["reducedPrice"], 8.5);
        assert_eq!(stored["expiryDate"], "2024-05-15");
        assert_eq!(stored["category"], "Dairy");
        assert_eq!(stored["aiRecommendation"]["strategy"], "price_reduction");
        assert_eq!(stored["aiRecommendation"]["suggestedPrice"], 7.0);
        assert_eq!(stored["aiRecommendation"]["urgencyLevel"], "medium");
        assert!(raw.get("bids").is_none());

        let storage = JsonFileStore::open(&config.data_path).unwrap();
        assert!(storage.get("donations").unwrap().is_none());

        cleanup(&config.data_path);
    }
}
