//! Command execution against an [`InventoryStore`].
//!
//! Every command yields a JSON value; `main` prints it.

use anyhow::{Context, Result};
use serde_json::{Value as JsonValue, json};

use foodsaver_ai::Recommender;
use foodsaver_core::Clock;
use foodsaver_infra::InventoryStore;
use foodsaver_infra::external::{PlainTextExtractor, extract_text_or_empty};
use foodsaver_infra::storage::KeyValueStore;
use foodsaver_inventory::{Category, Coordinates, NewInventoryItem, Unit};

use crate::args::{AddArgs, Command};

pub fn execute<S, C, R>(store: &InventoryStore<S, C, R>, command: Command) -> Result<JsonValue>
where
    S: KeyValueStore,
    C: Clock,
    R: Recommender,
{
    let output = match command {
        Command::Add(args) => {
            let item = store.add_item(draft(args)).context("failed to add item")?;
            serde_json::to_value(item)?
        }
        Command::List {
            business,
            bidding,
            donated,
        } => {
            let mut items = if bidding {
                store.available_for_bidding()?
            } else if donated {
                store.available_for_donation()?
            } else {
                store.items()?
            };
            if let Some(business) = business {
                items.retain(|item| item.business_id() == business);
            }
            serde_json::to_value(items)?
        }
        Command::Show { item } => serde_json::to_value(store.get_item(item)?)?,
        Command::Recommend { item } => {
            let refreshed = store
                .refresh_recommendation(item)
                .with_context(|| format!("failed to refresh recommendation for {item}"))?;
            serde_json::to_value(refreshed.recommendation())?
        }
        Command::Apply { item } => {
            let applied = store
                .apply_recommendation(item)
                .with_context(|| format!("failed to apply recommendation to {item}"))?;
            serde_json::to_value(applied)?
        }
        Command::Status { item, status } => {
            let updated = store
                .update_status(item, status)
                .with_context(|| format!("failed to move {item} to {status}"))?;
            serde_json::to_value(updated)?
        }
        Command::Price { item, price } => {
            let updated = store
                .update_price(item, price)
                .with_context(|| format!("failed to set price of {item}"))?;
            serde_json::to_value(updated)?
        }
        Command::Delete { item } => {
            let removed = store
                .delete_item(item)
                .with_context(|| format!("failed to delete {item}"))?;
            json!({ "deleted": removed.id_typed() })
        }
        Command::Bid {
            item,
            amount,
            user,
            email,
        } => serde_json::to_value(store.place_bid(item, user, &email, amount)?)?,
        Command::Bids { item } => serde_json::to_value(store.item_bids(item)?)?,
        Command::BidStatus { bid, status } => {
            let updated = store
                .update_bid_status(bid, status)
                .with_context(|| format!("failed to move bid {bid} to {status}"))?;
            serde_json::to_value(updated)?
        }
        Command::AcceptBid { bid } => {
            let accepted = store
                .accept_bid(bid)
                .with_context(|| format!("failed to accept bid {bid}"))?;
            serde_json::to_value(accepted)?
        }
        Command::Claim {
            item,
            quantity,
            user,
            email,
        } => {
            let claim = store
                .claim_donation(item, user, &email, quantity)
                .with_context(|| format!("failed to claim {quantity} of {item}"))?;
            serde_json::to_value(claim)?
        }
        Command::Claims { item } => serde_json::to_value(store.item_donations(item)?)?,
        Command::ClaimStatus { claim, status } => {
            let updated = store
                .update_donation_status(claim, status)
                .with_context(|| format!("failed to move claim {claim} to {status}"))?;
            serde_json::to_value(updated)?
        }
        Command::History { user } => serde_json::to_value(store.user_transactions(user)?)?,
        Command::Summary { business } => serde_json::to_value(store.business_summary(business)?)?,
        Command::Extract { path } => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            json!({ "text": extract_text_or_empty(&PlainTextExtractor, &bytes) })
        }
    };
    Ok(output)
}

fn draft(args: AddArgs) -> NewInventoryItem {
    let coordinates = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
        _ => None,
    };
    NewInventoryItem {
        business_id: args.business,
        business_name: args.business_name,
        name: args.name,
        category: Category::from_name(&args.category),
        quantity: args.quantity,
        unit: Unit::from_name(&args.unit),
        original_price: args.price,
        expiry_date: args.expiry,
        location: args.location,
        coordinates,
    }
}
