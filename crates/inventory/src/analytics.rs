//! Per-business summary over its inventory.

use serde::{Deserialize, Serialize};

use foodsaver_ai::{Strategy, UrgencyLevel};
use foodsaver_core::Money;

use crate::item::{Category, InventoryItem, ItemStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub quantity: u64,
}

/// Number of items per recommended strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyCounts {
    pub price_reduction: usize,
    pub donation: usize,
    pub bidding: usize,
    pub dispose: usize,
}

impl StrategyCounts {
    fn record(&mut self, strategy: &Strategy) {
        match strategy {
            Strategy::PriceReduction { .. } => self.price_reduction += 1,
            Strategy::Donation => self.donation += 1,
            Strategy::Bidding => self.bidding += 1,
            Strategy::Dispose => self.dispose += 1,
        }
    }
}

/// Number of items per urgency level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl UrgencyCounts {
    fn record(&mut self, urgency: UrgencyLevel) {
        match urgency {
            UrgencyLevel::Critical => self.critical += 1,
            UrgencyLevel::High => self.high += 1,
            UrgencyLevel::Medium => self.medium += 1,
            UrgencyLevel::Low => self.low += 1,
        }
    }

    pub fn get(&self, urgency: UrgencyLevel) -> usize {
        match urgency {
            UrgencyLevel::Critical => self.critical,
            UrgencyLevel::High => self.high,
            UrgencyLevel::Medium => self.medium,
            UrgencyLevel::Low => self.low,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSummary {
    pub total_items: usize,
    /// Σ original price × quantity.
    pub total_value: Money,
    pub active_items: usize,
    pub bidding_items: usize,
    pub donated_items: usize,
    /// Quantity per category, in order of first appearance.
    pub categories: Vec<CategoryTotal>,
    pub strategies: StrategyCounts,
    pub urgency: UrgencyCounts,
    /// Σ suggested price × quantity over items recommended for a price reduction.
    pub projected_recovery: Money,
}

impl BusinessSummary {
    /// Summarize the given items (callers pass one business's inventory).
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> Self {
        let mut summary = BusinessSummary::default();

        for item in items {
            summary.total_items += 1;
            summary.total_value = summary.total_value.saturating_add(item.stock_value());

            match item.status() {
                ItemStatus::Active => summary.active_items += 1,
                ItemStatus::Bidding => summary.bidding_items += 1,
                ItemStatus::Donated => summary.donated_items += 1,
                ItemStatus::Reduced | ItemStatus::Sold => {}
            }

            let quantity = u64::from(item.quantity());
            match summary
                .categories
                .iter_mut()
                .find(|c| c.category == item.category())
            {
                Some(total) => total.quantity += quantity,
                None => summary.categories.push(CategoryTotal {
                    category: item.category(),
                    quantity,
                }),
            }

            if let Some(rec) = item.recommendation() {
                summary.strategies.record(&rec.strategy);
                summary.urgency.record(rec.urgency_level);
                if let Some(price) = rec.suggested_price() {
                    summary.projected_recovery = summary
                        .projected_recovery
                        .saturating_add(price.times(item.quantity()));
                }
            }
        }

        summary
    }
}
