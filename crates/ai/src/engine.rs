//! Rule-based recommendation engine.
//!
//! Model (first match wins, on whole days until expiry):
//! - `<= 0`: dispose.
//! - `== 1`: donate.
//! - `2..=3`: open bidding for large lots, otherwise an aggressive discount.
//! - `4..=7`: moderate discount.
//! - `> 7`: open bidding for very large lots, otherwise a small discount.
//!
//! Urgency is bucketed independently of the strategy.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use foodsaver_core::Money;

use crate::recommendation::{Recommendation, Strategy, UrgencyLevel};

const DISPOSE_CONFIDENCE: f64 = 1.0;
const DONATION_CONFIDENCE: f64 = 0.95;
const SHORT_BIDDING_CONFIDENCE: f64 = 0.85;
const SHORT_DISCOUNT_CONFIDENCE: f64 = 0.88;
const MEDIUM_DISCOUNT_CONFIDENCE: f64 = 0.82;
const BULK_BIDDING_CONFIDENCE: f64 = 0.75;
const LONG_DISCOUNT_CONFIDENCE: f64 = 0.70;

/// The item attributes the engine looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationInput {
    pub original_price: Money,
    pub quantity: u32,
    pub expiry_date: NaiveDate,
}

/// Whole calendar days from `today` until `expiry_date` (negative once expired).
///
/// Equals the ceiling of the fractional day difference between expiry midnight
/// and any instant during `today`.
pub fn days_until_expiry(expiry_date: NaiveDate, today: NaiveDate) -> i64 {
    expiry_date.signed_duration_since(today).num_days()
}

/// Thresholds and discount factors of the rule table.
///
/// `RecommendationPolicy::default()` is the canonical policy; the builder
/// methods exist for experiments and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationPolicy {
    /// Last day of the "short" window (urgency high, aggressive discount).
    pub short_window_days: i64,
    /// Last day of the "medium" window (urgency medium, moderate discount).
    pub medium_window_days: i64,
    /// Short-window lots strictly larger than this go to bidding.
    pub short_bidding_quantity: u32,
    /// Long-window lots strictly larger than this go to bidding.
    pub bulk_bidding_quantity: u32,
    pub short_discount_percent: u32,
    pub medium_discount_percent: u32,
    pub long_discount_percent: u32,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            short_window_days: 3,
            medium_window_days: 7,
            short_bidding_quantity: 50,
            bulk_bidding_quantity: 100,
            short_discount_percent: 60,
            medium_discount_percent: 30,
            long_discount_percent: 15,
        }
    }
}

impl RecommendationPolicy {
    pub fn with_windows(mut self, short_window_days: i64, medium_window_days: i64) -> Self {
        self.short_window_days = short_window_days;
        self.medium_window_days = medium_window_days;
        self
    }

    pub fn with_short_bidding_quantity(mut self, quantity: u32) -> Self {
        self.short_bidding_quantity = quantity;
        self
    }

    pub fn with_bulk_bidding_quantity(mut self, quantity: u32) -> Self {
        self.bulk_bidding_quantity = quantity;
        self
    }

    pub fn with_discounts(mut self, short: u32, medium: u32, long: u32) -> Self {
        self.short_discount_percent = short;
        self.medium_discount_percent = medium;
        self.long_discount_percent = long;
        self
    }

    pub fn urgency(&self, days_left: i64) -> UrgencyLevel {
        if days_left <= 0 {
            UrgencyLevel::Critical
        } else if days_left <= self.short_window_days {
            UrgencyLevel::High
        } else if days_left <= self.medium_window_days {
            UrgencyLevel::Medium
        } else {
            UrgencyLevel::Low
        }
    }

    /// Evaluate the rule table for `input` as of `today`.
    pub fn evaluate(&self, input: &RecommendationInput, today: NaiveDate) -> Recommendation {
        let days = days_until_expiry(input.expiry_date, today);
        let urgency_level = self.urgency(days);
        let quantity = input.quantity;

        let (strategy, confidence, reasoning) = if days <= 0 {
            (
                Strategy::Dispose,
                DISPOSE_CONFIDENCE,
                "Item has expired and must be removed from sale and disposed of for safety."
                    .to_string(),
            )
        } else if days == 1 {
            (
                Strategy::Donation,
                DONATION_CONFIDENCE,
                format!(
                    "With only {} until expiry, donation is recommended to prevent food waste.",
                    day_count(days)
                ),
            )
        } else if days <= self.short_window_days {
            if quantity > self.short_bidding_quantity {
                (
                    Strategy::Bidding,
                    SHORT_BIDDING_CONFIDENCE,
                    format!(
                        "High quantity ({quantity}) with only {} until expiry; open for bidding to maximize recovery.",
                        day_count(days)
                    ),
                )
            } else {
                let pct = self.short_discount_percent;
                (
                    self.discounted(input.original_price, pct),
                    SHORT_DISCOUNT_CONFIDENCE,
                    format!(
                        "Aggressive {pct}% discount recommended to sell {quantity} units within {}.",
                        day_count(days)
                    ),
                )
            }
        } else if days <= self.medium_window_days {
            let pct = self.medium_discount_percent;
            (
                self.discounted(input.original_price, pct),
                MEDIUM_DISCOUNT_CONFIDENCE,
                format!(
                    "Moderate {pct}% discount to accelerate sales over the remaining {}.",
                    day_count(days)
                ),
            )
        } else if quantity > self.bulk_bidding_quantity {
            (
                Strategy::Bidding,
                BULK_BIDDING_CONFIDENCE,
                format!(
                    "Large inventory ({quantity} units) with {} until expiry; open for competitive bidding.",
                    day_count(days)
                ),
            )
        } else {
            let pct = self.long_discount_percent;
            (
                self.discounted(input.original_price, pct),
                LONG_DISCOUNT_CONFIDENCE,
                format!(
                    "Small {pct}% discount to move inventory steadily over the remaining {}.",
                    day_count(days)
                ),
            )
        };

        Recommendation {
            strategy,
            confidence,
            reasoning,
            urgency_level,
        }
    }

    fn discounted(&self, original_price: Money, discount_percent: u32) -> Strategy {
        Strategy::PriceReduction {
            suggested_price: original_price.percent(100u32.saturating_sub(discount_percent)),
        }
    }
}

fn day_count(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// Recommend a strategy with the canonical policy.
pub fn recommend(input: &RecommendationInput, today: NaiveDate) -> Recommendation {
    RecommendationPolicy::default().evaluate(input, today)
}

/// A source of recommendations.
///
/// The store only needs this seam; the rule table is the in-process
/// implementation, an external model could be another.
pub trait Recommender: Send + Sync {
    /// Must be deterministic for a given input and date, and must not panic.
    fn recommend(&self, input: &RecommendationInput, today: NaiveDate) -> Recommendation;
}

/// Recommender backed by a [`RecommendationPolicy`].
#[derive(Debug, Default, Copy, Clone)]
pub struct RuleBasedRecommender {
    policy: RecommendationPolicy,
}

impl RuleBasedRecommender {
    pub fn new(policy: RecommendationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RecommendationPolicy {
        &self.policy
    }
}

impl Recommender for RuleBasedRecommender {
    fn recommend(&self, input: &RecommendationInput, today: NaiveDate) -> Recommendation {
        self.policy.evaluate(input, today)
    }
}
