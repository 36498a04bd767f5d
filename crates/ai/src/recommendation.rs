use serde::{Deserialize, Serialize};

use foodsaver_core::{Money, ValueObject};

/// Recommended disposition for a surplus item.
///
/// The suggested price lives inside `PriceReduction`, so "a price is present
/// exactly when the strategy is a price reduction" holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    #[serde(rename_all = "camelCase")]
    PriceReduction { suggested_price: Money },
    Donation,
    Bidding,
    Dispose,
}

impl Strategy {
    /// Stable wire name (`price_reduction`, `donation`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::PriceReduction { .. } => "price_reduction",
            Strategy::Donation => "donation",
            Strategy::Bidding => "bidding",
            Strategy::Dispose => "dispose",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::PriceReduction { .. } => "Price Reduction",
            Strategy::Donation => "Donation",
            Strategy::Bidding => "Open Bidding",
            Strategy::Dispose => "Dispose",
        }
    }

    pub fn suggested_price(&self) -> Option<Money> {
        match self {
            Strategy::PriceReduction { suggested_price } => Some(*suggested_price),
            _ => None,
        }
    }
}

impl core::fmt::Display for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse time-to-expiry severity, used for prioritisation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl UrgencyLevel {
    pub const ALL: [UrgencyLevel; 4] = [
        UrgencyLevel::Critical,
        UrgencyLevel::High,
        UrgencyLevel::Medium,
        UrgencyLevel::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
            UrgencyLevel::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "Low",
            UrgencyLevel::Medium => "Medium",
            UrgencyLevel::High => "High",
            UrgencyLevel::Critical => "Critical",
        }
    }
}

impl core::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the recommendation engine.
///
/// Computed, never persisted on its own: it is attached to exactly one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(flatten)]
    pub strategy: Strategy,

    /// Confidence in \[0, 1\].
    pub confidence: f64,

    /// Templated, deterministic justification.
    pub reasoning: String,

    pub urgency_level: UrgencyLevel,
}

impl Recommendation {
    pub fn suggested_price(&self) -> Option<Money> {
        self.strategy.suggested_price()
    }
}

impl ValueObject for Recommendation {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_reduction_serializes_flat_with_suggested_price() {
        let rec = Recommendation {
            strategy: Strategy::PriceReduction {
                suggested_price: Money::from_cents(700),
            },
            confidence: 0.82,
            reasoning: "Moderate 30% discount".to_string(),
            urgency_level: UrgencyLevel::Medium,
        };

        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            value,
            json!({
                "strategy": "price_reduction",
                "suggestedPrice": 7.0,
                "confidence": 0.82,
                "reasoning": "Moderate 30% discount",
                "urgencyLevel": "medium",
            })
        );

        let back: Recommendation = serde_json::from_value(value).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn non_price_strategies_carry_no_price_field() {
        let rec = Recommendation {
            strategy: Strategy::Dispose,
            confidence: 1.0,
            reasoning: "expired".to_string(),
            urgency_level: UrgencyLevel::Critical,
        };
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["strategy"], "dispose");
        assert!(value.get("suggestedPrice").is_none());
        assert_eq!(rec.suggested_price(), None);
    }

    #[test]
    fn labels_match_display_names() {
        assert_eq!(Strategy::Bidding.label(), "Open Bidding");
        assert_eq!(
            Strategy::PriceReduction {
                suggested_price: Money::ZERO
            }
            .label(),
            "Price Reduction"
        );
        assert_eq!(UrgencyLevel::Critical.label(), "Critical");
    }
}
