use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use foodsaver_ai::{Recommendation, RecommendationInput, Strategy, days_until_expiry};
use foodsaver_core::{BusinessId, DomainError, DomainResult, Entity, ItemId, Money, ValueObject};

/// Food category of an item.
///
/// Stored as its display name. Unrecognised names load as `Other` so older
/// records never fail to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Dairy,
    Bakery,
    Produce,
    MeatAndSeafood,
    Frozen,
    Beverages,
    Snacks,
    PreparedFoods,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Dairy,
        Category::Bakery,
        Category::Produce,
        Category::MeatAndSeafood,
        Category::Frozen,
        Category::Beverages,
        Category::Snacks,
        Category::PreparedFoods,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dairy => "Dairy",
            Category::Bakery => "Bakery",
            Category::Produce => "Produce",
            Category::MeatAndSeafood => "Meat & Seafood",
            Category::Frozen => "Frozen",
            Category::Beverages => "Beverages",
            Category::Snacks => "Snacks",
            Category::PreparedFoods => "Prepared Foods",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive lookup by display name; anything unknown is `Other`.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(Category::Other)
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Category::from_name(&name))
    }
}

/// Unit the quantity is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    Kg,
    Lbs,
    #[default]
    Units,
    Liters,
    Packs,
    Boxes,
    Cases,
}

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::Kg,
        Unit::Lbs,
        Unit::Units,
        Unit::Liters,
        Unit::Packs,
        Unit::Boxes,
        Unit::Cases,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Lbs => "lbs",
            Unit::Units => "units",
            Unit::Liters => "liters",
            Unit::Packs => "packs",
            Unit::Boxes => "boxes",
            Unit::Cases => "cases",
        }
    }

    /// Case-insensitive lookup; anything unknown counts as plain `units`.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Unit::from_name(&name))
    }
}

/// Latitude/longitude resolved from the free-text location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl ValueObject for Coordinates {}

/// Item status lifecycle.
///
/// ```text
/// active ──> reduced ──> bidding ──> sold
///   │           │           └──────> donated
///   │           ├──────────────────> sold / donated
///   └──────────────────────────────> bidding / sold / donated
/// ```
///
/// `sold` and `donated` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Active,
    Reduced,
    Donated,
    Bidding,
    Sold,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Reduced => "reduced",
            ItemStatus::Donated => "donated",
            ItemStatus::Bidding => "bidding",
            ItemStatus::Sold => "sold",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Sold | ItemStatus::Donated)
    }

    pub fn can_transition_to(&self, next: ItemStatus) -> bool {
        use ItemStatus::*;
        matches!(
            (*self, next),
            (Active, Reduced | Donated | Bidding | Sold)
                | (Reduced, Donated | Bidding | Sold)
                | (Bidding, Donated | Sold)
        )
    }

    /// Status an item moves to when the given strategy is applied.
    ///
    /// Disposal takes the item off the market, which the status set records as `sold`.
    pub fn for_strategy(strategy: &Strategy) -> ItemStatus {
        match strategy {
            Strategy::PriceReduction { .. } => ItemStatus::Reduced,
            Strategy::Donation => ItemStatus::Donated,
            Strategy::Bidding => ItemStatus::Bidding,
            Strategy::Dispose => ItemStatus::Sold,
        }
    }
}

impl core::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ItemStatus::Active),
            "reduced" => Ok(ItemStatus::Reduced),
            "donated" => Ok(ItemStatus::Donated),
            "bidding" => Ok(ItemStatus::Bidding),
            "sold" => Ok(ItemStatus::Sold),
            other => Err(DomainError::validation(format!(
                "unknown item status {other:?} (expected active, reduced, donated, bidding or sold)"
            ))),
        }
    }
}

/// Draft of an item, as submitted by a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub business_id: BusinessId,
    pub business_name: String,
    pub name: String,
    pub category: Category,
    pub quantity: u32,
    pub unit: Unit,
    pub original_price: Money,
    pub expiry_date: NaiveDate,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl NewInventoryItem {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if self.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if self.original_price.is_zero() {
            return Err(DomainError::validation("original price must be positive"));
        }
        Ok(())
    }

    pub fn recommendation_input(&self) -> RecommendationInput {
        RecommendationInput {
            original_price: self.original_price,
            quantity: self.quantity,
            expiry_date: self.expiry_date,
        }
    }
}

/// A surplus item registered by a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: ItemId,
    business_id: BusinessId,
    business_name: String,
    name: String,
    category: Category,
    quantity: u32,
    unit: Unit,
    original_price: Money,
    expiry_date: NaiveDate,
    location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coordinates: Option<Coordinates>,
    created_at: DateTime<Utc>,
    status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reduced_price: Option<Money>,
    #[serde(
        rename = "aiRecommendation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    recommendation: Option<Recommendation>,
}

impl InventoryItem {
    /// Build a new, active item from a validated draft.
    pub fn create(
        id: ItemId,
        draft: NewInventoryItem,
        created_at: DateTime<Utc>,
        recommendation: Option<Recommendation>,
    ) -> DomainResult<Self> {
        draft.validate()?;
        Ok(Self {
            id,
            business_id: draft.business_id,
            business_name: draft.business_name,
            name: draft.name.trim().to_string(),
            category: draft.category,
            quantity: draft.quantity,
            unit: draft.unit,
            original_price: draft.original_price,
            expiry_date: draft.expiry_date,
            location: draft.location,
            coordinates: draft.coordinates,
            created_at,
            status: ItemStatus::Active,
            reduced_price: None,
            recommendation,
        })
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn business_id(&self) -> BusinessId {
        self.business_id
    }

    pub fn business_name(&self) -> &str {
        &self.business_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn original_price(&self) -> Money {
        self.original_price
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn reduced_price(&self) -> Option<Money> {
        self.reduced_price
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendation.as_ref()
    }

    /// Price currently asked per unit.
    pub fn current_price(&self) -> Money {
        self.reduced_price.unwrap_or(self.original_price)
    }

    /// Stock value at the original price.
    pub fn stock_value(&self) -> Money {
        self.original_price.times(self.quantity)
    }

    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        days_until_expiry(self.expiry_date, today)
    }

    pub fn recommendation_input(&self) -> RecommendationInput {
        RecommendationInput {
            original_price: self.original_price,
            quantity: self.quantity,
            expiry_date: self.expiry_date,
        }
    }

    /// Move to `next`, enforcing the status state machine. Returns the previous status.
    pub fn transition_to(&mut self, next: ItemStatus) -> DomainResult<ItemStatus> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition("item", self.status, next));
        }
        let previous = self.status;
        self.status = next;
        Ok(previous)
    }

    /// Apply the attached recommendation: move to the strategy's status and,
    /// for a price reduction, start asking the suggested price.
    pub fn apply_recommendation(&mut self) -> DomainResult<Strategy> {
        let strategy = match &self.recommendation {
            Some(rec) => rec.strategy,
            None => {
                return Err(DomainError::validation(format!(
                    "item {} has no recommendation to apply",
                    self.id
                )));
            }
        };

        self.transition_to(ItemStatus::for_strategy(&strategy))?;
        if let Some(price) = strategy.suggested_price() {
            self.reduced_price = Some(price);
        }
        Ok(strategy)
    }

    /// Set the asked price. An active item becomes `reduced`; a reduced item
    /// keeps its status. Any other status rejects the change.
    pub fn set_reduced_price(&mut self, price: Money) -> DomainResult<()> {
        if price.is_zero() {
            return Err(DomainError::validation("price must be positive"));
        }
        if self.status != ItemStatus::Reduced {
            self.transition_to(ItemStatus::Reduced)?;
        }
        self.reduced_price = Some(price);
        Ok(())
    }

    pub fn replace_recommendation(&mut self, recommendation: Recommendation) {
        self.recommendation = Some(recommendation);
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
