//! Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use foodsaver_core::{BidId, BusinessId, ClaimId, ItemId, Money, UserId};
use foodsaver_inventory::{BidStatus, ClaimStatus, ItemStatus};

#[derive(Debug, Parser)]
#[command(name = "foodsaver")]
#[command(about = "Surplus food inventory with expiry-driven recommendations")]
#[command(version)]
pub struct Cli {
    /// Data file (overrides FOODSAVER_DATA_PATH)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a surplus item and get a recommendation for it
    Add(AddArgs),

    /// List items
    List {
        /// Only this business's items
        #[arg(long)]
        business: Option<BusinessId>,

        /// Only items open for bidding
        #[arg(long, conflicts_with = "donated")]
        bidding: bool,

        /// Only items offered as donations
        #[arg(long)]
        donated: bool,
    },

    /// Show one item
    Show { item: ItemId },

    /// Recompute an item's recommendation for today
    Recommend { item: ItemId },

    /// Act on an item's recommendation
    Apply { item: ItemId },

    /// Set an item's status (active, reduced, donated, bidding, sold)
    Status { item: ItemId, status: ItemStatus },

    /// Ask a new price for an item
    Price { item: ItemId, price: Money },

    /// Remove an item
    Delete { item: ItemId },

    /// Bid on an item
    Bid {
        item: ItemId,
        amount: Money,
        #[arg(long)]
        user: UserId,
        #[arg(long)]
        email: String,
    },

    /// List the bids on an item
    Bids { item: ItemId },

    /// Set a bid's status (accepted, rejected)
    BidStatus { bid: BidId, status: BidStatus },

    /// Accept a bid, reject the others and sell the item
    AcceptBid { bid: BidId },

    /// Claim part of a donated item
    Claim {
        item: ItemId,
        quantity: u32,
        #[arg(long)]
        user: UserId,
        #[arg(long)]
        email: String,
    },

    /// List the donation claims on an item
    Claims { item: ItemId },

    /// Set a claim's status (approved, collected)
    ClaimStatus { claim: ClaimId, status: ClaimStatus },

    /// A user's bids and claims, newest first
    History { user: UserId },

    /// Inventory analytics for a business
    Summary { business: BusinessId },

    /// Print the text of a plain-text stock sheet or invoice
    Extract { path: PathBuf },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub business: BusinessId,

    #[arg(long)]
    pub business_name: String,

    #[arg(long)]
    pub name: String,

    /// Display name, e.g. "Dairy" or "Meat & Seafood"
    #[arg(long, default_value = "Other")]
    pub category: String,

    #[arg(long)]
    pub quantity: u32,

    #[arg(long, default_value = "units")]
    pub unit: String,

    /// Price per unit, e.g. 4.99
    #[arg(long)]
    pub price: Money,

    /// YYYY-MM-DD
    #[arg(long)]
    pub expiry: NaiveDate,

    #[arg(long, default_value = "")]
    pub location: String,

    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}
