//! Purchase Plans
//!
//! The optimizer's output: which offer to buy from which seller, and the
//! total the buyer will pay including one shipping surcharge per used seller.

use rusty_money::{Money, iso::Currency};

/// One purchased offer in the final plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    seller: String,
    item: String,
    price: Money<'static, Currency>,
    reference: Option<String>,
}

impl Purchase {
    /// Create a purchase row.
    pub fn new(
        seller: impl Into<String>,
        item: impl Into<String>,
        price: Money<'static, Currency>,
        reference: Option<String>,
    ) -> Self {
        Self {
            seller: seller.into(),
            item: item.into(),
            price,
            reference,
        }
    }

    /// Seller to buy from.
    pub fn seller(&self) -> &str {
        &self.seller
    }

    /// Item being bought.
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Price paid for the item (excluding shipping).
    pub fn price(&self) -> &Money<'static, Currency> {
        &self.price
    }

    /// Opaque per-offer reference round-tripped from the source offer.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// A complete purchase plan over a want list.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchasePlan {
    purchases: Vec<Purchase>,
    sellers_used: usize,
    total: Money<'static, Currency>,
}

impl PurchasePlan {
    /// Create a plan from its purchases, the number of distinct sellers
    /// used, and the pre-computed total (item prices plus shipping).
    pub fn new(
        purchases: Vec<Purchase>,
        sellers_used: usize,
        total: Money<'static, Currency>,
    ) -> Self {
        Self {
            purchases,
            sellers_used,
            total,
        }
    }

    /// An empty plan costing nothing.
    pub fn empty(currency: &'static Currency) -> Self {
        Self {
            purchases: Vec::new(),
            sellers_used: 0,
            total: Money::from_minor(0, currency),
        }
    }

    /// The purchases in the plan.
    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    /// Iterate over the purchases.
    pub fn iter(&self) -> impl Iterator<Item = &Purchase> {
        self.purchases.iter()
    }

    /// Number of distinct sellers the plan buys from (each one adds a
    /// shipping surcharge).
    pub fn seller_count(&self) -> usize {
        self.sellers_used
    }

    /// Total cost: item prices plus one shipping surcharge per used seller.
    pub fn total(&self) -> &Money<'static, Currency> {
        &self.total
    }

    /// Whether the plan buys the given item at least once.
    pub fn covers(&self, item: &str) -> bool {
        self.purchases.iter().any(|purchase| purchase.item() == item)
    }

    /// Number of purchases in the plan.
    pub fn len(&self) -> usize {
        self.purchases.len()
    }

    /// Whether the plan contains no purchases.
    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty()
    }
}
