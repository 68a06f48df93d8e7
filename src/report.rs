//! Reports
//!
//! Rendering of a purchase plan into the table handed to the reporting side:
//! one row per purchased offer plus the derived total. Offer-table
//! statistics (price quantiles, seller summaries) live with the reporting
//! collaborator, not here.

use tabled::{Table, Tabled, settings::Style};

use crate::plan::{Purchase, PurchasePlan};

/// One renderable row of the purchase table.
#[derive(Debug, Tabled)]
struct PlanRow {
    /// Seller to order from.
    #[tabled(rename = "Seller")]
    seller: String,

    /// Item to put in that seller's basket.
    #[tabled(rename = "Item")]
    item: String,

    /// Item price, excluding shipping.
    #[tabled(rename = "Price")]
    price: String,

    /// Round-tripped per-offer reference.
    #[tabled(rename = "Reference")]
    reference: String,
}

impl From<&Purchase> for PlanRow {
    fn from(purchase: &Purchase) -> Self {
        Self {
            seller: purchase.seller().to_string(),
            item: purchase.item().to_string(),
            price: purchase.price().to_string(),
            reference: purchase.reference().unwrap_or("-").to_string(),
        }
    }
}

/// Render a purchase plan as a text table with the derived total.
pub fn plan_table(plan: &PurchasePlan) -> String {
    let mut table = Table::new(plan.iter().map(PlanRow::from));
    table.with(Style::psql());

    format!(
        "{table}\n{} sellers, total {}",
        plan.seller_count(),
        plan.total()
    )
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::EUR};

    use super::*;

    #[test]
    fn table_lists_each_purchase_and_the_total() {
        let purchases = vec![
            Purchase::new("S1", "Card A", Money::from_minor(100, EUR), None),
            Purchase::new(
                "S1",
                "Card B",
                Money::from_minor(100, EUR),
                Some("/sellers/s1".to_string()),
            ),
        ];
        let plan = PurchasePlan::new(purchases, 1, Money::from_minor(310, EUR));

        let rendered = plan_table(&plan);

        assert!(rendered.contains("Card A"), "missing row: {rendered}");
        assert!(rendered.contains("/sellers/s1"), "missing ref: {rendered}");
        assert!(rendered.contains("1 sellers"), "missing total: {rendered}");
    }

    #[test]
    fn missing_references_render_as_a_dash() {
        let purchases = vec![Purchase::new(
            "S1",
            "Card A",
            Money::from_minor(100, EUR),
            None,
        )];
        let plan = PurchasePlan::new(purchases, 1, Money::from_minor(210, EUR));

        let rendered = plan_table(&plan);

        assert!(rendered.contains('-'), "missing placeholder: {rendered}");
    }
}
