//! Normalization
//!
//! Canonicalizes a raw offer table into the smallest offer set that provably
//! preserves the optimum: one cheapest row per (seller, item) pair, and at
//! most one single-item seller per item.

use rustc_hash::FxHashMap;

use crate::offers::Offer;

/// Keep the cheapest offer per (seller, item) pair.
///
/// A rational buyer never pays more than a seller's cheapest listing for the
/// same item, so duplicate listings collapse to their minimum price. Pairs
/// keep first-encountered order; ties keep the earlier row. The result has no
/// two rows sharing a (seller, item) key, and running this again is a no-op.
pub fn normalize(offers: &[Offer]) -> Vec<Offer> {
    let mut order: Vec<(&str, &str)> = Vec::new();
    let mut cheapest: FxHashMap<(&str, &str), &Offer> = FxHashMap::default();

    for offer in offers {
        let key = (offer.seller(), offer.item());

        match cheapest.get_mut(&key) {
            Some(existing) => {
                if offer.price().to_minor_units() < existing.price().to_minor_units() {
                    *existing = offer;
                }
            }
            None => {
                order.push(key);
                cheapest.insert(key, offer);
            }
        }
    }

    order
        .iter()
        .filter_map(|key| cheapest.get(key).copied().cloned())
        .collect()
}

/// Prune dominated single-item sellers from a normalized offer set.
///
/// Sellers are classified after deduplication: multi-item sellers (two or
/// more distinct items) keep every row; single-item sellers are collapsed per
/// item to the cheapest one. Any single-item seller contributes exactly one
/// shipping charge regardless of which is chosen for that item, so only the
/// cheapest such seller can appear in an optimal solution; the rest are
/// dominated and removing them does not change the optimum. Multi-item rows
/// come first, then the surviving single-item rows in item order; ties keep
/// the earlier seller.
pub fn reduce(normalized: &[Offer]) -> Vec<Offer> {
    let mut items_per_seller: FxHashMap<&str, usize> = FxHashMap::default();

    // `normalized` has one row per (seller, item), so rows count distinct items.
    for offer in normalized {
        *items_per_seller.entry(offer.seller()).or_insert(0) += 1;
    }

    let is_multi = |offer: &Offer| items_per_seller.get(offer.seller()).is_some_and(|n| *n > 1);

    let mut reduced: Vec<Offer> = normalized
        .iter()
        .filter(|offer| is_multi(offer))
        .cloned()
        .collect();

    let mut item_order: Vec<&str> = Vec::new();
    let mut cheapest_single: FxHashMap<&str, &Offer> = FxHashMap::default();

    for offer in normalized.iter().filter(|offer| !is_multi(offer)) {
        match cheapest_single.get_mut(offer.item()) {
            Some(existing) => {
                if offer.price().to_minor_units() < existing.price().to_minor_units() {
                    *existing = offer;
                }
            }
            None => {
                item_order.push(offer.item());
                cheapest_single.insert(offer.item(), offer);
            }
        }
    }

    reduced.extend(
        item_order
            .iter()
            .filter_map(|item| cheapest_single.get(item).copied().cloned()),
    );

    reduced
}

/// Full normalization pass: dedup per (seller, item), then prune dominated
/// single-item sellers.
pub fn prepare(offers: &[Offer]) -> Vec<Offer> {
    reduce(&normalize(offers))
}
