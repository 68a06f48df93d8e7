//! Offer Index
//!
//! Dense integer identities for sellers and items. String identities are
//! irrelevant inside the optimizer; each run builds an index over the reduced
//! offer set, the model works purely on indices, and the decoder maps them
//! back. Indices follow first-encountered order so runs are reproducible.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::offers::Offer;

/// Errors raised when resolving indices back to identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    /// No seller is assigned to the given index.
    #[error("seller index {0} is out of range")]
    SellerNotFound(usize),

    /// No item is assigned to the given index.
    #[error("item index {0} is out of range")]
    ItemNotFound(usize),

    /// No offer row exists at the given position.
    #[error("offer row {0} is out of range")]
    OfferNotFound(usize),
}

/// An offer rewritten in terms of dense indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedOffer {
    /// Position of the source row in the indexed offer slice.
    pub source: usize,

    /// Dense index of the selling seller.
    pub seller: usize,

    /// Dense index of the offered item.
    pub item: usize,

    /// Listed price in minor units.
    pub price_minor: i64,
}

/// Bidirectional seller/item index over a reduced offer set.
///
/// Built fresh per optimization run and discarded after decoding.
#[derive(Debug)]
pub struct OfferIndex<'a> {
    offers: &'a [Offer],
    sellers: Vec<&'a str>,
    items: Vec<&'a str>,
    seller_ids: FxHashMap<&'a str, usize>,
    item_ids: FxHashMap<&'a str, usize>,
    rows: Vec<IndexedOffer>,
}

impl<'a> OfferIndex<'a> {
    /// Index the given offers, assigning zero-based seller and item indices
    /// in first-encountered order.
    pub fn new(offers: &'a [Offer]) -> Self {
        let mut sellers: Vec<&'a str> = Vec::new();
        let mut items: Vec<&'a str> = Vec::new();
        let mut seller_ids: FxHashMap<&'a str, usize> = FxHashMap::default();
        let mut item_ids: FxHashMap<&'a str, usize> = FxHashMap::default();
        let mut rows = Vec::with_capacity(offers.len());

        for (source, offer) in offers.iter().enumerate() {
            let seller = *seller_ids.entry(offer.seller()).or_insert_with(|| {
                sellers.push(offer.seller());
                sellers.len() - 1
            });

            let item = *item_ids.entry(offer.item()).or_insert_with(|| {
                items.push(offer.item());
                items.len() - 1
            });

            rows.push(IndexedOffer {
                source,
                seller,
                item,
                price_minor: offer.price().to_minor_units(),
            });
        }

        Self {
            offers,
            sellers,
            items,
            seller_ids,
            item_ids,
            rows,
        }
    }

    /// The indexed offer rows, in source order.
    pub fn rows(&self) -> &[IndexedOffer] {
        &self.rows
    }

    /// Resolve an offer row position back to its source offer.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OfferNotFound`] if the position is out of range.
    pub fn offer(&self, source: usize) -> Result<&'a Offer, IndexError> {
        self.offers
            .get(source)
            .ok_or(IndexError::OfferNotFound(source))
    }

    /// Resolve a seller index back to its identity.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::SellerNotFound`] if the index is out of range.
    pub fn seller_name(&self, seller: usize) -> Result<&'a str, IndexError> {
        self.sellers
            .get(seller)
            .copied()
            .ok_or(IndexError::SellerNotFound(seller))
    }

    /// Resolve an item index back to its identity.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ItemNotFound`] if the index is out of range.
    pub fn item_name(&self, item: usize) -> Result<&'a str, IndexError> {
        self.items
            .get(item)
            .copied()
            .ok_or(IndexError::ItemNotFound(item))
    }

    /// Look up a seller's index by identity.
    pub fn seller_index(&self, seller: &str) -> Option<usize> {
        self.seller_ids.get(seller).copied()
    }

    /// Look up an item's index by identity.
    pub fn item_index(&self, item: &str) -> Option<usize> {
        self.item_ids.get(item).copied()
    }

    /// Number of distinct sellers.
    pub fn seller_count(&self) -> usize {
        self.sellers.len()
    }

    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of offer rows.
    pub fn offer_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the index holds no offers.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
