//! Offers
//!
//! The offer table is the boundary with the acquisition side (wishlist
//! parsing and marketplace scraping live elsewhere). [`RawOffer`] is the
//! as-scraped row with the price still as text; [`Offer`] is the parsed row
//! the optimizer works with.

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prices::{PriceError, parse_price};

/// Errors raised while parsing raw offer rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OfferError {
    /// A row's seller or item identity was blank.
    #[error("offer row {row}: blank {field} identity")]
    BlankIdentity {
        /// Zero-based index of the offending row.
        row: usize,

        /// Which identity field was blank (`"seller"` or `"item"`).
        field: &'static str,
    },

    /// A row's price text could not be coerced into a monetary amount.
    #[error("offer row {row}: {source}")]
    MalformedPrice {
        /// Zero-based index of the offending row.
        row: usize,

        /// The underlying price coercion failure.
        #[source]
        source: PriceError,
    },
}

/// How to treat rows that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedOfferPolicy {
    /// Abort ingestion on the first malformed row.
    Abort,

    /// Drop malformed rows and keep going.
    Skip,
}

/// An as-scraped offer row with the price still as unparsed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOffer {
    /// Seller identity as listed on the marketplace.
    pub seller: String,

    /// Item identity as listed on the marketplace.
    pub item: String,

    /// Locale-formatted price text, e.g. `"1,10 €"`.
    pub price: String,

    /// Opaque per-offer reference (e.g. a seller contact link), carried
    /// through to the purchase plan untouched.
    pub reference: Option<String>,
}

impl RawOffer {
    /// Create a raw offer row without a reference.
    pub fn new(
        seller: impl Into<String>,
        item: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            seller: seller.into(),
            item: item.into(),
            price: price.into(),
            reference: None,
        }
    }
}

/// One seller's parsed listing for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    seller: String,
    item: String,
    price: Money<'static, Currency>,
    reference: Option<String>,
}

impl Offer {
    /// Create a new offer.
    pub fn new(
        seller: impl Into<String>,
        item: impl Into<String>,
        price: Money<'static, Currency>,
    ) -> Self {
        Self {
            seller: seller.into(),
            item: item.into(),
            price,
            reference: None,
        }
    }

    /// Create a new offer carrying an opaque per-offer reference.
    pub fn with_reference(
        seller: impl Into<String>,
        item: impl Into<String>,
        price: Money<'static, Currency>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            seller: seller.into(),
            item: item.into(),
            price,
            reference: Some(reference.into()),
        }
    }

    /// Seller identity.
    pub fn seller(&self) -> &str {
        &self.seller
    }

    /// Item identity.
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Listed price.
    pub fn price(&self) -> &Money<'static, Currency> {
        &self.price
    }

    /// Opaque per-offer reference, if the row carried one.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// Parse raw offer rows into [`Offer`]s in the given currency.
///
/// Row order is preserved. Under [`MalformedOfferPolicy::Skip`] rows that
/// fail to parse are dropped; under [`MalformedOfferPolicy::Abort`] the first
/// failure ends ingestion, identifying the offending row.
///
/// # Errors
///
/// Returns an [`OfferError`] for a blank identity or malformed price under
/// the `Abort` policy.
pub fn parse_offers(
    rows: &[RawOffer],
    currency: &'static Currency,
    policy: MalformedOfferPolicy,
) -> Result<Vec<Offer>, OfferError> {
    let mut offers = Vec::with_capacity(rows.len());

    for (row, raw) in rows.iter().enumerate() {
        match parse_row(row, raw, currency) {
            Ok(offer) => offers.push(offer),
            Err(_err) if policy == MalformedOfferPolicy::Skip => {}
            Err(err) => return Err(err),
        }
    }

    Ok(offers)
}

fn parse_row(
    row: usize,
    raw: &RawOffer,
    currency: &'static Currency,
) -> Result<Offer, OfferError> {
    if raw.seller.trim().is_empty() {
        return Err(OfferError::BlankIdentity {
            row,
            field: "seller",
        });
    }

    if raw.item.trim().is_empty() {
        return Err(OfferError::BlankIdentity { row, field: "item" });
    }

    let price =
        parse_price(&raw.price, currency).map_err(|source| OfferError::MalformedPrice {
            row,
            source,
        })?;

    Ok(Offer {
        seller: raw.seller.clone(),
        item: raw.item.clone(),
        price,
        reference: raw.reference.clone(),
    })
}
