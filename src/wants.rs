//! Want Lists
//!
//! The items the buyer is trying to acquire. Free-text wishlist parsing is
//! the acquisition side's job; by the time a want list reaches the optimizer
//! it is an ordered, de-duplicated set of item identities.

use rustc_hash::FxHashSet;

use crate::offers::Offer;

/// An ordered, de-duplicated list of requested item identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WantList {
    items: Vec<String>,
}

impl WantList {
    /// Build a want list from item names, dropping repeats while preserving
    /// first-encountered order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut items = Vec::new();

        for name in names {
            let name = name.into();

            if seen.insert(name.clone()) {
                items.push(name);
            }
        }

        Self { items }
    }

    /// Build the want list covering every distinct item in an offer table.
    pub fn covering(offers: &[Offer]) -> Self {
        Self::from_names(offers.iter().map(Offer::item))
    }

    /// Whether the given item is wanted.
    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|wanted| wanted == item)
    }

    /// Iterate over the wanted item identities in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Number of wanted items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the want list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
