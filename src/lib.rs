//! Wantlist
//!
//! Wantlist is a purchase-plan optimizer for marketplace shopping: given a
//! table of (seller, item, price) offers and a list of wanted items, it finds
//! the cheapest way to buy every wanted item at least once when each used
//! seller charges a flat shipping surcharge.
//!
//! The pipeline is [`normalize`] → [`index`] → [`solvers::milp`] → a decoded
//! [`plan::PurchasePlan`], orchestrated by [`planner::Planner`].

pub mod config;
pub mod index;
pub mod normalize;
pub mod offers;
pub mod plan;
pub mod planner;
pub mod prices;
pub mod report;
pub mod solvers;
pub mod wants;
