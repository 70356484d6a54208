//! Storefront Promotions
//!
//! Promotion and discount resolution for a storefront catalog: decides which
//! campaigns apply to a product, picks the single best offer and computes the
//! discounted price with a display percentage.
//!
//! The engine ([`discounts`], [`pricing`], [`promotions::activity`]) is pure
//! and synchronous. Every entry point takes the evaluation instant explicitly,
//! so all promotions in one evaluation are judged against the same `now`.

pub mod catalog;
pub mod discounts;
pub mod prelude;
pub mod price_list;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod records;

#[cfg(test)]
mod test_support;
