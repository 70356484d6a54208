//! Products

use std::fmt;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

/// Product identifier.
///
/// Identifiers are opaque to the engine and always compared as strings, so a
/// numeric backend id and its decimal string form refer to the same product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// A purchasable variant of a product (size, colour, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Variant<'a> {
    /// Variant label, e.g. "M / Black"
    pub label: String,

    /// Variant price
    pub price: Money<'a, Currency>,
}

impl<'a> Variant<'a> {
    /// Create a new variant.
    pub fn new(label: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            label: label.into(),
            price,
        }
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product variants, in catalog order
    pub variants: SmallVec<[Variant<'a>; 4]>,

    /// Currency used when the product has no priced variant
    pub currency: &'a Currency,
}

impl<'a> Product<'a> {
    /// Create a product without variants.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, currency: &'a Currency) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variants: SmallVec::new(),
            currency,
        }
    }

    /// Add a variant, returning the product.
    #[must_use]
    pub fn with_variant(mut self, variant: Variant<'a>) -> Self {
        self.variants.push(variant);
        self
    }

    /// Base price used for promotion pricing.
    ///
    /// This is the first variant's price, or zero when the product has no
    /// variants (i.e. the price has not been set).
    pub fn base_price(&self) -> Money<'a, Currency> {
        self.variants
            .first()
            .map_or_else(|| Money::from_minor(0, self.currency), |variant| variant.price)
    }
}
