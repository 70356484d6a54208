//! Promotions
//!
//! Canonical promotion campaigns as consumed by the discount engine. Backend
//! records are normalised into these types by [`crate::records`] before they
//! reach the engine.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::products::ProductId;

pub mod activity;
pub mod prelude;
pub mod window;

pub use window::ActivityWindow;

/// Promotion identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromotionId(String);

impl PromotionId {
    /// Create a new promotion identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PromotionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PromotionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lifecycle status of a promotion.
///
/// Only `Active` promotions ever apply, regardless of their window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromotionStatus {
    /// The campaign is switched on
    Active,

    /// The campaign is switched off
    #[default]
    Inactive,
}

/// Discount granted by a promotion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromotionDiscount<'a> {
    /// Percentage of the product price (e.g. "10% off").
    ///
    /// The stored value is not clamped; anything over 100% is limited by
    /// the engine clamping the discount to the original price.
    Percentage(Percentage),

    /// Fixed amount off the product price (e.g. "15,000₫ off").
    FixedAmount(Money<'a, Currency>),
}

/// A percentage discount value that cannot be represented.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("discount value {0} cannot be represented as a percentage")]
pub struct InvalidPercentage(pub Decimal);

impl PromotionDiscount<'_> {
    /// Create a percentage discount from percentage points (`10` is "10% off").
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPercentage`] if the value cannot be represented.
    pub fn percentage_points(points: Decimal) -> Result<Self, InvalidPercentage> {
        let fraction = points
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or(InvalidPercentage(points))?
            .normalize();

        Percentage::try_from(fraction.to_string().as_str())
            .map(Self::Percentage)
            .map_err(|_err| InvalidPercentage(points))
    }

    /// Currency of a fixed amount discount; percentages have none.
    pub fn currency(&self) -> Option<&Currency> {
        match self {
            Self::Percentage(_) => None,
            Self::FixedAmount(amount) => Some(amount.currency()),
        }
    }

    /// Candidate discount, in minor units, for a price in minor units.
    ///
    /// Returns `None` if the calculation overflows.
    pub fn amount_on(&self, original_minor: Decimal) -> Option<Decimal> {
        match self {
            // decimal_percentage doesn't expose the underlying Decimal
            Self::Percentage(percent) => (*percent * Decimal::ONE).checked_mul(original_minor),
            Self::FixedAmount(amount) => Some(Decimal::from(amount.to_minor_units())),
        }
    }
}

/// Explicit list of products targeted by a promotion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductTargets {
    ids: SmallVec<[ProductId; 8]>,
}

impl ProductTargets {
    /// Targets with no products.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Return whether the product is targeted.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.ids.contains(product_id)
    }

    /// Number of targeted products.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Return whether no product is targeted.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over the targeted product ids in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProductId> {
        self.ids.iter()
    }
}

impl<'t> IntoIterator for &'t ProductTargets {
    type Item = &'t ProductId;
    type IntoIter = std::slice::Iter<'t, ProductId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl<I: Into<ProductId>> FromIterator<I> for ProductTargets {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Which products a promotion applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductScope {
    /// Every product in the catalog
    AllProducts,

    /// Only the listed products
    SpecificProducts(ProductTargets),
}

impl ProductScope {
    /// Return whether the scope covers the product.
    pub fn targets(&self, product_id: &ProductId) -> bool {
        match self {
            Self::AllProducts => true,
            Self::SpecificProducts(targets) => targets.contains(product_id),
        }
    }
}

/// A promotion campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion<'a> {
    /// Promotion identifier
    pub id: PromotionId,

    /// Display name
    pub name: String,

    /// Discount granted when the promotion applies
    pub discount: PromotionDiscount<'a>,

    /// Products the promotion applies to
    pub scope: ProductScope,

    /// Validity window
    pub window: ActivityWindow,

    /// Lifecycle status
    pub status: PromotionStatus,
}

impl<'a> Promotion<'a> {
    /// Create a new active promotion.
    pub fn new(
        id: impl Into<PromotionId>,
        discount: PromotionDiscount<'a>,
        scope: ProductScope,
        window: ActivityWindow,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            discount,
            scope,
            window,
            status: PromotionStatus::Active,
        }
    }

    /// Set the display name, returning the promotion.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the status, returning the promotion.
    #[must_use]
    pub fn with_status(mut self, status: PromotionStatus) -> Self {
        self.status = status;
        self
    }

    /// Return whether the promotion applies to the given product.
    ///
    /// This only checks targeting, not status or window.
    pub fn targets(&self, product_id: &ProductId) -> bool {
        self.scope.targets(product_id)
    }
}
