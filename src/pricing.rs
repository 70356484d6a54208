//! Pricing
//!
//! Applies promotions across a list of products.

use jiff::Timestamp;
use tracing::Span;

use crate::{
    discounts::{DiscountResult, calculate_product_discount},
    products::Product,
    promotions::Promotion,
};

/// A product together with its promotional price.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedProduct<'p, 'a> {
    /// The priced product
    pub product: &'p Product<'a>,

    /// Discount resolved for the product's base price
    pub pricing: DiscountResult<'p, 'a>,

    /// Whether a non-zero discount applied
    pub has_discount: bool,
}

/// Price every product against the same set of promotions.
///
/// Each product is priced from its [`Product::base_price`] exactly as
/// [`calculate_product_discount`] would price it, evaluated at the single
/// instant `now`.
#[tracing::instrument(
    name = "promotions.pricing.apply_promotions_to_products",
    skip_all,
    fields(
        product_count = products.len(),
        promotion_count = promotions.len(),
        discounted_count = tracing::field::Empty
    )
)]
pub fn apply_promotions_to_products<'p, 'a>(
    products: &'p [Product<'a>],
    promotions: &'p [Promotion<'a>],
    now: Timestamp,
) -> Vec<PricedProduct<'p, 'a>> {
    let priced: Vec<PricedProduct<'p, 'a>> = products
        .iter()
        .map(|product| {
            let pricing =
                calculate_product_discount(&product.id, product.base_price(), promotions, now);
            let has_discount = pricing.has_discount();

            PricedProduct {
                product,
                pricing,
                has_discount,
            }
        })
        .collect();

    let discounted_count = priced.iter().filter(|priced| priced.has_discount).count();

    Span::current().record("discounted_count", discounted_count);

    priced
}
