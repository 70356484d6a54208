//! Discounts
//!
//! Resolves the best applicable promotion for a single product and computes
//! the resulting price.

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    products::ProductId,
    promotions::{Promotion, activity::is_promotion_active},
};

/// Outcome of resolving promotions for one product.
///
/// Prices and amounts are whole minor units of the original price's currency.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountResult<'p, 'a> {
    /// Price before any promotion
    pub original_price: Money<'a, Currency>,

    /// Price after the winning promotion, never negative
    pub discounted_price: Money<'a, Currency>,

    /// Discount re-expressed as a whole percentage of the original price.
    ///
    /// This is always derived from the amount, so for fixed amount
    /// promotions it is not the stored discount value.
    pub discount_percent: u32,

    /// Amount subtracted from the original price
    pub discount_amount: Money<'a, Currency>,

    /// The winning promotion, if any applied
    pub applied_promotion: Option<&'p Promotion<'a>>,
}

impl<'a> DiscountResult<'_, 'a> {
    /// A result where no promotion applied.
    pub fn no_discount(original_price: Money<'a, Currency>) -> Self {
        Self {
            original_price,
            discounted_price: original_price,
            discount_percent: 0,
            discount_amount: Money::from_minor(0, original_price.currency()),
            applied_promotion: None,
        }
    }

    /// Return whether a non-zero discount was applied.
    pub fn has_discount(&self) -> bool {
        self.discount_amount.to_minor_units() > 0
    }
}

/// Calculate the best discount for a product.
///
/// Only promotions that are active at `now` and target `product_id` are
/// considered. The promotion yielding the largest absolute discount wins, the
/// first one in input order on a tie. The discount is clamped to the original
/// price, and non-positive prices are never discounted.
///
/// This never fails: anything that cannot be priced results in no discount.
pub fn calculate_product_discount<'p, 'a>(
    product_id: &ProductId,
    original_price: Money<'a, Currency>,
    promotions: &'p [Promotion<'a>],
    now: Timestamp,
) -> DiscountResult<'p, 'a> {
    if promotions.is_empty() {
        return DiscountResult::no_discount(original_price);
    }

    let original_minor = original_price.to_minor_units();

    if original_minor <= 0 {
        return DiscountResult::no_discount(original_price);
    }

    let original = Decimal::from(original_minor);

    let Some((promotion, candidate)) = best_offer(
        product_id,
        original,
        original_price.currency(),
        promotions,
        now,
    ) else {
        return DiscountResult::no_discount(original_price);
    };

    let Some(applied) = apply_amount(original, candidate) else {
        debug!(
            product_id = %product_id,
            promotion_id = %promotion.id,
            "discount could not be represented, skipping"
        );

        return DiscountResult::no_discount(original_price);
    };

    debug!(
        product_id = %product_id,
        promotion_id = %promotion.id,
        discount_minor = applied.amount,
        "applied promotion"
    );

    let currency = original_price.currency();

    DiscountResult {
        original_price,
        discounted_price: Money::from_minor(applied.discounted, currency),
        discount_percent: applied.percent,
        discount_amount: Money::from_minor(applied.amount, currency),
        applied_promotion: Some(promotion),
    }
}

/// Pick the applicable promotion with the largest candidate discount.
fn best_offer<'p, 'a>(
    product_id: &ProductId,
    original: Decimal,
    currency: &Currency,
    promotions: &'p [Promotion<'a>],
    now: Timestamp,
) -> Option<(&'p Promotion<'a>, Decimal)> {
    promotions
        .iter()
        .filter(|promotion| is_promotion_active(promotion, now) && promotion.targets(product_id))
        .filter(|promotion| {
            promotion
                .discount
                .currency()
                .is_none_or(|discount_currency| discount_currency == currency)
        })
        .filter_map(|promotion| {
            promotion
                .discount
                .amount_on(original)
                .map(|amount| (promotion, amount))
        })
        .fold(None, |best, (promotion, amount)| match best {
            Some((_, best_amount)) if amount <= best_amount => best,
            _ => Some((promotion, amount)),
        })
}

/// Rounded outcome of applying a candidate discount.
#[derive(Debug)]
struct AppliedAmount {
    discounted: i64,
    amount: i64,
    percent: u32,
}

/// Clamp a candidate discount to `[0, original]` and round the outputs.
fn apply_amount(original: Decimal, candidate: Decimal) -> Option<AppliedAmount> {
    let clamped = candidate.clamp(Decimal::ZERO, original);

    let discounted = round_whole(original.checked_sub(clamped)?)
        .to_i64()?
        .max(0);

    let amount = round_whole(clamped).to_i64()?;

    let percent = round_whole(
        clamped
            .checked_div(original)?
            .checked_mul(Decimal::ONE_HUNDRED)?,
    )
    .to_u32()?;

    Some(AppliedAmount {
        discounted,
        amount,
        percent,
    })
}

/// Round to a whole number, half away from zero.
pub(crate) fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
