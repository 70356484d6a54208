//! Shared helpers for unit tests.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::VND};
use testresult::TestResult;

use crate::promotions::{ActivityWindow, ProductScope, Promotion, PromotionDiscount};

/// The evaluation instant used throughout the unit tests.
pub(crate) fn now() -> TestResult<Timestamp> {
    Ok("2025-01-15T12:00:00Z".parse()?)
}

/// A window covering all of January 2025.
pub(crate) fn january() -> TestResult<ActivityWindow> {
    Ok(ActivityWindow::new(
        "2025-01-01T00:00:00Z".parse()?,
        "2025-01-31T23:59:59Z".parse()?,
    ))
}

/// An active percentage promotion running through January.
pub(crate) fn percent_off(
    id: &str,
    points: i64,
    scope: ProductScope,
) -> TestResult<Promotion<'static>> {
    Ok(Promotion::new(
        id,
        PromotionDiscount::percentage_points(Decimal::from(points))?,
        scope,
        january()?,
    ))
}

/// An active fixed amount promotion running through January.
pub(crate) fn amount_off(
    id: &str,
    amount: i64,
    scope: ProductScope,
) -> TestResult<Promotion<'static>> {
    Ok(Promotion::new(
        id,
        PromotionDiscount::FixedAmount(Money::from_minor(amount, VND)),
        scope,
        january()?,
    ))
}
