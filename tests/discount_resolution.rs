//! Integration tests for best-offer discount resolution

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, VND},
};
use testresult::TestResult;

use storefront_promotions::prelude::*;

fn vnd(amount: i64) -> Money<'static, Currency> {
    Money::from_minor(amount, VND)
}

fn now() -> TestResult<Timestamp> {
    Ok("2025-03-08T09:30:00Z".parse()?)
}

fn march() -> TestResult<ActivityWindow> {
    Ok(ActivityWindow::new(
        "2025-03-01T00:00:00Z".parse()?,
        "2025-03-31T23:59:59Z".parse()?,
    ))
}

fn percent_off(id: &str, points: i64, scope: ProductScope) -> TestResult<Promotion<'static>> {
    Ok(Promotion::new(
        id,
        PromotionDiscount::percentage_points(Decimal::from(points))?,
        scope,
        march()?,
    ))
}

fn amount_off(id: &str, amount: i64, scope: ProductScope) -> TestResult<Promotion<'static>> {
    Ok(Promotion::new(
        id,
        PromotionDiscount::FixedAmount(vnd(amount)),
        scope,
        march()?,
    ))
}

fn only(ids: &[&str]) -> ProductScope {
    ProductScope::SpecificProducts(ids.iter().copied().collect())
}

#[test]
fn no_promotions_leave_every_price_untouched() -> TestResult {
    for price in [1, 99, 200_000, 12_345_678] {
        let result = calculate_product_discount(&"p1".into(), vnd(price), &[], now()?);

        assert_eq!(result.discounted_price, vnd(price));
        assert_eq!(result.discount_amount, vnd(0));
        assert_eq!(result.discount_percent, 0);
        assert!(result.applied_promotion.is_none());
    }

    Ok(())
}

#[test]
fn inactive_promotion_is_excluded_even_as_sole_candidate() -> TestResult {
    let promotions =
        [percent_off("off", 30, ProductScope::AllProducts)?.with_status(PromotionStatus::Inactive)];

    let result = calculate_product_discount(&"p1".into(), vnd(200_000), &promotions, now()?);

    assert!(result.applied_promotion.is_none());
    assert_eq!(result.discounted_price, vnd(200_000));

    Ok(())
}

#[test]
fn window_boundaries_are_inclusive() -> TestResult {
    let now = now()?;
    let tick = SignedDuration::from_nanos(1);

    let hour = SignedDuration::from_hours(1);
    let hour_ago = now.checked_sub(hour)?;
    let hour_ahead = now.checked_add(hour)?;

    let windows = [
        (ActivityWindow::new(now, hour_ahead), true),
        (ActivityWindow::new(hour_ago, now), true),
        (ActivityWindow::new(now.checked_add(tick)?, hour_ahead), false),
        (ActivityWindow::new(hour_ago, now.checked_sub(tick)?), false),
    ];

    for (window, applies) in windows {
        let mut promotion = percent_off("edge", 10, ProductScope::AllProducts)?;
        promotion.window = window;

        let promotions = [promotion];
        let result = calculate_product_discount(&"p1".into(), vnd(100_000), &promotions, now);

        assert_eq!(result.applied_promotion.is_some(), applies);
        assert_eq!(
            promotions
                .iter()
                .any(|promotion| is_promotion_active(promotion, now)),
            applies
        );
    }

    Ok(())
}

#[test]
fn specific_promotions_only_touch_their_products() -> TestResult {
    let promotions = [percent_off("shirts", 25, only(&["shirt-1", "shirt-2"]))?];

    let hat = calculate_product_discount(&"hat-1".into(), vnd(100_000), &promotions, now()?);
    let shirt = calculate_product_discount(&"shirt-2".into(), vnd(100_000), &promotions, now()?);

    assert_eq!(hat.discounted_price, vnd(100_000));
    assert!(hat.applied_promotion.is_none());
    assert_eq!(shirt.discounted_price, vnd(75_000));

    Ok(())
}

#[test]
fn best_offer_is_the_largest_absolute_discount() -> TestResult {
    let promotions = [
        percent_off("ten-percent", 10, ProductScope::AllProducts)?,
        amount_off("fifteen-k", 15_000, ProductScope::AllProducts)?,
    ];

    let result = calculate_product_discount(&"p1".into(), vnd(200_000), &promotions, now()?);

    assert_eq!(result.discounted_price, vnd(180_000));
    assert_eq!(result.discount_amount, vnd(20_000));
    assert_eq!(result.discount_percent, 10);
    assert_eq!(
        result.applied_promotion.map(|promotion| promotion.id.as_str()),
        Some("ten-percent")
    );

    // On a cheaper product the fixed amount is worth more.
    let result = calculate_product_discount(&"p1".into(), vnd(100_000), &promotions, now()?);

    assert_eq!(result.discounted_price, vnd(85_000));
    assert_eq!(result.discount_percent, 15);
    assert_eq!(
        result.applied_promotion.map(|promotion| promotion.id.as_str()),
        Some("fifteen-k")
    );

    Ok(())
}

#[test]
fn oversized_discounts_are_clamped() -> TestResult {
    let promotions = [amount_off("clearance", 500_000, ProductScope::AllProducts)?];

    let result = calculate_product_discount(&"p1".into(), vnd(100_000), &promotions, now()?);

    assert_eq!(result.discounted_price, vnd(0));
    assert_eq!(result.discount_amount, vnd(100_000));
    assert_eq!(result.discount_percent, 100);

    Ok(())
}

#[test]
fn all_products_promotions_apply_to_unlisted_products() -> TestResult {
    let promotions = [
        percent_off("site-wide", 5, ProductScope::AllProducts)?,
        percent_off("listed", 1, only(&["listed"]))?,
    ];

    for id in ["listed", "never-listed", "999"] {
        let result = calculate_product_discount(&id.into(), vnd(200_000), &promotions, now()?);

        assert_eq!(result.discounted_price, vnd(190_000));
        assert_eq!(
            result.applied_promotion.map(|promotion| promotion.id.as_str()),
            Some("site-wide")
        );
    }

    Ok(())
}

#[test]
fn identical_calls_give_identical_results() -> TestResult {
    let promotions = [
        percent_off("a", 12, ProductScope::AllProducts)?,
        amount_off("b", 23_000, only(&["p1"]))?,
    ];

    let now = now()?;
    let first = calculate_product_discount(&"p1".into(), vnd(199_000), &promotions, now);
    let second = calculate_product_discount(&"p1".into(), vnd(199_000), &promotions, now);

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn batch_pricing_matches_single_pricing() -> TestResult {
    let products = [
        Product::new("p1", "Shirt", VND).with_variant(Variant::new("M", vnd(200_000))),
        Product::new("p2", "Hat", VND).with_variant(Variant::new("One size", vnd(90_000))),
        Product::new("p3", "Gift card", VND),
    ];

    let promotions = [
        percent_off("a", 10, ProductScope::AllProducts)?,
        amount_off("b", 15_000, only(&["p2"]))?,
    ];

    let now = now()?;
    let priced = apply_promotions_to_products(&products, &promotions, now);

    assert_eq!(priced.len(), products.len());

    for (row, product) in priced.iter().zip(&products) {
        let single = calculate_product_discount(&product.id, product.base_price(), &promotions, now);

        assert_eq!(row.pricing, single);
        assert_eq!(row.has_discount, single.discount_amount.to_minor_units() > 0);
    }

    Ok(())
}

#[test]
fn filter_active_promotions_keeps_input_order() -> TestResult {
    let promotions = [
        amount_off("one", 1_000, ProductScope::AllProducts)?,
        amount_off("two", 1_000, ProductScope::AllProducts)?.with_status(PromotionStatus::Inactive),
        amount_off("three", 1_000, ProductScope::AllProducts)?,
    ];

    let ids: Vec<&str> = filter_active_promotions(&promotions, now()?)
        .into_iter()
        .map(|promotion| promotion.id.as_str())
        .collect();

    assert_eq!(ids, ["one", "three"]);

    Ok(())
}
