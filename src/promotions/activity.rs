//! Promotion Activity

use jiff::Timestamp;

use crate::promotions::{Promotion, PromotionStatus};

/// Return whether a promotion is active at `now`.
///
/// A promotion is active when its status is [`PromotionStatus::Active`] and
/// `now` falls inside its window, bounds included. Malformed windows are
/// never active.
pub fn is_promotion_active(promotion: &Promotion<'_>, now: Timestamp) -> bool {
    promotion.status == PromotionStatus::Active && promotion.window.contains(now)
}

/// Return the promotions active at `now`, preserving their order.
pub fn filter_active_promotions<'p, 'a>(
    promotions: &'p [Promotion<'a>],
    now: Timestamp,
) -> Vec<&'p Promotion<'a>> {
    promotions
        .iter()
        .filter(|promotion| is_promotion_active(promotion, now))
        .collect()
}
