//! Promotion prelude.
//!
//! Use this when building promotions by hand rather than from backend records.

pub use crate::promotions::{
    ActivityWindow, ProductScope, ProductTargets, Promotion, PromotionDiscount, PromotionId,
    PromotionStatus,
    activity::{filter_active_promotions, is_promotion_active},
};
