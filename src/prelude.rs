//! Storefront promotions prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, CatalogError, currency_from_code},
    discounts::{DiscountResult, calculate_product_discount},
    price_list::{PriceList, PriceListError, format_percent_badge, format_price},
    pricing::{PricedProduct, apply_promotions_to_products},
    products::{Product, ProductId, Variant},
    records::{
        LegacyProductRef, ProductRecord, PromotionRecord, RecordError, normalize_products,
        normalize_promotions,
    },
};

pub use crate::promotions::prelude::*;
