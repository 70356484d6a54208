//! Backend Records
//!
//! Serde mirrors of the storefront backend's promotion and product payloads,
//! and the adapter that normalises them into canonical [`Promotion`] and
//! [`Product`] values. Legacy record shapes are handled here so the discount
//! engine never has to sniff shapes.

use std::fmt;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Number, Value};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    discounts::round_whole,
    products::{Product, ProductId, Variant},
    promotions::{
        ActivityWindow, InvalidPercentage, ProductScope, ProductTargets, Promotion,
        PromotionDiscount, PromotionStatus,
    },
};

const STATUS_ACTIVE: &str = "ACTIVE";
const APPLY_TO_ALL_PRODUCTS: &str = "ALL_PRODUCTS";
const DISCOUNT_TYPE_PERCENTAGE: &str = "PERCENTAGE";
const DISCOUNT_TYPE_FIXED_AMOUNT: &str = "FIXED_AMOUNT";

/// Errors raised while normalising a record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The discount type is neither `PERCENTAGE` nor `FIXED_AMOUNT`.
    #[error("unknown discount type: {0}")]
    UnknownDiscountType(String),

    /// A required field is absent or has the wrong shape.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The discount value is not a representable number.
    #[error("invalid discount value: {0}")]
    InvalidDiscountValue(String),

    /// The percentage could not be represented.
    #[error(transparent)]
    Percentage(#[from] InvalidPercentage),

    /// A variant price is not a representable amount.
    #[error("invalid price for product {product}: {price}")]
    InvalidPrice {
        /// Product identifier
        product: String,

        /// Offending price
        price: String,
    },
}

/// Record identifier, either a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// String identifier
    Text(String),

    /// Numeric identifier
    Number(Number),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Legacy product reference found in a promotion's `products` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyProductRef {
    /// A bare product identifier
    Id(String),

    /// An embedded product object
    Object {
        /// Product identifier
        #[serde(default)]
        id: Option<Value>,

        /// Legacy document identifier
        #[serde(default, rename = "_id")]
        legacy_id: Option<Value>,
    },

    /// Anything else; never targets a product
    Other(Value),
}

impl LegacyProductRef {
    /// Resolve the referenced product identifier.
    ///
    /// Bare strings are used directly, objects yield their `id`, falling back
    /// to `_id` when the `id` is missing or empty. Anything else references no
    /// product.
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            Self::Id(id) => Some(ProductId::new(id.as_str())),
            Self::Object { id, legacy_id } => non_empty_str(id.as_ref())
                .or_else(|| non_empty_str(legacy_id.as_ref()))
                .map(ProductId::new),
            Self::Other(_) => None,
        }
    }
}

/// Promotion record as served by the backend.
///
/// Every field is optional at the serde level, and fields of the wrong shape
/// read as absent, so one bad record never fails a whole file. Required
/// fields are enforced by [`PromotionRecord::normalize`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRecord {
    /// Promotion identifier
    #[serde(default, alias = "_id", deserialize_with = "lenient")]
    pub id: Option<RecordId>,

    /// Display name
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    /// `PERCENTAGE` or `FIXED_AMOUNT`
    #[serde(default, deserialize_with = "lenient")]
    pub discount_type: Option<String>,

    /// Percentage points or major currency units, depending on the type
    #[serde(default)]
    pub discount_value: Option<Value>,

    /// `ALL_PRODUCTS`, or anything else for an explicit product list
    #[serde(default, deserialize_with = "lenient")]
    pub apply_to: Option<String>,

    /// Targeted product identifiers
    #[serde(default, deserialize_with = "lenient")]
    pub product_ids: Option<Vec<Value>>,

    /// Legacy targeted products, read only when `product_ids` is absent
    #[serde(default, deserialize_with = "lenient")]
    pub products: Option<Vec<LegacyProductRef>>,

    /// Window start
    #[serde(default, deserialize_with = "lenient")]
    pub start_date: Option<String>,

    /// Window end
    #[serde(default, deserialize_with = "lenient")]
    pub end_date: Option<String>,

    /// `ACTIVE` or `INACTIVE`
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
}

impl PromotionRecord {
    /// Normalise the record into a canonical promotion.
    ///
    /// Fixed amounts are read as major units of `currency`. Unparseable dates
    /// produce a malformed window rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the id, discount type or discount value is missing,
    /// the discount type is unknown, or the discount value cannot be
    /// represented.
    pub fn normalize(self, currency: &Currency) -> Result<Promotion<'_>, RecordError> {
        let id = self.id.ok_or(RecordError::MissingField("id"))?.to_string();

        let discount_type = self
            .discount_type
            .ok_or(RecordError::MissingField("discountType"))?;

        let discount_value = self
            .discount_value
            .ok_or(RecordError::MissingField("discountValue"))?;

        let discount = discount(&discount_type, &discount_value, currency)?;

        let start_date = self.start_date.unwrap_or_default();
        let end_date = self.end_date.unwrap_or_default();
        let window = ActivityWindow::parse(&start_date, &end_date);

        if window.is_malformed() {
            warn!(
                promotion_id = %id,
                %start_date,
                %end_date,
                "promotion has an unparseable window and will never apply"
            );
        }

        let scope = scope(
            &id,
            self.apply_to.as_deref().unwrap_or_default(),
            self.product_ids,
            self.products,
        );

        Ok(Promotion {
            id: id.into(),
            name: self.name.unwrap_or_default(),
            discount,
            scope,
            window,
            status: status(self.status.as_deref().unwrap_or_default()),
        })
    }
}

/// Variant record as served by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantRecord {
    /// Variant label
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    /// Price in major units; absent means not set
    #[serde(default)]
    pub price: Option<Value>,
}

/// Product record as served by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    /// Product identifier
    #[serde(default, alias = "_id", deserialize_with = "lenient")]
    pub id: Option<RecordId>,

    /// Product name
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    /// Variants, in catalog order
    #[serde(default, deserialize_with = "lenient")]
    pub variants: Option<Vec<VariantRecord>>,
}

impl ProductRecord {
    /// Normalise the record into a canonical product.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingField`] if the id is missing, or
    /// [`RecordError::InvalidPrice`] if a variant price cannot be represented
    /// in `currency`.
    pub fn normalize(self, currency: &Currency) -> Result<Product<'_>, RecordError> {
        let id = self.id.ok_or(RecordError::MissingField("id"))?.to_string();

        let variants = self
            .variants
            .unwrap_or_default()
            .into_iter()
            .map(|variant| {
                let minor = match &variant.price {
                    None => Some(0),
                    Some(price) => decimal(price).and_then(|major| minor_units(major, currency)),
                };

                minor
                    .map(|minor| {
                        Variant::new(
                            variant.name.unwrap_or_default(),
                            Money::from_minor(minor, currency),
                        )
                    })
                    .ok_or_else(|| RecordError::InvalidPrice {
                        product: id.clone(),
                        price: variant.price.as_ref().map(Value::to_string).unwrap_or_default(),
                    })
            })
            .collect::<Result<SmallVec<_>, _>>()?;

        Ok(Product {
            id: id.into(),
            name: self.name.unwrap_or_default(),
            variants,
            currency,
        })
    }
}

/// Normalise promotion records, skipping any that cannot be represented.
///
/// Skipped records are logged; a single bad record never blocks pricing.
pub fn normalize_promotions(
    records: impl IntoIterator<Item = PromotionRecord>,
    currency: &Currency,
) -> Vec<Promotion<'_>> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record_id(record.id.as_ref());

            record
                .normalize(currency)
                .inspect_err(|error| warn!(promotion_id = %id, %error, "skipping promotion"))
                .ok()
        })
        .collect()
}

/// Normalise product records, skipping any that cannot be represented.
pub fn normalize_products(
    records: impl IntoIterator<Item = ProductRecord>,
    currency: &Currency,
) -> Vec<Product<'_>> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record_id(record.id.as_ref());

            record
                .normalize(currency)
                .inspect_err(|error| warn!(product_id = %id, %error, "skipping product"))
                .ok()
        })
        .collect()
}

/// Deserialize a field, reading a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

fn record_id(id: Option<&RecordId>) -> String {
    id.map(ToString::to_string).unwrap_or_default()
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

/// Numbers only; numeric strings are not coerced.
fn decimal(value: &Value) -> Option<Decimal> {
    value.as_f64().and_then(Decimal::from_f64)
}

fn status(value: &str) -> PromotionStatus {
    if value == STATUS_ACTIVE {
        PromotionStatus::Active
    } else {
        PromotionStatus::Inactive
    }
}

fn discount<'a>(
    discount_type: &str,
    value: &Value,
    currency: &'a Currency,
) -> Result<PromotionDiscount<'a>, RecordError> {
    let invalid = || RecordError::InvalidDiscountValue(value.to_string());
    let points = decimal(value).ok_or_else(invalid)?;

    match discount_type {
        DISCOUNT_TYPE_PERCENTAGE => Ok(PromotionDiscount::percentage_points(points)?),
        DISCOUNT_TYPE_FIXED_AMOUNT => minor_units(points, currency)
            .map(|minor| PromotionDiscount::FixedAmount(Money::from_minor(minor, currency)))
            .ok_or_else(invalid),
        other => Err(RecordError::UnknownDiscountType(other.to_string())),
    }
}

/// Unknown `applyTo` values are treated as an explicit product list.
fn scope(
    promotion_id: &str,
    apply_to: &str,
    product_ids: Option<Vec<Value>>,
    products: Option<Vec<LegacyProductRef>>,
) -> ProductScope {
    if apply_to == APPLY_TO_ALL_PRODUCTS {
        return ProductScope::AllProducts;
    }

    if apply_to != "SPECIFIC_PRODUCTS" {
        debug!(
            promotion_id,
            apply_to, "unrecognised applyTo, treating as specific products"
        );
    }

    let targets = match product_ids {
        Some(product_ids) => canonical_targets(&product_ids),
        None => legacy_targets(products.as_deref().unwrap_or_default()),
    };

    ProductScope::SpecificProducts(targets)
}

/// Targets from the canonical `productIds` field; only string entries count.
fn canonical_targets(product_ids: &[Value]) -> ProductTargets {
    product_ids
        .iter()
        .filter_map(Value::as_str)
        .map(ProductId::new)
        .collect()
}

/// Targets from the legacy `products` field.
fn legacy_targets(products: &[LegacyProductRef]) -> ProductTargets {
    products
        .iter()
        .filter_map(LegacyProductRef::product_id)
        .collect()
}

/// Convert a major unit amount into whole minor units of `currency`,
/// rounding half away from zero.
fn minor_units(major: Decimal, currency: &Currency) -> Option<i64> {
    let scale = 10_i64.checked_pow(currency.exponent)?;

    round_whole(major.checked_mul(Decimal::from(scale))?).to_i64()
}
