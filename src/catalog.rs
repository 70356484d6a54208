//! Catalog
//!
//! Loads promotion and product record files and normalises them for pricing.

use std::{fs, path::Path};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::iso::{self, Currency};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::info;

use crate::{
    pricing::{PricedProduct, apply_promotions_to_products},
    products::{Product, ProductId},
    promotions::{Promotion, activity::filter_active_promotions},
    records::{ProductRecord, PromotionRecord, normalize_products, normalize_promotions},
};

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The file extension is not `.json`, `.yml` or `.yaml`
    #[error("Unsupported catalog file: {0}")]
    UnsupportedFormat(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Wrapper for promotion records in a catalog file
#[derive(Debug, Deserialize)]
pub struct PromotionsFile {
    /// Promotion records, in backend order
    #[serde(default)]
    pub promotions: Vec<PromotionRecord>,
}

/// Wrapper for product records in a catalog file
#[derive(Debug, Deserialize)]
pub struct ProductsFile {
    /// Product records, in backend order
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

/// Normalised promotions and products sharing one currency.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    currency: &'a Currency,
    promotions: Vec<Promotion<'a>>,
    products: Vec<Product<'a>>,

    /// Product id -> index into `products`
    product_index: FxHashMap<ProductId, usize>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            currency,
            promotions: Vec::new(),
            products: Vec::new(),
            product_index: FxHashMap::default(),
        }
    }

    /// Load a catalog from a promotions file and a products file.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed.
    pub fn load(
        promotions_path: impl AsRef<Path>,
        products_path: impl AsRef<Path>,
        currency: &'a Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        catalog
            .load_promotions(promotions_path)?
            .load_products(products_path)?;

        Ok(catalog)
    }

    /// Load a named set from `<base>/<name>/promotions.yml` and
    /// `<base>/<name>/products.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed.
    pub fn from_set(
        base_path: impl AsRef<Path>,
        name: &str,
        currency: &'a Currency,
    ) -> Result<Self, CatalogError> {
        let set_path = base_path.as_ref().join(name);

        Self::load(
            set_path.join("promotions.yml"),
            set_path.join("products.yml"),
            currency,
        )
    }

    /// Load promotion records from a file, appending them to the catalog.
    ///
    /// Records that cannot be normalised are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_promotions(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, CatalogError> {
        let file: PromotionsFile = read_document(path.as_ref())?;
        let record_count = file.promotions.len();

        let promotions = normalize_promotions(file.promotions, self.currency);

        info!(
            path = %path.as_ref().display(),
            record_count,
            loaded = promotions.len(),
            "loaded promotions"
        );

        self.promotions.extend(promotions);

        Ok(self)
    }

    /// Load product records from a file, appending them to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_products(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, CatalogError> {
        let file: ProductsFile = read_document(path.as_ref())?;
        let record_count = file.products.len();

        let products = normalize_products(file.products, self.currency);

        info!(
            path = %path.as_ref().display(),
            record_count,
            loaded = products.len(),
            "loaded products"
        );

        for product in products {
            self.product_index
                .insert(product.id.clone(), self.products.len());

            self.products.push(product);
        }

        Ok(self)
    }

    /// Catalog currency
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Loaded promotions, in file order
    pub fn promotions(&self) -> &[Promotion<'a>] {
        &self.promotions
    }

    /// Loaded products, in file order
    pub fn products(&self) -> &[Product<'a>] {
        &self.products
    }

    /// Look up a product by id.
    ///
    /// When an id appears more than once the last loaded product wins.
    pub fn product(&self, id: &ProductId) -> Option<&Product<'a>> {
        self.product_index
            .get(id)
            .and_then(|index| self.products.get(*index))
    }

    /// Promotions active at `now`, in file order.
    pub fn active_promotions_at(&self, now: Timestamp) -> Vec<&Promotion<'a>> {
        filter_active_promotions(&self.promotions, now)
    }

    /// Price every product at `now`.
    pub fn price_products_at(&self, now: Timestamp) -> Vec<PricedProduct<'_, 'a>> {
        apply_promotions_to_products(&self.products, &self.promotions, now)
    }
}

/// Resolve an ISO 4217 currency code.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownCurrency`] if the code is not recognised.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, CatalogError> {
    iso::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| CatalogError::UnknownCurrency(code.to_string()))
}

/// Read and parse a JSON or YAML document, chosen by file extension.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let format = DocumentFormat::from_path(path)?;
    let contents = fs::read_to_string(path)?;

    Ok(match format {
        DocumentFormat::Json => serde_json::from_str(&contents)?,
        DocumentFormat::Yaml => serde_norway::from_str(&contents)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yml" | "yaml") => Ok(Self::Yaml),
            _ => Err(CatalogError::UnsupportedFormat(path.display().to_string())),
        }
    }
}
