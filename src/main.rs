//! Price check
//!
//! Loads a promotions file and a products file, prices every product at a
//! single instant and prints the resulting price list.

use std::{io, process::ExitCode};

use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use storefront_promotions::{
    catalog::{Catalog, CatalogError, currency_from_code},
    price_list::{PriceList, PriceListError},
    products::ProductId,
};

use crate::config::Config;

mod config;

/// Errors that end a price check run.
#[derive(Debug, Error)]
enum PriceCheckError {
    /// The catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The price list could not be written.
    #[error(transparent)]
    PriceList(#[from] PriceListError),

    /// The requested product is not in the catalog.
    #[error("product not found: {0}")]
    UnknownProduct(ProductId),
}

/// Price check entry point
fn main() -> ExitCode {
    let config = Config::load().unwrap_or_else(|config_error| config_error.exit());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(run_error) => {
            error!("price check failed: {run_error}");

            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), PriceCheckError> {
    let currency = currency_from_code(&config.currency)?;
    let catalog = Catalog::load(&config.promotions, &config.products, currency)?;

    let now = config.evaluation_instant();

    info!(
        %now,
        promotion_count = catalog.promotions().len(),
        active_count = catalog.active_promotions_at(now).len(),
        product_count = catalog.products().len(),
        "pricing catalog"
    );

    let mut priced = catalog.price_products_at(now);

    if let Some(product) = &config.product {
        let product_id = ProductId::from(product.as_str());

        if catalog.product(&product_id).is_none() {
            return Err(PriceCheckError::UnknownProduct(product_id));
        }

        priced.retain(|row| row.product.id == product_id);
    }

    if config.discounted_only {
        priced.retain(|row| row.has_discount);
    }

    PriceList::new(&priced).write_to(io::stdout().lock())?;

    Ok(())
}
