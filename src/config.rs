//! Price check configuration

use std::path::PathBuf;

use clap::Parser;
use jiff::Timestamp;

/// Price a storefront catalog against its promotions
#[derive(Debug, Parser)]
#[command(name = "price-check", about = "Price a storefront catalog against its promotions", long_about = None)]
pub(crate) struct Config {
    /// Promotions file (.json, .yml or .yaml)
    #[arg(long, env = "PROMOTIONS_FILE")]
    pub promotions: PathBuf,

    /// Products file (.json, .yml or .yaml)
    #[arg(long, env = "PRODUCTS_FILE")]
    pub products: PathBuf,

    /// ISO 4217 currency of the catalog prices
    #[arg(short, long, env = "CATALOG_CURRENCY", default_value = "VND")]
    pub currency: String,

    /// Evaluation instant (RFC 3339), defaults to now
    #[arg(long, env = "PRICING_AT")]
    pub at: Option<Timestamp>,

    /// Only price the product with this id
    #[arg(long)]
    pub product: Option<String>,

    /// Only list products with a discount
    #[arg(long, default_value_t = false)]
    pub discounted_only: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// The instant to price at; the clock is read once per run.
    pub fn evaluation_instant(&self) -> Timestamp {
        self.at.unwrap_or_else(Timestamp::now)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_arguments() -> TestResult {
        let config = Config::try_parse_from([
            "price-check",
            "--promotions",
            "promotions.json",
            "--products",
            "products.yml",
            "--currency",
            "USD",
            "--at",
            "2025-01-15T12:00:00Z",
            "--discounted-only",
        ])?;

        assert_eq!(config.promotions, PathBuf::from("promotions.json"));
        assert_eq!(config.products, PathBuf::from("products.yml"));
        assert_eq!(config.currency, "USD");
        assert!(config.discounted_only);
        assert_eq!(
            config.evaluation_instant(),
            "2025-01-15T12:00:00Z".parse::<Timestamp>()?
        );

        Ok(())
    }

    #[test]
    fn rejects_invalid_instants() {
        let result = Config::try_parse_from([
            "price-check",
            "--promotions",
            "promotions.json",
            "--products",
            "products.yml",
            "--at",
            "next tuesday",
        ]);

        assert!(result.is_err());
    }
}
