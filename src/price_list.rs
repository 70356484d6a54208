//! Price List
//!
//! Renders priced products for display: original price, promotional price and
//! a percent-off badge.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::pricing::PricedProduct;

/// Errors that can occur when writing a price list.
#[derive(Debug, Error)]
pub enum PriceListError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Format a price for display using the currency's locale conventions.
pub fn format_price(price: &Money<'_, Currency>) -> String {
    price.to_string()
}

/// Format a percent-off badge, or `None` when nothing is discounted.
pub fn format_percent_badge(percent: u32) -> Option<String> {
    (percent > 0).then(|| format!("-{percent}%"))
}

/// Tabular view over priced products.
#[derive(Debug)]
pub struct PriceList<'r, 'p, 'a> {
    rows: &'r [PricedProduct<'p, 'a>],
}

impl<'r, 'p, 'a> PriceList<'r, 'p, 'a> {
    /// Create a price list over priced products.
    pub fn new(rows: &'r [PricedProduct<'p, 'a>]) -> Self {
        Self { rows }
    }

    /// Number of products with a discount.
    pub fn discounted_count(&self) -> usize {
        self.rows.iter().filter(|row| row.has_discount).count()
    }

    /// Write the price list as a table followed by a summary line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), PriceListError> {
        let mut builder = Builder::default();

        builder.push_record(["Product", "Original", "Price", "Off", "Promotion"]);

        for row in self.rows {
            let pricing = &row.pricing;

            let promotion = pricing
                .applied_promotion
                .map(|promotion| {
                    if promotion.name.is_empty() {
                        promotion.id.to_string()
                    } else {
                        promotion.name.clone()
                    }
                })
                .unwrap_or_default();

            builder.push_record([
                row.product.name.clone(),
                format_price(&pricing.original_price),
                format_price(&pricing.discounted_price),
                format_percent_badge(pricing.discount_percent).unwrap_or_default(),
                promotion,
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..4), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(
            out,
            "{} of {} products discounted",
            self.discounted_count(),
            self.rows.len()
        )?;

        Ok(())
    }
}
