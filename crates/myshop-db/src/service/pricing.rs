//! Pricing resolver: the catalog's current price for each requested line.
//!
//! Reads only. Prices are read once per product per placement and frozen onto
//! the order lines; stock sufficiency is left to the stock ledger.

use std::collections::HashMap;

use tracing::debug;

use super::error::{OrderError, OrderResult};
use crate::repository::product::ProductRepository;
use myshop_core::{LineRequest, PriceQuote, PricedLine};

#[derive(Debug, Clone)]
pub struct PricingResolver {
    products: ProductRepository,
}

impl PricingResolver {
    pub fn new(products: ProductRepository) -> Self {
        PricingResolver { products }
    }

    /// Current price and stock snapshot of one product.
    ///
    /// Soft-deleted products are reported as `ProductNotFound`. Inactive ones
    /// are still priced.
    pub async fn quote(&self, product_id: &str) -> OrderResult<PriceQuote> {
        let product = self
            .products
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| OrderError::ProductNotFound(product_id.to_string()))?;

        Ok(PriceQuote::from(&product))
    }

    /// Prices every line in request order.
    ///
    /// A product appearing on several lines is read once, so all of its lines
    /// carry the same unit price. Fails on the first unknown product.
    pub async fn price_lines(&self, lines: Vec<LineRequest>) -> OrderResult<Vec<PricedLine>> {
        let mut quotes: HashMap<String, PriceQuote> = HashMap::new();
        let mut priced = Vec::with_capacity(lines.len());

        for line in lines {
            let unit_price = match quotes.get(&line.product_id) {
                Some(quote) => quote.unit_price,
                None => {
                    let quote = self.quote(&line.product_id).await?;
                    let unit_price = quote.unit_price;
                    quotes.insert(line.product_id.clone(), quote);
                    unit_price
                }
            };
            priced.push(PricedLine::new(line, unit_price));
        }

        debug!(lines = priced.len(), products = quotes.len(), "Lines priced");
        Ok(priced)
    }
}
