use eyre::Result;

use crate::domain::{BidUpdate, LineItem, LineItemStats};
use crate::strategy::{BidStrategy, BidTable};

/// Bids a fixed price per publisher site, looked up in a [`BidTable`].
/// Sites missing from the table get the table's default price.
pub struct FixedPriceStrategy {
    table: BidTable,
}

impl FixedPriceStrategy {
    pub fn new(table: BidTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &BidTable {
        &self.table
    }
}

impl BidStrategy for FixedPriceStrategy {
    fn name(&self) -> &str {
        "fixed_price"
    }

    fn decide(&self, line_item: &LineItem, stats: &LineItemStats) -> Result<Vec<BidUpdate>> {
        let updates = stats
            .site_bids
            .iter()
            .map(|site_bid| {
                let bid = self.table.resolve(&site_bid.site_id);
                tracing::info!(
                    line_item = %line_item.id,
                    site_id = %site_bid.site_id,
                    site = %site_bid.site_name,
                    amount = bid.amount(),
                    currency = %bid.currency(),
                    fallback = !self.table.contains(&site_bid.site_id),
                    "fixed bid"
                );
                BidUpdate::bid(stats.line_item_id.clone(), site_bid.site_id.clone(), bid.clone())
            })
            .collect();

        Ok(updates)
    }
}
