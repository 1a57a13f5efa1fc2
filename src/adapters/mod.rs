pub mod adnuntius;

use eyre::Result;

use crate::domain::{BidUpdate, LineItem, LineItemStats};

/// The ad server as seen by the polling loop.
#[async_trait::async_trait]
pub trait AdServerApi: Send + Sync {
    /// Line items currently under custom bidding for the configured network.
    async fn line_items(&self) -> Result<Vec<LineItem>>;

    async fn line_item_stats(&self, line_item: &LineItem) -> Result<LineItemStats>;

    async fn submit_bid_updates(&self, updates: &[BidUpdate]) -> Result<()>;
}
