use eyre::{Result, WrapErr};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::AdServerApi;
use crate::config::Config;
use crate::domain::{BidUpdate, LineItem, LineItemStats, SiteBid};

#[derive(Clone)]
pub struct AdnuntiusClient {
    client: Client,
    config: Arc<Config>,
}

#[derive(Debug, Deserialize)]
struct LineItemsResponse {
    #[serde(default)]
    results: Vec<LineItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteStatsResponse {
    #[serde(default)]
    site_bids: Vec<SiteBid>,
}

impl AdnuntiusClient {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .wrap_err("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}/api/v1", self.config.api_scheme, self.config.api_host)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.config.api_key)
            .query(&[("context", self.config.network_id.as_str())])
    }
}

#[async_trait::async_trait]
impl AdServerApi for AdnuntiusClient {
    async fn line_items(&self) -> Result<Vec<LineItem>> {
        let url = format!("{}/lineitems", self.base_url());

        let resp: LineItemsResponse = self
            .authorized(self.client.get(&url))
            .query(&[("biddingAlgorithm", "CUSTOM")])
            .send()
            .await
            .wrap_err("line_items request failed")?
            .error_for_status()
            .wrap_err("line_items rejected")?
            .json()
            .await
            .wrap_err("line_items parse failed")?;

        Ok(resp.results)
    }

    async fn line_item_stats(&self, line_item: &LineItem) -> Result<LineItemStats> {
        let url = format!("{}/stats/lineitems/{}", self.base_url(), line_item.id);

        let resp: SiteStatsResponse = self
            .authorized(self.client.get(&url))
            .query(&[("groupBy", "site")])
            .send()
            .await
            .wrap_err("line_item_stats request failed")?
            .error_for_status()
            .wrap_err("line_item_stats rejected")?
            .json()
            .await
            .wrap_err("line_item_stats parse failed")?;

        Ok(LineItemStats {
            line_item_id: line_item.id.clone(),
            site_bids: resp.site_bids,
        })
    }

    async fn submit_bid_updates(&self, updates: &[BidUpdate]) -> Result<()> {
        let url = format!("{}/lineitems/bidupdate", self.base_url());

        self.authorized(self.client.post(&url))
            .json(updates)
            .send()
            .await
            .wrap_err("submit_bid_updates request failed")?
            .error_for_status()
            .wrap_err("submit_bid_updates rejected")?;

        Ok(())
    }
}
