use std::collections::HashMap;

use crate::domain::{Currency, Money};
use crate::error::ConfigError;

/// Fixed price per site, with a fallback for sites that are not listed.
#[derive(Debug, Clone, PartialEq)]
pub struct BidTable {
    default_bid: Money,
    site_bids: HashMap<String, Money>,
}

impl BidTable {
    pub fn new(default_bid: Money, site_bids: HashMap<String, Money>) -> Self {
        Self {
            default_bid,
            site_bids,
        }
    }

    /// Parses `site_id=amount` pairs separated by commas, all priced in
    /// `currency`.
    pub fn parse(currency: &Currency, default_amount: f64, entries: &str) -> Result<Self, ConfigError> {
        let default_bid = Money::new(currency.clone(), default_amount)?;

        let mut site_bids = HashMap::new();
        for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = || ConfigError::InvalidSiteBid(entry.to_string());
            let (site_id, amount) = entry.split_once('=').ok_or_else(invalid)?;
            let site_id = site_id.trim();
            if site_id.is_empty() {
                return Err(invalid());
            }
            let amount: f64 = amount.trim().parse().map_err(|_| invalid())?;
            site_bids.insert(site_id.to_string(), Money::new(currency.clone(), amount)?);
        }

        Ok(Self::new(default_bid, site_bids))
    }

    pub fn resolve(&self, site_id: &str) -> &Money {
        self.site_bids.get(site_id).unwrap_or(&self.default_bid)
    }

    pub fn contains(&self, site_id: &str) -> bool {
        self.site_bids.contains_key(site_id)
    }

    pub fn default_bid(&self) -> &Money {
        &self.default_bid
    }

    pub fn len(&self) -> usize {
        self.site_bids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.site_bids.is_empty()
    }
}

impl Default for BidTable {
    fn default() -> Self {
        let money = |units| Money::whole(Currency::usd(), units);
        let site_bids = [("site_1_id", 2), ("site_2_id", 3), ("site_3_id", 4)]
            .into_iter()
            .map(|(site, units)| (site.to_string(), money(units)))
            .collect();
        Self::new(money(1), site_bids)
    }
}
