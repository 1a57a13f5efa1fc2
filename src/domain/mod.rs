use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// ISO-4217 currency code, always three upper-case ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        let valid = code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase());
        if !valid {
            return Err(DomainError::InvalidCurrency(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }

    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Currency {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMoney")]
pub struct Money {
    currency: Currency,
    amount: f64,
}

#[derive(Deserialize)]
struct RawMoney {
    currency: Currency,
    amount: f64,
}

impl TryFrom<RawMoney> for Money {
    type Error = DomainError;

    fn try_from(raw: RawMoney) -> Result<Self, Self::Error> {
        Money::new(raw.currency, raw.amount)
    }
}

impl Money {
    pub fn new(currency: Currency, amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::InvalidAmount(amount.to_string()));
        }
        Ok(Self { currency, amount })
    }

    /// Whole-unit amount. Always finite and non-negative, so it cannot fail.
    pub fn whole(currency: Currency, units: u32) -> Self {
        Self {
            currency,
            amount: f64::from(units),
        }
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Per-site snapshot delivered by the ad server for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteBid {
    pub site_id: String,
    #[serde(default)]
    pub site_name: String,
    /// Performance figures as reported by the ad server. Strategies may read
    /// them but the core never interprets them.
    #[serde(default)]
    pub metrics: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemStats {
    pub line_item_id: String,
    #[serde(default)]
    pub site_bids: Vec<SiteBid>,
}

impl LineItemStats {
    /// Rejects stats that cannot belong to `line_item`.
    pub fn validate_for(&self, line_item: &LineItem) -> Result<(), DomainError> {
        if self.line_item_id != line_item.id {
            return Err(DomainError::LineItemMismatch {
                expected: line_item.id.clone(),
                found: self.line_item_id.clone(),
            });
        }
        if self.site_bids.iter().any(|s| s.site_id.is_empty()) {
            return Err(DomainError::EmptySiteId(self.line_item_id.clone()));
        }
        Ok(())
    }
}

/// A single instruction for the ad server: either a site price or a
/// pause/resume of the whole line item. Only the constructors can build one,
/// so the two kinds never mix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidUpdate {
    line_item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    site_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bid: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pause: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resume: Option<bool>,
}

impl BidUpdate {
    pub fn bid(line_item_id: impl Into<String>, site_id: impl Into<String>, bid: Money) -> Self {
        Self {
            line_item_id: line_item_id.into(),
            site_id: Some(site_id.into()),
            bid: Some(bid),
            pause: None,
            resume: None,
        }
    }

    pub fn pause(line_item_id: impl Into<String>) -> Self {
        Self {
            line_item_id: line_item_id.into(),
            site_id: None,
            bid: None,
            pause: Some(true),
            resume: None,
        }
    }

    pub fn resume(line_item_id: impl Into<String>) -> Self {
        Self {
            line_item_id: line_item_id.into(),
            site_id: None,
            bid: None,
            pause: None,
            resume: Some(true),
        }
    }

    pub fn line_item_id(&self) -> &str {
        &self.line_item_id
    }

    pub fn site_id(&self) -> Option<&str> {
        self.site_id.as_deref()
    }

    pub fn bid_amount(&self) -> Option<&Money> {
        self.bid.as_ref()
    }

    pub fn is_pause(&self) -> bool {
        self.pause == Some(true)
    }

    pub fn is_resume(&self) -> bool {
        self.resume == Some(true)
    }
}

impl std::fmt::Display for BidUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.site_id, &self.bid) {
            (Some(site), Some(bid)) => write!(f, "{} site={} bid={}", self.line_item_id, site, bid),
            _ if self.is_pause() => write!(f, "{} PAUSE", self.line_item_id),
            _ => write!(f, "{} RESUME", self.line_item_id),
        }
    }
}
