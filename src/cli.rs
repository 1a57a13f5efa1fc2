use clap::Parser;

/// Custom bidder for Adnuntius line items.
///
/// Every flag can also be set through the environment (or a `.env` file).
#[derive(Debug, Clone, Parser)]
#[command(name = "bidder", version, about = "Custom bidder for Adnuntius line items")]
pub struct Cli {
    #[arg(long = "apiKey", env = "ADN_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    #[arg(long = "networkId", env = "ADN_NETWORK_ID", default_value = "")]
    pub network_id: String,

    #[arg(long = "apiScheme", env = "ADN_API_SCHEME", default_value = "https")]
    pub api_scheme: String,

    #[arg(long = "apiHost", env = "ADN_API_HOST", default_value = "api.adnuntius.com")]
    pub api_host: String,

    /// FIXED_PRICE or PAUSING.
    #[arg(long, env = "BIDDER_STRATEGY", default_value = "FIXED_PRICE")]
    pub strategy: String,

    /// Seconds between polling cycles.
    #[arg(long = "pollSecs", env = "BIDDER_POLL_SECS", default_value_t = 60)]
    pub poll_secs: u64,

    /// ISO-4217 currency for every fixed bid.
    #[arg(long, env = "BIDDER_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Bid for sites without an entry in --siteBids.
    #[arg(long = "defaultBid", env = "BIDDER_DEFAULT_BID", default_value_t = 1.0)]
    pub default_bid: f64,

    /// Comma-separated `site_id=amount` pairs.
    #[arg(
        long = "siteBids",
        env = "BIDDER_SITE_BIDS",
        default_value = "site_1_id=2,site_2_id=3,site_3_id=4"
    )]
    pub site_bids: String,

    /// Start of the daily pause window, HH:MM (inclusive).
    #[arg(long = "pauseStart", env = "BIDDER_PAUSE_START", default_value = "21:00")]
    pub pause_start: String,

    /// End of the daily pause window, HH:MM (exclusive).
    #[arg(long = "pauseEnd", env = "BIDDER_PAUSE_END", default_value = "05:00")]
    pub pause_end: String,

    /// Timezone of the pause window as a fixed offset, e.g. +02:00.
    #[arg(
        long = "utcOffset",
        env = "BIDDER_UTC_OFFSET",
        default_value = "+00:00",
        allow_hyphen_values = true
    )]
    pub utc_offset: String,
}
