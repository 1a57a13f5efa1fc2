pub mod bid_table;
pub mod custom;
pub mod fixed_price;
pub mod pausing;

use eyre::Result;
use std::str::FromStr;
use std::sync::Arc;

use crate::clock::Clock;
use crate::domain::{BidUpdate, LineItem, LineItemStats};
use crate::engine::error_sink::{ErrorSink, LoggingErrorSink};
use crate::error::ConfigError;
use crate::schedule::PauseWindow;

pub use bid_table::BidTable;
pub use custom::CustomStrategy;
pub use fixed_price::FixedPriceStrategy;
pub use pausing::PausingStrategy;

/// Decision capability invoked by the driver once per line item per cycle.
///
/// Implementations must be synchronous and keep no state between calls other
/// than their immutable configuration.
pub trait BidStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn decide(&self, line_item: &LineItem, stats: &LineItemStats) -> Result<Vec<BidUpdate>>;

    /// Receives every failure the driver hits while running this strategy.
    /// Must return normally.
    fn handle_error(&self, error: &eyre::Report) {
        LoggingErrorSink.handle(error);
    }
}

/// Strategies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    FixedPrice,
    Pausing,
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "FIXED_PRICE" => Ok(StrategyKind::FixedPrice),
            "PAUSING" => Ok(StrategyKind::Pausing),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::FixedPrice => write!(f, "FIXED_PRICE"),
            StrategyKind::Pausing => write!(f, "PAUSING"),
        }
    }
}

pub fn build(
    kind: StrategyKind,
    table: BidTable,
    window: PauseWindow,
    clock: Arc<dyn Clock>,
) -> Box<dyn BidStrategy> {
    match kind {
        StrategyKind::FixedPrice => Box::new(FixedPriceStrategy::new(table)),
        StrategyKind::Pausing => Box::new(PausingStrategy::new(window, clock)),
    }
}
