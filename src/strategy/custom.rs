use eyre::Result;

use crate::domain::{BidUpdate, LineItem, LineItemStats};
use crate::engine::error_sink::{ErrorSink, LoggingErrorSink};
use crate::strategy::BidStrategy;

type DecideFn = dyn Fn(&LineItem, &LineItemStats) -> Result<Vec<BidUpdate>> + Send + Sync;
type ErrorFn = dyn Fn(&eyre::Report) + Send + Sync;

/// Strategy backed by caller-supplied closures, for logic that does not
/// warrant its own type.
pub struct CustomStrategy {
    name: String,
    decide: Box<DecideFn>,
    on_error: Option<Box<ErrorFn>>,
}

impl CustomStrategy {
    pub fn new<F>(name: impl Into<String>, decide: F) -> Self
    where
        F: Fn(&LineItem, &LineItemStats) -> Result<Vec<BidUpdate>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            decide: Box::new(decide),
            on_error: None,
        }
    }

    /// Replaces the default logging error handler. The handler must not panic.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&eyre::Report) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(handler));
        self
    }
}

impl BidStrategy for CustomStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, line_item: &LineItem, stats: &LineItemStats) -> Result<Vec<BidUpdate>> {
        (self.decide)(line_item, stats)
    }

    fn handle_error(&self, error: &eyre::Report) {
        match &self.on_error {
            Some(handler) => handler(error),
            None => LoggingErrorSink.handle(error),
        }
    }
}
