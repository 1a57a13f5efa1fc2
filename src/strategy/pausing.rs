use eyre::Result;
use std::sync::Arc;

use crate::clock::Clock;
use crate::domain::{BidUpdate, LineItem, LineItemStats};
use crate::schedule::PauseWindow;
use crate::strategy::BidStrategy;

/// Pauses the line item inside a daily window and resumes it outside.
/// The clock is read on every call, so nothing carries over between cycles.
pub struct PausingStrategy {
    window: PauseWindow,
    clock: Arc<dyn Clock>,
}

impl PausingStrategy {
    pub fn new(window: PauseWindow, clock: Arc<dyn Clock>) -> Self {
        Self { window, clock }
    }

    pub fn window(&self) -> &PauseWindow {
        &self.window
    }
}

impl BidStrategy for PausingStrategy {
    fn name(&self) -> &str {
        "pausing"
    }

    fn decide(&self, line_item: &LineItem, _stats: &LineItemStats) -> Result<Vec<BidUpdate>> {
        let now = self.clock.time_of_day(self.window.offset());
        let update = self.window.decide(&line_item.id, now);

        tracing::info!(
            line_item = %line_item.id,
            local_time = %now.format("%H:%M:%S"),
            window = %self.window,
            paused = update.is_pause(),
            "pause window decision"
        );

        Ok(vec![update])
    }
}
