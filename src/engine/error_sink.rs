use tracing::error;

/// Absorbs failures raised while bidding so the polling loop keeps running.
/// `handle` must always return normally.
pub trait ErrorSink: Send + Sync {
    fn handle(&self, error: &eyre::Report);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingErrorSink;

impl ErrorSink for LoggingErrorSink {
    fn handle(&self, error: &eyre::Report) {
        error!(error = %format!("{:#}", error), "bidding error; continuing with next cycle");
    }
}
