use eyre::{Result, WrapErr};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::adapters::AdServerApi;
use crate::domain::LineItem;
use crate::strategy::BidStrategy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub line_items: usize,
    pub submitted: usize,
    pub failures: usize,
}

/// Polls the ad server, asks the strategy what to do with each line item,
/// and submits the answer. Failures go to the strategy's error handler and
/// never end the loop.
pub struct Driver {
    api: Box<dyn AdServerApi>,
    strategy: Box<dyn BidStrategy>,
    poll_interval: Duration,
}

impl Driver {
    pub fn new(
        api: Box<dyn AdServerApi>,
        strategy: Box<dyn BidStrategy>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            api,
            strategy,
            poll_interval,
        }
    }

    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "Bidder started: strategy={}, polling every {:?}",
            self.strategy.name(),
            self.poll_interval
        );

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown signal received, bidder stopping");
                    break;
                }
                _ = interval.tick() => {
                    let span = info_span!("cycle", id = %Uuid::new_v4());
                    self.run_cycle().instrument(span).await;
                }
            }
        }
    }

    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        let line_items = match self.api.line_items().await {
            Ok(items) => items,
            Err(e) => {
                report.failures += 1;
                self.strategy.handle_error(&e.wrap_err("listing line items"));
                log_report(&report);
                return report;
            }
        };
        report.line_items = line_items.len();

        for line_item in &line_items {
            match self.process(line_item).await {
                Ok(submitted) => report.submitted += submitted,
                Err(e) => {
                    report.failures += 1;
                    self.strategy.handle_error(&e);
                }
            }
        }

        log_report(&report);
        report
    }

    async fn process(&self, line_item: &LineItem) -> Result<usize> {
        let stats = self
            .api
            .line_item_stats(line_item)
            .await
            .wrap_err_with(|| format!("fetching stats for line item {}", line_item.id))?;
        stats.validate_for(line_item)?;

        let updates = self
            .strategy
            .decide(line_item, &stats)
            .wrap_err_with(|| format!("deciding bids for line item {}", line_item.id))?;
        if updates.is_empty() {
            return Ok(0);
        }

        for update in &updates {
            tracing::debug!("Submitting {}", update);
        }
        self.api
            .submit_bid_updates(&updates)
            .await
            .wrap_err_with(|| format!("submitting {} bid updates for {}", updates.len(), line_item.id))?;

        Ok(updates.len())
    }
}

fn log_report(report: &CycleReport) {
    info!(
        line_items = report.line_items,
        submitted = report.submitted,
        failures = report.failures,
        "cycle complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BidUpdate, LineItemStats, SiteBid};
    use crate::strategy::{BidTable, CustomStrategy, FixedPriceStrategy};
    use crate::test_support::CapturedLogs;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeApi {
        line_items: Vec<LineItem>,
        listing_unavailable: bool,
        stats: HashMap<String, LineItemStats>,
        failing_submissions: AtomicUsize,
        submitted: Arc<Mutex<Vec<Vec<BidUpdate>>>>,
    }

    #[async_trait::async_trait]
    impl AdServerApi for FakeApi {
        async fn line_items(&self) -> Result<Vec<LineItem>> {
            if self.listing_unavailable {
                eyre::bail!("connection refused");
            }
            Ok(self.line_items.clone())
        }

        async fn line_item_stats(&self, line_item: &LineItem) -> Result<LineItemStats> {
            self.stats
                .get(&line_item.id)
                .cloned()
                .ok_or_else(|| eyre::eyre!("no stats for {}", line_item.id))
        }

        async fn submit_bid_updates(&self, updates: &[BidUpdate]) -> Result<()> {
            let failing = self
                .failing_submissions
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                eyre::bail!("503 Service Unavailable");
            }
            self.submitted.lock().unwrap().push(updates.to_vec());
            Ok(())
        }
    }

    fn line_item(id: &str) -> LineItem {
        LineItem {
            id: id.into(),
            name: format!("Line item {id}"),
        }
    }

    fn stats(id: &str, sites: &[&str]) -> LineItemStats {
        LineItemStats {
            line_item_id: id.into(),
            site_bids: sites
                .iter()
                .map(|s| SiteBid {
                    site_id: s.to_string(),
                    site_name: s.to_string(),
                    metrics: serde_json::Value::Null,
                })
                .collect(),
        }
    }

    fn api_with(items: &[(&str, Vec<&str>)]) -> FakeApi {
        FakeApi {
            line_items: items.iter().map(|(id, _)| line_item(id)).collect(),
            stats: items
                .iter()
                .map(|(id, sites)| (id.to_string(), stats(id, sites)))
                .collect(),
            ..FakeApi::default()
        }
    }

    /// Fixed-price decisions with an error handler that counts calls.
    fn counting_fixed_price(errors: Arc<AtomicUsize>) -> Box<dyn BidStrategy> {
        let inner = FixedPriceStrategy::new(BidTable::default());
        Box::new(
            CustomStrategy::new("counting_fixed_price", move |li, st| inner.decide(li, st))
                .with_error_handler(move |_| {
                    errors.fetch_add(1, Ordering::SeqCst);
                }),
        )
    }

    #[tokio::test]
    async fn cycle_submits_one_batch_per_line_item() {
        let api = api_with(&[("li-1", vec!["site_1_id", "x"]), ("li-2", vec!["site_2_id"])]);
        let submitted = api.submitted.clone();
        let driver = Driver::new(
            Box::new(api),
            Box::new(FixedPriceStrategy::new(BidTable::default())),
            Duration::from_secs(60),
        );

        let report = driver.run_cycle().await;

        assert_eq!(
            report,
            CycleReport { line_items: 2, submitted: 3, failures: 0 }
        );
        let batches = submitted.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0][0].bid_amount().unwrap().amount(), 2.0);
        assert_eq!(batches[0][1].bid_amount().unwrap().amount(), 1.0);
        assert_eq!(batches[1][0].line_item_id(), "li-2");
    }

    #[tokio::test]
    async fn submission_failures_do_not_stop_later_cycles() {
        let api = api_with(&[("li-1", vec!["site_3_id"])]);
        api.failing_submissions.store(2, Ordering::SeqCst);
        let submitted = api.submitted.clone();
        let errors = Arc::new(AtomicUsize::new(0));
        let driver = Driver::new(
            Box::new(api),
            counting_fixed_price(errors.clone()),
            Duration::from_secs(60),
        );

        let first = driver.run_cycle().await;
        let second = driver.run_cycle().await;
        let third = driver.run_cycle().await;

        assert_eq!(first.failures, 1);
        assert_eq!(second.failures, 1);
        assert_eq!(third, CycleReport { line_items: 1, submitted: 1, failures: 0 });
        assert_eq!(errors.load(Ordering::SeqCst), 2);
        assert_eq!(submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_stats_only_fail_their_line_item() {
        let mut api = api_with(&[("li-1", vec!["site_1_id"]), ("li-2", vec!["site_2_id"])]);
        api.stats.insert("li-1".into(), stats("li-other", &["site_1_id"]));
        let submitted = api.submitted.clone();
        let errors = Arc::new(AtomicUsize::new(0));
        let driver = Driver::new(
            Box::new(api),
            counting_fixed_price(errors.clone()),
            Duration::from_secs(60),
        );

        let report = driver.run_cycle().await;

        assert_eq!(report, CycleReport { line_items: 2, submitted: 1, failures: 1 });
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(submitted.lock().unwrap()[0][0].line_item_id(), "li-2");
    }

    #[tokio::test]
    async fn empty_decisions_are_not_submitted() {
        let api = api_with(&[("li-1", vec![])]);
        let submitted = api.submitted.clone();
        let driver = Driver::new(
            Box::new(api),
            Box::new(FixedPriceStrategy::new(BidTable::default())),
            Duration::from_secs(60),
        );

        let report = driver.run_cycle().await;

        assert_eq!(report, CycleReport { line_items: 1, submitted: 0, failures: 0 });
        assert!(submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_until_polls_then_stops_on_shutdown() {
        let api = api_with(&[("li-1", vec!["site_1_id"])]);
        let submitted = api.submitted.clone();
        let driver = Driver::new(
            Box::new(api),
            Box::new(FixedPriceStrategy::new(BidTable::default())),
            Duration::from_millis(10),
        );

        driver
            .run_until(tokio::time::sleep(Duration::from_millis(45)))
            .await;

        let cycles = submitted.lock().unwrap().len();
        assert!(cycles >= 1, "expected at least one cycle, got {cycles}");
    }

    #[tokio::test]
    async fn default_error_handler_logs_failed_submissions() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());
        let api = api_with(&[("li-1", vec!["site_1_id"])]);
        api.failing_submissions.store(1, Ordering::SeqCst);
        let submitted = api.submitted.clone();
        let driver = Driver::new(
            Box::new(api),
            Box::new(FixedPriceStrategy::new(BidTable::default())),
            Duration::from_secs(60),
        );

        let first = driver.run_cycle().await;
        let second = driver.run_cycle().await;

        assert_eq!(first.failures, 1);
        assert_eq!(second, CycleReport { line_items: 1, submitted: 1, failures: 0 });
        assert_eq!(submitted.lock().unwrap().len(), 1);

        let errors = logs.lines_containing("bidding error");
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].contains("ERROR"));
        assert!(errors[0].contains("submitting 1 bid updates for li-1: 503 Service Unavailable"));
    }

    #[tokio::test]
    async fn listing_failure_still_reports_the_cycle() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());
        let api = FakeApi {
            listing_unavailable: true,
            ..api_with(&[("li-1", vec!["site_1_id"])])
        };
        let submitted = api.submitted.clone();
        let driver = Driver::new(
            Box::new(api),
            Box::new(FixedPriceStrategy::new(BidTable::default())),
            Duration::from_secs(60),
        );

        let report = driver.run_cycle().await;

        assert_eq!(report, CycleReport { line_items: 0, submitted: 0, failures: 1 });
        assert!(submitted.lock().unwrap().is_empty());
        assert!(logs.contents().contains("listing line items: connection refused"));
        let summaries = logs.lines_containing("cycle complete");
        assert_eq!(summaries.len(), 1, "{summaries:?}");
        assert!(summaries[0].contains("failures=1"));
    }
}
