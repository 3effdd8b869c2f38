use serde::Serialize;
use tracing::{info, warn};

use crate::errors::{ServiceError, ServiceResult};
use crate::helpers::time::ResponseBudget;
use crate::observability::metrics::get_metrics;
use crate::sources::category::Category;
use crate::sources::fetch::FetchNumbers;
use crate::window::aggregator::WindowAggregator;

/// Body of a successful `/numbers/{id}` response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSnapshot {
    #[serde(rename = "windowPrevState")]
    pub window_prev_state: Vec<i64>,
    #[serde(rename = "windowCurrState")]
    pub window_curr_state: Vec<i64>,
    pub numbers: Vec<i64>,
    /// Always written as a JSON float, `5.0` rather than `5`
    pub avg: f64,
}

/// Runs fetch -> merge -> budget check for one request.
pub struct RequestHandler<F> {
    fetcher: F,
    window: WindowAggregator,
    budget: ResponseBudget,
}

impl<F: FetchNumbers> RequestHandler<F> {
    pub fn new(fetcher: F, window: WindowAggregator, budget: ResponseBudget) -> Self {
        Self { fetcher, window, budget }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn window(&self) -> &WindowAggregator {
        &self.window
    }

    pub async fn handle(&self, id: &str) -> ServiceResult<WindowSnapshot> {
        let metrics = get_metrics().await;
        let result = self.run(id).await;

        let category = id.parse::<Category>().map(|c| c.label()).unwrap_or("invalid");
        let status = match &result {
            Ok(_) => "200".to_owned(),
            Err(e) => e.status().as_u16().to_string(),
        };
        metrics.requests.with_label_values(&[category, status.as_str()]).inc();
        result
    }

    async fn run(&self, id: &str) -> ServiceResult<WindowSnapshot> {
        let category: Category = id.parse()?;
        let window_prev_state = self.window.snapshot().await;

        let timer = self.budget.start();
        let numbers = self.fetcher.fetch_numbers(category).await?;
        let merged = self.window.merge(&numbers).await;

        // the window keeps this merge even when the response reports failure
        if let Some(elapsed) = timer.exceeded() {
            let budget_ms = self.budget.limit().as_millis() as u64;
            warn!(
                "Response time exceeded {}ms: {}ms",
                budget_ms,
                elapsed.as_millis()
            );
            get_metrics().await.budget_exceeded.inc();
            return Err(ServiceError::BudgetExceeded {
                elapsed_ms: elapsed.as_millis(),
                budget_ms,
            });
        }

        info!(
            "'{}' served in {}ms, window size {}",
            category,
            timer.elapsed().as_millis(),
            merged.current.len()
        );
        Ok(WindowSnapshot {
            window_prev_state,
            window_curr_state: merged.current,
            numbers,
            avg: merged.average,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Serves canned batches in order, each after `delay`
    #[derive(Clone)]
    struct StubFetcher {
        batches: Arc<Vec<ServiceResult<Vec<i64>>>>,
        calls: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl StubFetcher {
        fn new(batches: Vec<ServiceResult<Vec<i64>>>, delay: Duration) -> Self {
            Self { batches: Arc::new(batches), calls: Arc::new(AtomicUsize::new(0)), delay }
        }
    }

    impl FetchNumbers for StubFetcher {
        async fn fetch_numbers(&self, _category: Category) -> ServiceResult<Vec<i64>> {
            tokio::time::sleep(self.delay).await;
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.batches[n] {
                Ok(numbers) => Ok(numbers.clone()),
                Err(e) => Err(ServiceError::UpstreamFailure(e.to_string())),
            }
        }
    }

    fn handler(batches: Vec<ServiceResult<Vec<i64>>>, delay: Duration) -> RequestHandler<StubFetcher> {
        RequestHandler::new(
            StubFetcher::new(batches, delay),
            WindowAggregator::new(10),
            ResponseBudget::from_millis(500),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn successive_requests_report_previous_and_current_window() {
        let handler = handler(vec![Ok(vec![2, 4, 6, 8]), Ok(vec![8, 10, 12])], Duration::from_millis(20));

        let first = handler.handle("e").await.unwrap();
        assert_eq!(
            first,
            WindowSnapshot {
                window_prev_state: vec![],
                window_curr_state: vec![2, 4, 6, 8],
                numbers: vec![2, 4, 6, 8],
                avg: 5.0,
            }
        );

        let second = handler.handle("e").await.unwrap();
        assert_eq!(second.window_prev_state, vec![2, 4, 6, 8]);
        assert_eq!(second.window_curr_state, vec![2, 4, 6, 8, 10, 12]);
        assert_eq!(second.numbers, vec![8, 10, 12], "raw fetch result is echoed");
        assert_eq!(second.avg, 7.0);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_category_never_fetches_or_touches_window() {
        let handler = handler(vec![], Duration::ZERO);
        handler.window().merge(&[1, 2]).await;

        let err = handler.handle("z").await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidCategory(ref id) if id == "z"));
        assert_eq!(handler.fetcher().calls.load(Ordering::SeqCst), 0);
        assert_eq!(handler.window().snapshot().await, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_error_leaves_window_untouched() {
        let handler = handler(
            vec![Err(ServiceError::UpstreamFailure("upstream returned 503".into()))],
            Duration::ZERO,
        );

        let err = handler.handle("p").await.unwrap_err();

        assert_eq!(err.to_string(), "upstream returned 503");
        assert!(handler.window().snapshot().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_is_merged_but_reported_as_failure() {
        let handler = handler(vec![Ok(vec![1, 3, 5])], Duration::from_millis(501));

        let err = handler.handle("r").await.unwrap_err();

        assert!(matches!(err, ServiceError::BudgetExceeded { budget_ms: 500, .. }));
        assert_eq!(err.to_string(), "Response time exceeded limit");
        assert_eq!(handler.window().snapshot().await, vec![1, 3, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_exactly_at_budget_succeeds() {
        let handler = handler(vec![Ok(vec![7])], Duration::from_millis(500));
        assert!(handler.handle("f").await.is_ok());
    }

    #[test]
    fn snapshot_serializes_with_public_field_names() {
        let snapshot = WindowSnapshot {
            window_prev_state: vec![],
            window_curr_state: vec![2, 4],
            numbers: vec![2, 4],
            avg: 3.0,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "windowPrevState": [],
                "windowCurrState": [2, 4],
                "numbers": [2, 4],
                "avg": 3.0
            })
        );
    }

    #[test]
    fn whole_average_is_written_as_float() {
        let snapshot = WindowSnapshot {
            window_prev_state: vec![],
            window_curr_state: vec![4, 6],
            numbers: vec![4, 6],
            avg: 5.0,
        };
        let text = serde_json::to_string(&snapshot).unwrap();
        assert!(text.ends_with(r#""avg":5.0}"#), "{}", text);
    }
}
