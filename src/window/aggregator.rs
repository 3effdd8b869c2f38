use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::observability::metrics::get_metrics;
use crate::window::window::Window;

/// Window state right after a merge
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub current: Vec<i64>,
    pub average: f64,
}

/// Process-wide window shared by all requests.
///
/// Every merge runs together with its snapshot and average inside one lock
/// scope, so concurrent requests serialize their merges.
#[derive(Debug, Clone)]
pub struct WindowAggregator {
    inner: Arc<Mutex<Window>>,
}

impl WindowAggregator {
    pub fn new(capacity: usize) -> Self {
        Self { inner: Arc::new(Mutex::new(Window::new(capacity))) }
    }

    /// Merge `numbers`, then copy the resulting window and its average
    pub async fn merge(&self, numbers: &[i64]) -> MergeOutcome {
        let mut window = self.inner.lock().await;
        window.merge(numbers);
        debug!("window after merge: {:?}", window.values());
        get_metrics().await.window_size.set(window.len() as i64);
        MergeOutcome {
            current: window.snapshot(),
            average: window.average(),
        }
    }

    /// Copy of the window as it is now
    pub async fn snapshot(&self) -> Vec<i64> {
        self.inner.lock().await.snapshot()
    }

    pub async fn average(&self) -> f64 {
        self.inner.lock().await.average()
    }
}
