/// Bounded history of unique numbers, oldest first.
///
/// Invariants:
/// - `len() <= capacity`
/// - values appended by different merges never repeat
/// - order is arrival order, not value order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    capacity: usize,
    values: Vec<i64>,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, values: Vec::with_capacity(capacity) }
    }

    /// Appends the numbers not already held, keeping the last `capacity` entries.
    ///
    /// Dedup only looks at the window as it was before this call, so
    /// repeats inside `numbers` itself are all kept: `[3, 3]` on an
    /// empty window yields `[3, 3]`.
    pub fn merge(&mut self, numbers: &[i64]) {
        let fresh: Vec<i64> = numbers
            .iter()
            .filter(|n| !self.values.contains(n))
            .copied()
            .collect();
        self.values.extend(fresh);

        if self.values.len() > self.capacity {
            let overflow = self.values.len() - self.capacity;
            self.values.drain(..overflow);
        }
    }

    /// 0 for an empty window, otherwise sum / count
    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.values.iter().map(|v| *v as f64).sum();
        sum / self.values.len() as f64
    }

    /// Owned copy, independent of later merges
    pub fn snapshot(&self) -> Vec<i64> {
        self.values.clone()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
