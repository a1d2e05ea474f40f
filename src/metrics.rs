use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for one collection run.
///
/// Owned by `main` and passed down by reference; updated through `&self`
/// so the collector and the page stream can share it.
#[derive(Default)]
pub struct RunMetrics {
    // Network
    pub pages_fetched: AtomicUsize,
    pub transport_errors: AtomicUsize,
    pub protocol_errors: AtomicUsize,

    // Data
    pub vacancies_seen: AtomicUsize,

    // Categories
    pub categories_collected: AtomicUsize,
    pub categories_failed: AtomicUsize,
}

impl RunMetrics {
    pub fn incr(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::Relaxed)
    }
}

impl fmt::Display for RunMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pages={} vacancies={} collected={} failed={} transport_err={} protocol_err={}",
            Self::get(&self.pages_fetched),
            Self::get(&self.vacancies_seen),
            Self::get(&self.categories_collected),
            Self::get(&self.categories_failed),
            Self::get(&self.transport_errors),
            Self::get(&self.protocol_errors),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line_reflects_counters() {
        let metrics = RunMetrics::default();
        RunMetrics::incr(&metrics.pages_fetched);
        RunMetrics::incr(&metrics.pages_fetched);
        RunMetrics::incr(&metrics.categories_failed);

        assert_eq!(
            metrics.to_string(),
            "pages=2 vacancies=0 collected=0 failed=1 transport_err=0 protocol_err=0"
        );
    }
}
