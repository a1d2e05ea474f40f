use crate::schema::CategoryStats;

/// Incremental aggregation of salary estimates for one category.
///
/// Every pushed estimate counts as a found vacancy; only `Some` estimates
/// count as processed and contribute to the floored average.
#[derive(Debug, Default)]
pub struct CategoryAggregator {
    found: u64,
    processed: u64,
    // u128 so a run of near-max estimates cannot overflow the sum
    total: u128,
}

impl CategoryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, estimate: Option<u64>) {
        self.found += 1;
        if let Some(salary) = estimate {
            self.processed += 1;
            self.total += u128::from(salary);
        }
    }

    /// Stats where `vacancies_found` is the number of pushed estimates.
    pub fn finish(self) -> CategoryStats {
        let found = self.found;
        self.finish_with_found(found)
    }

    fn finish_with_found(self, found: u64) -> CategoryStats {
        let average_salary = if self.processed == 0 {
            0
        } else {
            // the mean never exceeds the largest estimate, so it fits in u64
            u64::try_from(self.total / u128::from(self.processed)).unwrap_or(u64::MAX)
        };

        CategoryStats {
            vacancies_found: found.max(self.processed),
            vacancies_processed: self.processed,
            average_salary,
        }
    }
}

/// Aggregates a finished sequence of estimates.
///
/// `found_count` is supplied by the caller. A count lower than the number
/// of `Some` estimates is raised to that number so that
/// `vacancies_processed <= vacancies_found` always holds.
pub fn aggregate<I>(estimates: I, found_count: u64) -> CategoryStats
where
    I: IntoIterator<Item = Option<u64>>,
{
    let mut aggregator = CategoryAggregator::new();
    for estimate in estimates {
        aggregator.push(estimate);
    }
    aggregator.finish_with_found(found_count)
}
