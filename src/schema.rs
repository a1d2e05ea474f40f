use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ------------------------------------------------------------
// Salary record
// ------------------------------------------------------------
//
// One vacancy's declared compensation range, normalized across
// providers by the provider adapters.
//
// IMPORTANT:
// - An absent bound means "not specified" and is distinct from 0
//   at this level. The estimator still treats 0 as absent.
//
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryRecord {
    /// Lower bound of the range, in whole currency units
    pub lower: Option<u64>,

    /// Upper bound of the range, in whole currency units
    pub upper: Option<u64>,

    /// Provider currency code (e.g. "RUR", "rub", "USD")
    pub currency: String,
}

// ------------------------------------------------------------
// Category statistics
// ------------------------------------------------------------
//
// Aggregated salary figures for one category (programming language)
// on one provider.
//
// INVARIANTS:
// - vacancies_processed <= vacancies_found
// - average_salary is the floored mean of exactly the processed
//   estimates, and 0 when nothing was processed
//
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub vacancies_found: u64,
    pub vacancies_processed: u64,
    pub average_salary: u64,
}

// ------------------------------------------------------------
// Salary statistics report
// ------------------------------------------------------------
//
// Ordered mapping category -> stats for a single provider.
//
// Entries keep the order in which they were inserted, which is the
// order of the configured category list. Categories whose collection
// failed are never inserted.
//
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryStatsReport {
    /// Display title of the provider (e.g. "HeadHunter Moscow")
    pub title: String,

    entries: Vec<(String, CategoryStats)>,
}

impl SalaryStatsReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Commits stats for a category.
    ///
    /// Re-inserting an existing category replaces its stats in place.
    pub fn insert(&mut self, category: impl Into<String>, stats: CategoryStats) {
        let category = category.into();
        match self.entries.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = stats,
            None => self.entries.push((category, stats)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, category: &str) -> Option<&CategoryStats> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryStats)> {
        self.entries.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialized as a JSON object keyed by category, in report order.
/// The title is not part of the object; callers key reports by title.
impl Serialize for SalaryStatsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, stats) in &self.entries {
            map.serialize_entry(category, stats)?;
        }
        map.end()
    }
}
