//! Reading statistics
//!
//! Aggregates over the catalog projection behind the statistics and calendar pages. Only the
//! numbers are produced here; drawing charts is left to the client.
use crate::catalog::status::ReadingStatus;
use crate::database::types::BookRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReadingStats {
    /// Finished books per `YYYY-MM`, oldest month first
    pub read_per_month: Vec<LabelCount>,
    /// Books per category, most used first
    pub per_category: Vec<LabelCount>,
    /// Books per reading status, most common first
    pub per_status: Vec<LabelCount>,
}

impl ReadingStats {
    #[must_use]
    #[allow(clippy::missing_inline_in_public_items, reason = "Large function")]
    pub fn from_catalog(catalog: &[BookRecord]) -> Self {
        let mut per_month: BTreeMap<String, usize> = BTreeMap::new();
        for finished_on in catalog.iter().filter_map(|book| book.finished_on) {
            *per_month
                .entry(finished_on.format("%Y-%m").to_string())
                .or_default() += 1;
        }

        let mut per_category: HashMap<&str, usize> = HashMap::new();
        for name in catalog.iter().flat_map(BookRecord::category_names) {
            *per_category.entry(name).or_default() += 1;
        }

        // Statuses are grouped under their canonical label, unknown ones under what was stored
        let mut per_status: HashMap<String, usize> = HashMap::new();
        for book in catalog {
            let label = ReadingStatus::parse(&book.status)
                .map_or_else(|| book.status.trim().to_owned(), |status| status.label().to_owned());
            *per_status.entry(label).or_default() += 1;
        }

        Self {
            read_per_month: per_month
                .into_iter()
                .map(|(label, count)| LabelCount { label, count })
                .collect(),
            per_category: most_common_first(
                per_category
                    .into_iter()
                    .map(|(label, count)| (label.to_owned(), count)),
            ),
            per_status: most_common_first(per_status.into_iter()),
        }
    }
}

/// One book on the reading calendar, placed on the day it was finished or, failing that, started
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub date: NaiveDate,
}

/// Books that have a finish or start date, ordered by that date
#[must_use]
#[allow(clippy::missing_inline_in_public_items, reason = "Called once per request")]
pub fn reading_calendar(catalog: &[BookRecord]) -> Vec<CalendarEntry> {
    let mut entries: Vec<CalendarEntry> = catalog
        .iter()
        .filter_map(|book| {
            book.finished_on.or(book.started_on).map(|date| CalendarEntry {
                id: book.id,
                name: book.name.clone().unwrap_or_default(),
                status: book.status.clone(),
                date,
            })
        })
        .collect();
    entries.sort_by(|left, right| left.date.cmp(&right.date).then(left.id.cmp(&right.id)));
    entries
}

fn most_common_first(counts: impl Iterator<Item = (String, usize)>) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = counts
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    counts.sort_by(|left, right| {
        right
            .count
            .cmp(&left.count)
            .then_with(|| left.label.cmp(&right.label))
    });
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn count(label: &str, count: usize) -> LabelCount {
        LabelCount {
            label: label.to_owned(),
            count,
        }
    }

    fn catalog() -> Vec<BookRecord> {
        vec![
            BookRecord::new(1, "Dune", "Herbert", "Sci-Fi, Classic", "Leído")
                .with_dates(None, NaiveDate::from_ymd_opt(2024, 3, 1)),
            BookRecord::new(2, "Emma", "Austen", "Romance, Classic", "leído")
                .with_dates(NaiveDate::from_ymd_opt(2024, 1, 5), NaiveDate::from_ymd_opt(2024, 1, 20)),
            BookRecord::new(3, "Hyperion", "Simmons", "Sci-Fi", "En proceso")
                .with_dates(NaiveDate::from_ymd_opt(2024, 2, 10), None),
            BookRecord::new(4, "Ulysses", "Joyce", "", "releyendo"),
            BookRecord::new(5, "Solaris", "Lem", "Sci-Fi", "Leído")
                .with_dates(None, NaiveDate::from_ymd_opt(2024, 3, 28)),
        ]
    }

    #[test]
    fn test_read_per_month() {
        let stats = ReadingStats::from_catalog(&catalog());
        assert_eq!(
            stats.read_per_month,
            vec![count("2024-01", 1), count("2024-03", 2)]
        );
    }

    #[test]
    fn test_per_category() {
        let stats = ReadingStats::from_catalog(&catalog());
        assert_eq!(
            stats.per_category,
            vec![count("Sci-Fi", 3), count("Classic", 2), count("Romance", 1)]
        );
    }

    #[test]
    fn test_per_status_groups_spellings() {
        let stats = ReadingStats::from_catalog(&catalog());
        assert_eq!(
            stats.per_status,
            vec![count("Leído", 3), count("En proceso", 1), count("releyendo", 1)]
        );
    }

    #[test]
    fn test_empty_catalog() {
        let stats = ReadingStats::from_catalog(&[]);
        assert!(stats.read_per_month.is_empty());
        assert!(stats.per_category.is_empty());
        assert!(stats.per_status.is_empty());
    }

    #[test]
    fn test_calendar() {
        let entries = reading_calendar(&catalog());
        let placed: Vec<(i64, NaiveDate)> =
            entries.iter().map(|entry| (entry.id, entry.date)).collect();
        assert_eq!(
            placed,
            vec![
                (2, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()),
                (3, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()),
                (1, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
                (5, NaiveDate::from_ymd_opt(2024, 3, 28).unwrap()),
            ]
        );
    }
}
