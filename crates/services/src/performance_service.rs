use std::sync::Arc;

use api::gateway::AttemptGateway;
use prep_core::model::{AttemptRecord, Difficulty, ExamId, UserId};

use crate::error::PerformanceError;

/// Filters applied to one page of attempt history, client-side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub exam: Option<ExamId>,
    pub difficulty: Option<Difficulty>,
}

impl HistoryFilter {
    fn matches(&self, record: &AttemptRecord) -> bool {
        if let Some(exam) = self.exam {
            if record.exam != exam {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if record.difficulty != Some(difficulty) {
                return false;
            }
        }
        true
    }
}

/// Aggregate statistics recomputed from a set of attempt records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceStats {
    pub attempts: u32,
    pub total_correct: u32,
    pub total_incorrect: u32,
    pub mean_percentage: u32,
    pub best_percentage: u32,
}

impl PerformanceStats {
    /// Recompute the aggregates from scratch over the given records.
    #[must_use]
    pub fn from_records(records: &[AttemptRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let attempts = records.len() as u32;
        let total_correct: u32 = records.iter().map(|r| r.score).sum();
        let total_incorrect: u32 = records
            .iter()
            .map(|r| r.total_questions.saturating_sub(r.score))
            .sum();
        let percentage_sum: u32 = records.iter().map(AttemptRecord::percentage).sum();
        let best_percentage = records
            .iter()
            .map(AttemptRecord::percentage)
            .max()
            .unwrap_or(0);
        Self {
            attempts,
            total_correct,
            total_incorrect,
            mean_percentage: (percentage_sum + attempts / 2) / attempts,
            best_percentage,
        }
    }
}

/// One fetched-and-filtered page of history plus its aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage {
    pub records: Vec<AttemptRecord>,
    pub stats: PerformanceStats,
    /// Whether the server page was full, so another page may exist.
    pub may_have_more: bool,
}

/// Per-page size the server uses for attempt history.
const PAGE_SIZE: usize = 10;

/// Attempt history and aggregate statistics for the performance screen.
#[derive(Clone)]
pub struct PerformanceService {
    attempts: Arc<dyn AttemptGateway>,
}

impl PerformanceService {
    #[must_use]
    pub fn new(attempts: Arc<dyn AttemptGateway>) -> Self {
        Self { attempts }
    }

    /// One page of a user's history, filtered locally, with stats computed
    /// over the filtered records. Pagination stays server-driven; filters
    /// never change which page is fetched.
    ///
    /// # Errors
    ///
    /// Returns `PerformanceError::Api` if the fetch fails.
    pub async fn history_page(
        &self,
        user: UserId,
        page: u32,
        filter: HistoryFilter,
    ) -> Result<HistoryPage, PerformanceError> {
        let fetched = self.attempts.list_attempts(user, page).await?;
        let may_have_more = fetched.len() == PAGE_SIZE;
        let records: Vec<AttemptRecord> = fetched
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        let stats = PerformanceStats::from_records(&records);
        Ok(HistoryPage {
            records,
            stats,
            may_have_more,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryApi;
    use chrono::TimeZone;
    use prep_core::model::{AttemptId, SectionId};

    fn build_record(id: u64, exam: u64, score: u32, total: u32) -> AttemptRecord {
        let started = chrono::Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        AttemptRecord {
            id: AttemptId::new(id),
            exam: ExamId::new(exam),
            section: SectionId::new(1),
            syllabus: None,
            difficulty: None,
            score,
            total_questions: total,
            total_time_seconds: 300,
            started_at: started,
            ended_at: Some(started),
        }
    }

    #[test]
    fn stats_over_empty_records_are_zero() {
        assert_eq!(
            PerformanceStats::from_records(&[]),
            PerformanceStats::default()
        );
    }

    #[test]
    fn stats_aggregate_correct_incorrect_and_percentages() {
        let records = vec![build_record(1, 1, 4, 5), build_record(2, 1, 2, 5)];
        let stats = PerformanceStats::from_records(&records);
        assert_eq!(stats.attempts, 2);
        assert_eq!(stats.total_correct, 6);
        assert_eq!(stats.total_incorrect, 4);
        assert_eq!(stats.mean_percentage, 60);
        assert_eq!(stats.best_percentage, 80);
    }

    #[tokio::test]
    async fn exam_filter_trims_the_page_and_the_stats() {
        let api = InMemoryApi::new();
        let user = UserId::new(7);
        api.add_records(
            user,
            vec![
                build_record(1, 1, 5, 5),
                build_record(2, 2, 1, 5),
                build_record(3, 1, 3, 5),
            ],
        );
        let service = PerformanceService::new(Arc::new(api));

        let filter = HistoryFilter {
            exam: Some(ExamId::new(1)),
            difficulty: None,
        };
        let page = service.history_page(user, 1, filter).await.unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.stats.attempts, 2);
        assert_eq!(page.stats.best_percentage, 100);
        assert!(!page.may_have_more);
    }

    #[tokio::test]
    async fn a_full_page_signals_more() {
        let api = InMemoryApi::new();
        let user = UserId::new(7);
        api.add_records(user, (1..=12).map(|i| build_record(i, 1, 3, 5)));
        let service = PerformanceService::new(Arc::new(api));

        let first = service
            .history_page(user, 1, HistoryFilter::default())
            .await
            .unwrap();
        assert_eq!(first.records.len(), 10);
        assert!(first.may_have_more);

        let second = service
            .history_page(user, 2, HistoryFilter::default())
            .await
            .unwrap();
        assert_eq!(second.records.len(), 2);
        assert!(!second.may_have_more);
    }
}
