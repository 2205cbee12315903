use prep_core::model::AttemptRecord;
use services::PerformanceStats;

use crate::vm::time_fmt::{format_datetime, format_elapsed};

/// One row of the attempt-history table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub started_at_str: String,
    pub scope: String,
    pub score: String,
    pub percentage: u32,
    pub duration: String,
}

impl From<&AttemptRecord> for HistoryRowVm {
    fn from(record: &AttemptRecord) -> Self {
        let scope = match record.difficulty {
            Some(difficulty) => format!("Topic practice ({})", difficulty.as_str()),
            None => "Section practice".to_string(),
        };
        Self {
            started_at_str: format_datetime(record.started_at),
            scope,
            score: format!("{} / {}", record.score, record.total_questions),
            percentage: record.percentage(),
            duration: format_elapsed(record.total_time_seconds),
        }
    }
}

#[must_use]
pub fn map_history_rows(records: &[AttemptRecord]) -> Vec<HistoryRowVm> {
    records.iter().map(HistoryRowVm::from).collect()
}

#[must_use]
pub fn stats_line(stats: &PerformanceStats) -> String {
    if stats.attempts == 0 {
        return "No attempts yet.".to_string();
    }
    format!(
        "{} attempts · {} correct · {} incorrect · avg {}% · best {}%",
        stats.attempts,
        stats.total_correct,
        stats.total_incorrect,
        stats.mean_percentage,
        stats.best_percentage
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use prep_core::model::{AttemptId, Difficulty, ExamId, SectionId, SyllabusId};

    fn build_record(difficulty: Option<Difficulty>) -> AttemptRecord {
        let started = chrono::Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        AttemptRecord {
            id: AttemptId::new(1),
            exam: ExamId::new(1),
            section: SectionId::new(2),
            syllabus: difficulty.map(|_| SyllabusId::new(3)),
            difficulty,
            score: 4,
            total_questions: 5,
            total_time_seconds: 125,
            started_at: started,
            ended_at: Some(started),
        }
    }

    #[test]
    fn rows_label_the_practice_scope() {
        let rows = map_history_rows(&[
            build_record(Some(Difficulty::Hard)),
            build_record(None),
        ]);
        assert_eq!(rows[0].scope, "Topic practice (hard)");
        assert_eq!(rows[1].scope, "Section practice");
        assert_eq!(rows[0].score, "4 / 5");
        assert_eq!(rows[0].percentage, 80);
        assert_eq!(rows[0].duration, "2:05");
    }

    #[test]
    fn stats_line_handles_the_empty_dashboard() {
        assert_eq!(stats_line(&PerformanceStats::default()), "No attempts yet.");
    }
}
