use std::sync::Arc;

use api::gateway::CatalogGateway;
use prep_core::model::{
    Difficulty, Exam, ExamId, Question, Section, SectionId, SyllabusId, SyllabusTopic,
};

use crate::error::CatalogError;

/// Read-only access to the exam catalog.
///
/// These are the data-load paths behind the catalog screens, so failures
/// surface to the caller rather than being swallowed.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogGateway>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogGateway>) -> Self {
        Self { catalog }
    }

    /// Every exam, optionally narrowed to one grade. Exams without a grade
    /// are shown regardless of the filter.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the fetch fails.
    pub async fn list_exams(&self, grade: Option<u8>) -> Result<Vec<Exam>, CatalogError> {
        let mut exams = self.catalog.list_exams().await?;
        if let Some(grade) = grade {
            exams.retain(|exam| exam.grade().is_none_or(|g| g == grade));
        }
        Ok(exams)
    }

    /// The sections of one exam.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the fetch fails.
    pub async fn list_sections(&self, exam: ExamId) -> Result<Vec<Section>, CatalogError> {
        Ok(self.catalog.list_sections(exam).await?)
    }

    /// The syllabus topics of one section.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the fetch fails.
    pub async fn list_topics(&self, section: SectionId) -> Result<Vec<SyllabusTopic>, CatalogError> {
        Ok(self.catalog.list_topics(section).await?)
    }

    /// The question set for topic practice at one difficulty.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the fetch fails.
    pub async fn syllabus_questions(
        &self,
        syllabus: SyllabusId,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, CatalogError> {
        Ok(self.catalog.syllabus_questions(syllabus, difficulty).await?)
    }

    /// The question set for whole-section practice.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the fetch fails.
    pub async fn section_questions(
        &self,
        section: SectionId,
    ) -> Result<Vec<Question>, CatalogError> {
        Ok(self.catalog.section_questions(section).await?)
    }
}
