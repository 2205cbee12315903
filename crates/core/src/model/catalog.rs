use thiserror::Error;

use crate::model::ids::{ExamId, SectionId, SyllabusId};

/// Errors for catalog entities fetched from the server.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogItemError {
    #[error("catalog item name is empty")]
    EmptyName,
}

//
// ─── EXAM ──────────────────────────────────────────────────────────────────────
//

/// A top-level exam (e.g. one olympiad), optionally scoped to a school grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exam {
    id: ExamId,
    name: String,
    grade: Option<u8>,
    description: String,
}

impl Exam {
    /// # Errors
    ///
    /// Returns `CatalogItemError::EmptyName` for a blank name.
    pub fn new(
        id: ExamId,
        name: impl Into<String>,
        grade: Option<u8>,
        description: impl Into<String>,
    ) -> Result<Self, CatalogItemError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogItemError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            grade,
            description: description.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> ExamId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn grade(&self) -> Option<u8> {
        self.grade
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// A subject area within an exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    exam_id: ExamId,
    name: String,
}

impl Section {
    /// # Errors
    ///
    /// Returns `CatalogItemError::EmptyName` for a blank name.
    pub fn new(
        id: SectionId,
        exam_id: ExamId,
        name: impl Into<String>,
    ) -> Result<Self, CatalogItemError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogItemError::EmptyName);
        }
        Ok(Self { id, exam_id, name })
    }

    #[must_use]
    pub fn id(&self) -> SectionId {
        self.id
    }

    #[must_use]
    pub fn exam_id(&self) -> ExamId {
        self.exam_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

//
// ─── SYLLABUS TOPIC ────────────────────────────────────────────────────────────
//

/// A leaf topic grouping questions under a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyllabusTopic {
    id: SyllabusId,
    section_id: SectionId,
    name: String,
}

impl SyllabusTopic {
    /// # Errors
    ///
    /// Returns `CatalogItemError::EmptyName` for a blank name.
    pub fn new(
        id: SyllabusId,
        section_id: SectionId,
        name: impl Into<String>,
    ) -> Result<Self, CatalogItemError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogItemError::EmptyName);
        }
        Ok(Self {
            id,
            section_id,
            name,
        })
    }

    #[must_use]
    pub fn id(&self) -> SyllabusId {
        self.id
    }

    #[must_use]
    pub fn section_id(&self) -> SectionId {
        self.section_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert!(Exam::new(ExamId::new(1), "  ", None, "").is_err());
        assert!(Section::new(SectionId::new(1), ExamId::new(1), "").is_err());
        assert!(SyllabusTopic::new(SyllabusId::new(1), SectionId::new(1), " ").is_err());
    }

    #[test]
    fn exam_keeps_grade() {
        let exam = Exam::new(ExamId::new(3), "IMO Prep", Some(9), "Level 1").unwrap();
        assert_eq!(exam.grade(), Some(9));
        assert_eq!(exam.name(), "IMO Prep");
    }
}
