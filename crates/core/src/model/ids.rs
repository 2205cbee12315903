use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from its raw value.
            #[must_use]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying u64 value.
            #[must_use]
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>().map($name::new).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                })
            }
        }
    };
}

id_type!(
    /// Unique identifier for a registered user.
    UserId
);
id_type!(
    /// Unique identifier for an exam.
    ExamId
);
id_type!(
    /// Unique identifier for a section within an exam.
    SectionId
);
id_type!(
    /// Unique identifier for a syllabus topic within a section.
    SyllabusId
);
id_type!(
    /// Unique identifier for a question.
    QuestionId
);
id_type!(
    /// Server-issued identifier for one practice attempt.
    AttemptId
);

// ─── FromStr Error ─────────────────────────────────────────────────────────────

/// Error type for parsing an ID from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_display() {
        let id = QuestionId::new(42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn question_id_from_str() {
        let id: QuestionId = "123".parse().unwrap();
        assert_eq!(id, QuestionId::new(123));
    }

    #[test]
    fn attempt_id_from_str_invalid() {
        let result = "not-a-number".parse::<AttemptId>();
        assert!(result.is_err());
    }

    #[test]
    fn exam_id_debug_names_the_type() {
        let id = ExamId::new(7);
        assert_eq!(format!("{id:?}"), "ExamId(7)");
    }

    #[test]
    fn id_roundtrip() {
        let original = AttemptId::new(42);
        let serialized = original.to_string();
        let deserialized: AttemptId = serialized.parse().unwrap();
        assert_eq!(original, deserialized);
    }
}
