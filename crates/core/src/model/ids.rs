use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

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

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new id from its raw value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying u64 value.
            #[must_use]
            pub const fn value(&self) -> u64 {
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

entity_id! {
    /// Unique identifier for a User
    UserId
}

entity_id! {
    /// Unique identifier for a Course
    CourseId
}

entity_id! {
    /// Unique identifier for a course Module
    ModuleId
}

entity_id! {
    /// Unique identifier for a Lesson
    LessonId
}

entity_id! {
    /// Unique identifier for an Assessment
    AssessmentId
}

entity_id! {
    /// Unique identifier for a Question
    QuestionId
}

entity_id! {
    /// Unique identifier for a choice Option within a question
    OptionId
}

entity_id! {
    /// Unique identifier for a Notification
    NotificationId
}

entity_id! {
    /// Unique identifier for a forum Thread
    ThreadId
}

entity_id! {
    /// Unique identifier for a forum Reply
    ReplyId
}

entity_id! {
    /// Unique identifier for a calendar Event
    EventId
}

/// Unique identifier for an assessment attempt.
///
/// Attempts are minted at submit time rather than seeded, so they carry a
/// random uuid instead of a fixture-assigned integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttemptId(Uuid);

impl AttemptId {
    /// Generates a fresh random attempt id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing uuid.
    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying uuid.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttemptId({})", self.0)
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AttemptId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(AttemptId::from_uuid)
            .map_err(|_| ParseIdError { kind: "AttemptId" })
    }
}

//
// ─── Tests ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_id_display() {
        let id = CourseId::new(42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn question_id_from_str() {
        let id: QuestionId = "123".parse().unwrap();
        assert_eq!(id, QuestionId::new(123));
    }

    #[test]
    fn question_id_from_str_invalid() {
        let result = "not-a-number".parse::<QuestionId>();
        assert!(result.is_err());
    }

    #[test]
    fn id_debug_includes_kind() {
        let id = LessonId::new(7);
        assert_eq!(format!("{id:?}"), "LessonId(7)");
    }

    #[test]
    fn id_roundtrip() {
        let original = UserId::new(42);
        let serialized = original.to_string();
        let deserialized: UserId = serialized.parse().unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn attempt_id_roundtrip() {
        let original = AttemptId::generate();
        let deserialized: AttemptId = original.to_string().parse().unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn attempt_id_from_str_invalid() {
        assert!("not-a-uuid".parse::<AttemptId>().is_err());
    }
}
