use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use crate::model::ids::{CourseId, EventId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CalendarError {
    #[error("event title cannot be empty")]
    EmptyTitle,

    #[error("event ends before it starts")]
    InvalidTimeRange,
}

/// What kind of entry a calendar cell renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Class,
    Deadline,
    Assessment,
    Other,
}

/// An entry on the shared course calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    id: EventId,
    title: String,
    description: Option<String>,
    date: NaiveDate,
    starts_at: Option<NaiveTime>,
    ends_at: Option<NaiveTime>,
    kind: EventKind,
    course_id: Option<CourseId>,
}

impl CalendarEvent {
    /// Creates an all-day event; use `with_times` for a timed slot.
    ///
    /// # Errors
    ///
    /// Returns `CalendarError::EmptyTitle` for a blank title.
    pub fn new(
        id: EventId,
        title: impl Into<String>,
        date: NaiveDate,
        kind: EventKind,
    ) -> Result<Self, CalendarError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(CalendarError::EmptyTitle);
        }

        Ok(Self {
            id,
            title,
            description: None,
            date,
            starts_at: None,
            ends_at: None,
            kind,
            course_id: None,
        })
    }

    /// Attach a start/end time slot.
    ///
    /// # Errors
    ///
    /// Returns `CalendarError::InvalidTimeRange` if `ends` precedes `starts`.
    pub fn with_times(mut self, starts: NaiveTime, ends: NaiveTime) -> Result<Self, CalendarError> {
        if ends < starts {
            return Err(CalendarError::InvalidTimeRange);
        }
        self.starts_at = Some(starts);
        self.ends_at = Some(ends);
        Ok(self)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_course(mut self, course_id: CourseId) -> Self {
        self.course_id = Some(course_id);
        self
    }

    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn starts_at(&self) -> Option<NaiveTime> {
        self.starts_at
    }

    #[must_use]
    pub fn ends_at(&self) -> Option<NaiveTime> {
        self.ends_at
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    #[must_use]
    pub fn course_id(&self) -> Option<CourseId> {
        self.course_id
    }

    /// True when the event date falls on or after the given instant's date.
    #[must_use]
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date >= now.date_naive()
    }
}
