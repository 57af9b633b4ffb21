use serde::Serialize;
use std::sync::Arc;

use campus_core::model::{Assessment, AssessmentId, CourseId, UserId};
use storage::repository::{AssessmentRepository, AttemptRepository};

use crate::error::SessionError;

/// Data for the pre-start screen of one assessment: everything the
/// student sees before confirming "begin".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentOverview {
    pub assessment_id: AssessmentId,
    pub title: String,
    pub description: String,
    pub question_count: usize,
    pub total_points: u32,
    pub time_limit_mins: u32,
    pub allowed_attempts: u32,
    pub attempts_used: u32,
    pub attempts_remaining: u32,
}

/// Read-side service for assessment listings and overviews.
#[derive(Clone)]
pub struct AssessmentDirectory {
    assessments: Arc<dyn AssessmentRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

impl AssessmentDirectory {
    #[must_use]
    pub fn new(
        assessments: Arc<dyn AssessmentRepository>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            assessments,
            attempts,
        }
    }

    /// Assessments of a course, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on storage failures.
    pub async fn course_assessments(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<Assessment>, SessionError> {
        let mut assessments = self.assessments.list_for_course(course_id).await?;
        assessments.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(assessments)
    }

    /// Pre-start overview of one assessment for one student, including
    /// how many attempts they have left.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the assessment is unknown or
    /// listing attempts fails.
    pub async fn overview(
        &self,
        assessment_id: AssessmentId,
        student_id: UserId,
    ) -> Result<AssessmentOverview, SessionError> {
        let assessment = self.assessments.get_assessment(assessment_id).await?;
        let used = self
            .attempts
            .list_attempts(assessment_id, student_id)
            .await?
            .len();
        let attempts_used = u32::try_from(used).unwrap_or(u32::MAX);

        Ok(AssessmentOverview {
            assessment_id,
            title: assessment.title().to_owned(),
            description: assessment.description().to_owned(),
            question_count: assessment.question_count(),
            total_points: assessment.total_points(),
            time_limit_mins: assessment.time_limit_mins(),
            allowed_attempts: assessment.allowed_attempts(),
            attempts_used,
            attempts_remaining: assessment.allowed_attempts().saturating_sub(attempts_used),
        })
    }
}
