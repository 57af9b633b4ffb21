use std::sync::Arc;

use campus_core::model::{Course, CourseId, CourseLevel};
use storage::repository::CourseRepository;

use crate::error::CatalogError;

/// Filter bar of the course list: any combination of category, level,
/// and a case-insensitive text search over title and description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
    pub search: Option<String>,
}

impl CatalogFilter {
    fn matches(&self, course: &Course) -> bool {
        if let Some(category) = &self.category {
            if !course.category().eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(level) = self.level {
            if course.level() != level {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let haystack =
                format!("{} {}", course.title(), course.description()).to_lowercase();
            if !haystack.contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Read-side service behind the course catalog screens.
///
/// Students only ever see published courses; drafts and archived courses
/// stay out of every listing here.
#[derive(Clone)]
pub struct CatalogService {
    courses: Arc<dyn CourseRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// All published courses, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on storage failures.
    pub async fn published(&self) -> Result<Vec<Course>, CatalogError> {
        let mut courses: Vec<_> = self
            .courses
            .list_courses()
            .await?
            .into_iter()
            .filter(Course::is_published)
            .collect();
        courses.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(courses)
    }

    /// Published courses matching the filter, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on storage failures.
    pub async fn filtered(&self, filter: &CatalogFilter) -> Result<Vec<Course>, CatalogError> {
        Ok(self
            .published()
            .await?
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect())
    }

    /// Distinct categories across published courses, sorted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on storage failures.
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let mut categories: Vec<String> = self
            .published()
            .await?
            .into_iter()
            .map(|c| c.category().to_owned())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    /// Full course detail, any status: teachers open their drafts too.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` with `NotFound` for an unknown id.
    pub async fn detail(&self, course_id: CourseId) -> Result<Course, CatalogError> {
        Ok(self.courses.get_course(course_id).await?)
    }
}
