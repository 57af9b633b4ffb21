#![forbid(unsafe_code)]

pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod forum;
pub mod learning;
pub mod notifications;
pub mod sessions;

pub use campus_core::Clock;

pub use error::{
    CatalogError, DashboardError, ForumServiceError, LearningError, NotificationServiceError,
    SessionError,
};

pub use catalog::{CatalogFilter, CatalogService};
pub use dashboard::{CourseProgressItem, DashboardOverview, DashboardService};
pub use forum::ForumService;
pub use learning::{CourseProgressView, LearningService, LessonOutcome};
pub use notifications::NotificationService;

pub use sessions::{
    AssessmentDirectory, AssessmentOverview, AssessmentSession, ManualTicker, SessionRunner,
    SessionSnapshot, TickOutcome, Ticker, TokioTicker,
};
