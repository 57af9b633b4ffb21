mod answer;
mod assessment;
mod attempt;
mod calendar;
mod course;
mod forum;
mod ids;
mod notification;
mod progress;
mod user;

pub use ids::{
    AssessmentId, AttemptId, CourseId, EventId, LessonId, ModuleId, NotificationId, OptionId,
    ParseIdError, QuestionId, ReplyId, ThreadId, UserId,
};

pub use answer::AnswerValue;
pub use assessment::{Assessment, AssessmentError, ChoiceOption, Question, QuestionKind};
pub use attempt::{AssessmentAttempt, AttemptError, SubmissionKind, SubmittedAnswer};
pub use calendar::{CalendarError, CalendarEvent, EventKind};
pub use course::{
    Course, CourseError, CourseLevel, CourseModule, CourseStatus, Lesson, LessonContent,
};
pub use forum::{ForumError, ForumReply, ForumThread};
pub use notification::{Notification, NotificationError, NotificationKind};
pub use progress::CourseProgress;
pub use user::{Role, User, UserError, UserStatus};
