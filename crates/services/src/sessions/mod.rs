mod answers;
mod cursor;
mod directory;
mod progress;
mod runner;
mod session;
mod ticker;
mod timer;

// Public API of the assessment session subsystem.
pub use crate::error::SessionError;
pub use answers::AnswerSheet;
pub use cursor::QuestionCursor;
pub use directory::{AssessmentDirectory, AssessmentOverview};
pub use progress::{QuestionState, SessionSnapshot};
pub use runner::{SessionRunner, TICK_PERIOD};
pub use session::{AssessmentSession, TickOutcome};
pub use ticker::{ManualTicker, TickCallback, TickControl, Ticker, TickerGuard, TokioTicker};
pub use timer::{CountdownTimer, TimerState, TimerTick};
