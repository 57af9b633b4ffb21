use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use campus_core::Clock;
use campus_core::model::{
    AnswerValue, AssessmentId, Question, QuestionKind, UserId,
};
use services::sessions::{AssessmentDirectory, SessionRunner, TokioTicker};
use services::{CatalogService, DashboardService};
use storage::fixtures::{self, seed_demo};
use storage::repository::Storage;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidId { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidId { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- catalog");
    eprintln!("  cargo run -p app -- dashboard [--student-id <id>]");
    eprintln!("  cargo run -p app -- quiz [--assessment-id <id>] [--student-id <id>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --assessment-id 1   (the seeded HTML & CSS final)");
    eprintln!("  --student-id 4      (the seeded student Ana)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CAMPUS_ASSESSMENT_ID, CAMPUS_STUDENT_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Catalog,
    Dashboard,
    Quiz,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "catalog" => Some(Self::Catalog),
            "dashboard" => Some(Self::Dashboard),
            "quiz" => Some(Self::Quiz),
            _ => None,
        }
    }
}

struct Args {
    assessment_id: AssessmentId,
    student_id: UserId,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut assessment_id = std::env::var("CAMPUS_ASSESSMENT_ID")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or(fixtures::ids::EXAM_HTML_CSS, AssessmentId::new);
        let mut student_id = std::env::var("CAMPUS_STUDENT_ID")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or(fixtures::ids::STUDENT_ANA, UserId::new);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--assessment-id" => {
                    let value = require_value(args, "--assessment-id")?;
                    let parsed: u64 = value.parse().map_err(|_| ArgsError::InvalidId {
                        flag: "--assessment-id",
                        raw: value.clone(),
                    })?;
                    assessment_id = AssessmentId::new(parsed);
                }
                "--student-id" => {
                    let value = require_value(args, "--student-id")?;
                    let parsed: u64 = value.parse().map_err(|_| ArgsError::InvalidId {
                        flag: "--student-id",
                        raw: value.clone(),
                    })?;
                    student_id = UserId::new(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            assessment_id,
            student_id,
        })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Catalog,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Catalog,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Everything runs against seeded in-memory fixtures; there is no
    // persistent state between invocations.
    let clock = Clock::default_clock();
    let storage = Storage::in_memory();
    seed_demo(&storage, Utc::now()).await?;
    tracing::info!("in-memory storage seeded with demo fixtures");

    match cmd {
        Command::Catalog => show_catalog(&storage).await,
        Command::Dashboard => show_dashboard(&storage, clock, args.student_id).await,
        Command::Quiz => run_quiz(&storage, clock, args).await,
    }
}

async fn show_catalog(storage: &Storage) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = CatalogService::new(Arc::clone(&storage.courses));
    for course in catalog.published().await? {
        println!(
            "#{:<3} {:<35} {:<12} {:?}, {} lessons, {} min",
            course.id(),
            course.title(),
            course.category(),
            course.level(),
            course.lesson_count(),
            course.duration_mins(),
        );
    }
    Ok(())
}

async fn show_dashboard(
    storage: &Storage,
    clock: Clock,
    student_id: UserId,
) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = DashboardService::new(
        clock,
        Arc::clone(&storage.courses),
        Arc::clone(&storage.progress),
        Arc::clone(&storage.notifications),
        Arc::clone(&storage.events),
    );
    let overview = dashboard.overview(student_id).await?;

    println!("courses in progress: {}", overview.courses.len());
    for item in &overview.courses {
        println!(
            "  {:<35} {}/{} lessons ({:.0}%)",
            item.title,
            item.completed,
            item.total,
            item.fraction * 100.0
        );
    }
    println!("lessons completed:   {}", overview.lessons_completed);
    println!("unread alerts:       {}", overview.unread_notifications);
    for event in &overview.upcoming_events {
        println!("  upcoming: {} on {}", event.title(), event.date());
    }
    Ok(())
}

/// Scripted walk through a timed session: confirm the start screen,
/// answer every question with a demo value, finish by hand.
async fn run_quiz(
    storage: &Storage,
    clock: Clock,
    args: Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let directory = AssessmentDirectory::new(
        Arc::clone(&storage.assessments),
        Arc::clone(&storage.attempts),
    );
    let overview = directory.overview(args.assessment_id, args.student_id).await?;
    println!(
        "{}: {} questions, {} min, attempts left: {}",
        overview.title,
        overview.question_count,
        overview.time_limit_mins,
        overview.attempts_remaining
    );

    let mut runner = SessionRunner::new(
        clock,
        Arc::clone(&storage.assessments),
        Arc::clone(&storage.attempts),
        Arc::new(TokioTicker::new()),
    );
    runner.begin(args.assessment_id, args.student_id).await?;

    for index in 0..overview.question_count {
        runner.jump_to(index)?;
        let question = runner.current_question()?;
        println!("[{}] {}", index + 1, question.prompt());
        runner.answer_current(demo_answer(&question))?;
    }

    let attempt = runner
        .submit()
        .await?
        .ok_or("no active session to submit")?;
    println!(
        "submitted attempt {} ({} of {} answered)",
        attempt.id(),
        attempt.answered_count(),
        overview.question_count
    );
    Ok(())
}

/// Picks the first option of choice questions, types a canned line for
/// short answers. The demo takes the quiz, it does not ace it.
fn demo_answer(question: &Question) -> AnswerValue {
    match question.kind() {
        QuestionKind::SingleChoice | QuestionKind::TrueFalse => question
            .options()
            .first()
            .map_or_else(|| AnswerValue::text(""), |o| AnswerValue::choice(o.id())),
        QuestionKind::ShortAnswer => AnswerValue::text("Answered by the demo walkthrough."),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
