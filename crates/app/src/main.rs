use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use melody_core::model::{LessonId, LessonOutcome, TopicId};
use services::{AppServices, Clock, NotificationSink, SoundSink};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { command: &'static str, name: &'static str },
    UnknownArg(String),
    InvalidNumber { name: &'static str, raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { command, name } => {
                write!(f, "{command} requires <{name}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { name, raw } => write!(f, "invalid {name} value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

fn require_argument(
    args: &mut impl Iterator<Item = String>,
    command: &'static str,
    name: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingArgument { command, name })
}

fn parse_number(raw: String, name: &'static str) -> Result<u32, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { name, raw })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app [--db <sqlite_url>] [--verbose] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  status                        print stored progress as JSON");
    eprintln!("  complete <lesson>             mark a lesson completed");
    eprintln!("  quiz <topic> <score> <total>  record a quiz score");
    eprintln!("  note <name>                   play a piano note, e.g. C4");
    eprintln!("  toggle-sound                  turn sound cues on or off");
    eprintln!("  reset                         delete all progress (asks first)");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://progress.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MELODY_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Status,
    Complete(LessonId),
    Quiz {
        topic: TopicId,
        score: u32,
        total: u32,
    },
    Note(String),
    ToggleSound,
    Reset,
}

struct Args {
    db_url: String,
    verbose: bool,
    command: Command,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("MELODY_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://progress.sqlite3".into(), normalize_sqlite_url);
        let mut verbose = false;
        let mut command = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                "status" if command.is_none() => command = Some(Command::Status),
                "complete" if command.is_none() => {
                    let lesson = require_argument(args, "complete", "lesson")?;
                    command = Some(Command::Complete(LessonId::new(lesson)));
                }
                "quiz" if command.is_none() => {
                    let topic = require_argument(args, "quiz", "topic")?;
                    let score = parse_number(require_argument(args, "quiz", "score")?, "score")?;
                    let total = parse_number(require_argument(args, "quiz", "total")?, "total")?;
                    command = Some(Command::Quiz {
                        topic: TopicId::new(topic),
                        score,
                        total,
                    });
                }
                "note" if command.is_none() => {
                    command = Some(Command::Note(require_argument(args, "note", "name")?));
                }
                "toggle-sound" if command.is_none() => command = Some(Command::ToggleSound),
                "reset" if command.is_none() => command = Some(Command::Reset),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            verbose,
            command: command.unwrap_or(Command::Status),
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Prints notifications to stdout and asks confirmations on stdin.
struct TerminalNotifier;

impl NotificationSink for TerminalNotifier {
    fn notify(&self, message: &str) {
        println!("{message}");
    }

    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// The terminal has no audio output; cues are reported in the log.
struct LogSoundSink;

impl SoundSink for LogSoundSink {
    fn play(&self, clip: &str) {
        tracing::info!(clip, "play sound");
    }
}

fn init_tracing(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing(parsed.verbose);

    // Keep file preparation in the binary glue so services stay storage-agnostic.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        Clock::default_clock(),
        Arc::new(TerminalNotifier),
        Arc::new(LogSoundSink),
    )
    .await?;

    match parsed.command {
        Command::Status => {
            let doc = services.progress().load().await?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Complete(lesson) => {
            let outcome = services.progress().complete_lesson(lesson).await?;
            tracing::debug!(?outcome, "complete finished");
            if outcome == LessonOutcome::Completed {
                let doc = services.progress().load().await?;
                println!(
                    "Streak: {} day(s), best {}",
                    doc.streak().current(),
                    doc.streak().best()
                );
            }
        }
        Command::Quiz {
            topic,
            score,
            total,
        } => {
            let result = services
                .progress()
                .record_quiz_score(topic.clone(), score, total)
                .await?;
            println!("{topic}: {}/{} ({}%)", result.score(), result.total(), result.percent());
        }
        Command::Note(name) => {
            services.sounds().play_note(&name).await?;
        }
        Command::ToggleSound => {
            services.app_settings().toggle_sound().await?;
        }
        Command::Reset => {
            if !services.progress().reset_with_confirmation().await? {
                println!("Reset cancelled.");
            }
        }
    }

    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn defaults_to_status() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.command, Command::Status);
        assert!(!args.verbose);
    }

    #[test]
    fn parses_quiz_command() {
        let args = parse(&["--db", "sqlite::memory:", "quiz", "theory", "8", "10"]).unwrap();
        assert_eq!(args.db_url, "sqlite::memory:");
        assert_eq!(
            args.command,
            Command::Quiz {
                topic: TopicId::new("theory"),
                score: 8,
                total: 10
            }
        );
    }

    #[test]
    fn rejects_non_numeric_score() {
        let err = parse(&["quiz", "theory", "eight", "10"]).err().unwrap();
        assert!(matches!(err, ArgsError::InvalidNumber { name: "score", .. }));
    }

    #[test]
    fn rejects_second_command() {
        let err = parse(&["status", "reset"]).err().unwrap();
        assert!(matches!(err, ArgsError::UnknownArg(ref arg) if arg == "reset"));
    }

    #[test]
    fn complete_requires_lesson() {
        let err = parse(&["complete"]).err().unwrap();
        assert!(matches!(
            err,
            ArgsError::MissingArgument {
                command: "complete",
                ..
            }
        ));
    }

    #[test]
    fn keeps_absolute_sqlite_urls() {
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/progress.db".to_string()),
            "sqlite:///tmp/progress.db"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:/tmp/p.db".to_string()),
            "sqlite:///tmp/p.db"
        );
    }
}
