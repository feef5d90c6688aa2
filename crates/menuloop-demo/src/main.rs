//! `menuloop-demo`: a small address book driven by a text menu.
//!
//! ```text
//! menuloop-demo [--attempts N] [--prompt TEXT] [--fault-log PATH] [--log-level LEVEL]
//! ```
//!
//! Flags override `MENULOOP_ATTEMPTS`, `MENULOOP_PROMPT` and
//! `MENULOOP_FAULT_LOG`.

mod contacts;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use menuloop_dispatch::{FaultJournal, Menu, MenuDispatcher, MenuItem, Session, SessionConfig};
use menuloop_input::{EnvReader, RealEnv, ReaderConfig, TerminalIO, ValidatedReader};

use crate::contacts::Book;

#[derive(Parser, Debug)]
#[command(name = "menuloop-demo", version, about = "A small address book driven by a text menu")]
struct Cli {
    /// Attempts allowed for each typed input (0 or less means 3)
    #[arg(long, allow_negative_numbers = true)]
    attempts: Option<i64>,

    /// Prompt shown above the main menu
    #[arg(long)]
    prompt: Option<String>,

    /// Append captured faults to this JSON-lines file
    #[arg(long)]
    fault_log: Option<PathBuf>,

    /// Log level written to stderr (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// CSV file read by the import operation (name,email,phone per line)
    #[arg(long, default_value = "contacts.csv")]
    import: PathBuf,

    /// File written by the save operation
    #[arg(long, default_value = "contacts.json")]
    save: PathBuf,

    /// Revoke the save operation
    #[arg(long)]
    read_only: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli.log_level.parse().unwrap_or(LevelFilter::Warn);
    env_logger::Builder::new().filter_level(level).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
fn run(cli: Cli) -> anyhow::Result<()> {
    let mut dispatcher = dispatcher(&cli, &RealEnv, ValidatedReader::new());
    log::info!(
        "starting with {} attempt(s), journal {:?}",
        dispatcher.reader().attempts(),
        dispatcher.session().journal().map(|j| j.path())
    );

    let book = Book::new();
    let summary = book.clone();
    dispatcher.session_mut().set_finalizer(move || {
        println!(
            "{} contact(s), {} favourite(s). Unsaved changes are lost.",
            summary.count(),
            summary.favourites().len()
        );
    });

    let reader = dispatcher.reader().clone();
    let mut menu = menu(&cli, &book, &reader);
    match dispatcher.run(&mut menu) {
        Ok(flow) => {
            log::debug!("menu finished: {:?}", flow);
            Ok(())
        }
        Err(err) if err.is_closed() => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Configure `reader` and a session from `env`, then apply the flags on top.
fn dispatcher<T: TerminalIO>(
    cli: &Cli,
    env: &impl EnvReader,
    reader: ValidatedReader<T>,
) -> MenuDispatcher<T> {
    let mut reader = reader.config(ReaderConfig::from_env(env));
    if let Some(attempts) = cli.attempts {
        reader.set_attempts(attempts);
    }
    let mut session = Session::from_config(SessionConfig::from_env(env));
    if let Some(prompt) = &cli.prompt {
        session.set_default_prompt(prompt.as_str());
    }
    if let Some(path) = &cli.fault_log {
        session.set_journal(Some(FaultJournal::new(path)));
    }
    MenuDispatcher::with_reader(reader).with_session(session)
}

fn menu<'a, T: TerminalIO>(
    cli: &'a Cli,
    book: &'a Book,
    reader: &'a ValidatedReader<T>,
) -> Menu<'a> {
    let mut menu = Menu::new()
        .item(MenuItem::new("a", "Add a contact", move || book.add(reader)))
        .item(MenuItem::new("l", "List contacts", move || book.list(reader)))
        .item(MenuItem::new("c", "Contacts by category", move || book.by_category(reader)))
        .item(MenuItem::new("f", "Pick a favourite", move || book.pick_favourite(reader)))
        .item(MenuItem::new("g", "Group email", move || book.group_email(reader)))
        .item(MenuItem::new("i", "Import contacts", move || book.import(&cli.import)))
        .item(MenuItem::named("s", "Save contacts", "save"))
        .item(MenuItem::new("!", "Crash test", || -> () {
            panic!("crash test requested");
        }))
        .operation("save", move || book.save(&cli.save));
    if cli.read_only {
        menu.operations_mut().revoke("save");
    }
    menu
}

#[cfg(test)]
mod tests {
    use super::*;
    use menuloop_dispatch::{ExitPolicy, FaultKind, Outcome, PROMPT_VAR};
    use menuloop_input::env::ATTEMPTS_VAR;
    use menuloop_input::{MockEnv, MockTerminal};
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("menuloop-demo").chain(args.iter().copied())).unwrap()
    }

    fn env() -> MockEnv {
        MockEnv::new()
            .with_var(ATTEMPTS_VAR, "5")
            .with_var(PROMPT_VAR, "From the environment")
    }

    fn scripted(responses: &[&str]) -> ValidatedReader<MockTerminal> {
        ValidatedReader::with_terminal(MockTerminal::with_responses(responses.iter().copied()))
    }

    #[test]
    fn flags_override_environment() {
        let cli = cli(&["--attempts", "2", "--prompt", "From a flag"]);
        let d = dispatcher(&cli, &env(), scripted(&[]));
        assert_eq!(d.reader().attempts(), 2);
        assert_eq!(d.session().default_prompt(), "From a flag");
    }

    #[test]
    fn environment_applies_without_flags() {
        let cli = cli(&[]);
        let d = dispatcher(&cli, &env(), scripted(&[]));
        assert_eq!(d.reader().attempts(), 5);
        assert_eq!(d.session().default_prompt(), "From the environment");
        assert!(d.session().journal().is_none());
    }

    #[test]
    fn non_positive_attempts_flag_falls_back() {
        let cli = cli(&["--attempts", "-1"]);
        let d = dispatcher(&cli, &MockEnv::new(), scripted(&[]));
        assert_eq!(d.reader().attempts(), 3);
    }

    #[test]
    fn fault_log_flag_sets_journal() {
        let cli = cli(&["--fault-log", "faults.jsonl"]);
        let d = dispatcher(&cli, &MockEnv::new(), scripted(&[]));
        let journal = d.session().journal().map(|j| j.path().to_path_buf());
        assert_eq!(journal, Some(PathBuf::from("faults.jsonl")));
    }

    #[test]
    fn read_only_revokes_save() {
        let cli = cli(&["--read-only"]);
        let mut d =
            dispatcher(&cli, &MockEnv::new(), scripted(&["s"])).exit_policy(ExitPolicy::Report);
        let book = Book::new();
        let reader = d.reader().clone();
        let mut menu = menu(&cli, &book, &reader);

        let outcome = d.run_once_and_return(&mut menu).unwrap();
        assert_eq!(outcome, Outcome::Rejected(FaultKind::Inaccessible));
        assert!(d.reader().terminal().stderr().contains("Operation is inaccessible!"));
    }

    #[test]
    fn save_writes_book() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("book.json");
        let cli = cli(&["--save", out.to_str().unwrap()]);
        let mut d = dispatcher(&cli, &MockEnv::new(), scripted(&["s"]));
        let book = Book::new();
        let reader = d.reader().clone();
        let mut menu = menu(&cli, &book, &reader);

        let outcome = d.run_once_and_return(&mut menu).unwrap();
        assert_eq!(outcome, Outcome::Completed(()));
        assert!(out.exists());
    }
}
