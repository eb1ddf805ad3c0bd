mod app;
mod command;
mod config;
mod consts;
mod engine;
mod game;
mod leaderboard;
mod menu;
mod options;
mod standings;
mod util;
mod warning;
use crate::app::App;
use crate::config::Config;
use crate::leaderboard::Leaderboard;
use crate::options::GameMode;
use crate::util::Globals;
use crate::warning::{error_chain, Warning};
use anyhow::Context;
use env_logger::{Env, Target};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit status for command-line and configuration errors
const USAGE_ERROR: u8 = 1;

/// Exit status for terminal I/O errors
const IO_ERROR: u8 = 2;

#[derive(Clone, Debug, Eq, PartialEq)]
enum CliCommand {
    Run(Arguments),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    /// Configuration file given on the command line
    config: Option<PathBuf>,
    /// Start with endless mode selected
    endless: bool,
}

impl CliCommand {
    fn from_parser(mut parser: lexopt::Parser) -> Result<CliCommand, lexopt::Error> {
        use lexopt::Arg::{Long, Short};
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Long("config") => args.config = Some(PathBuf::from(parser.value()?)),
                Long("endless") => args.endless = true,
                Short('h') | Long("help") => return Ok(CliCommand::Help),
                Short('V') | Long("version") => return Ok(CliCommand::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(CliCommand::Run(args))
    }
}

const USAGE: &str = "\
Usage: snakeboard [--config <path>] [--endless]

Play snake in the terminal and keep a local leaderboard of the best scores.

Options:
  --config <path>   Read configuration from the given file
  --endless         Start with endless mode selected
  -h, --help        Show this help and exit
  -V, --version     Show the program version and exit
";

fn main() -> ExitCode {
    let args = match CliCommand::from_parser(lexopt::Parser::from_env()) {
        Ok(CliCommand::Run(args)) => args,
        Ok(CliCommand::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(CliCommand::Version) => {
            println!("snakeboard {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("snakeboard: {e}");
            eprintln!("Run `snakeboard --help` for usage.");
            return ExitCode::from(USAGE_ERROR);
        }
    };
    let (globals, warnings) = match setup(args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("snakeboard: {e:?}");
            return ExitCode::from(USAGE_ERROR);
        }
    };
    let terminal = ratatui::init();
    let r = App::new(globals, warnings).run(terminal);
    ratatui::restore();
    log::debug!("Exiting");
    io_exit(r)
}

/// Load the configuration and the leaderboard and start logging.  Problems
/// with the log or leaderboard files are returned as warnings to show once
/// the interface is up; only a bad configuration is fatal.
fn setup(args: Arguments) -> anyhow::Result<(Globals, Vec<Warning>)> {
    let config = match args.config {
        Some(ref path) => Config::load(path, false)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => {
            let path = Config::default_path()?;
            Config::load(&path, true)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
    };
    let log_warning = match config.files.log_file() {
        Some(path) => init_logging(&path).err().map(|e| Warning::new(&e)),
        None => None,
    };
    log::info!("Starting snakeboard {}", env!("CARGO_PKG_VERSION"));
    let (leaderboard, board_warning) = load_leaderboard(config.files.leaderboard_file());
    let mut options = config.options;
    if args.endless {
        options.mode = GameMode::Endless;
    }
    let globals = Globals {
        options,
        config,
        leaderboard,
    };
    let warnings = log_warning.into_iter().chain(board_warning).collect();
    Ok((globals, warnings))
}

fn load_leaderboard(path: Option<PathBuf>) -> (Leaderboard, Option<Warning>) {
    let Some(path) = path else {
        log::warn!("Could not determine leaderboard path; scores will not be saved");
        return (Leaderboard::in_memory(), None);
    };
    match Leaderboard::load(path) {
        Ok(board) => {
            if let Some(p) = board.path() {
                log::info!("Using leaderboard at {}", p.display());
            }
            (board, None)
        }
        Err(e) => {
            log::warn!("{}", error_chain(&e).join(": "));
            (Leaderboard::in_memory(), Some(Warning::new(&e)))
        }
    }
}

/// Send log messages to the file at `path`, filtered by the
/// `SNAKEBOARD_LOG` environment variable
fn init_logging(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    env_logger::Builder::from_env(Env::new().filter_or("SNAKEBOARD_LOG", "warn"))
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("snakeboard: {e}");
            ExitCode::from(IO_ERROR)
        }
    }
}
