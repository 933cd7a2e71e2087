use clap::{ArgAction, Parser};
use helis::{Editor, Error, StdinRawMode};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "helis", about, version)]
struct Options {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Increase logging verbosity (repeat for more detail)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,

    /// Write logs to a file. Nothing is logged without this option
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn setup_logger(verbosity: u8, path: &Path) -> helis::Result<()> {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(fern::log_file(path)?)
        .apply()
        .map_err(|err| Error::Logger(err.to_string()))
}

fn run(options: Options) -> helis::Result<()> {
    if let Some(path) = &options.log_file {
        setup_logger(options.verbosity, path)?;
    }
    log::info!("helis {} started", helis::VERSION);

    // Terminal raw mode is restored when input is dropped
    let input = StdinRawMode::new()?.input_keys();
    let output = io::stdout();
    let window_size = term_size::dimensions_stdout();

    let mut editor = match &options.file {
        Some(path) => Editor::open(input, output, window_size, path)?,
        None => Editor::new(input, output, window_size)?,
    };
    editor.edit()
}

fn main() -> ExitCode {
    let options = Options::parse();
    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
