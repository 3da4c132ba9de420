use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{ArgAction, Parser};
use mana::{
    errors::errors::{Error, ErrorTip},
    get_line_at_position, parse, tokenize,
};
use rustyline::{error::ReadlineError, DefaultEditor};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const PROMPT: &str = ">> ";

/// Parses Mana source and prints it back in canonical form.
#[derive(Debug, Parser)]
#[command(name = "mana", version, about = "Mana language front end")]
struct Cli {
    /// Source file to parse. Starts an interactive prompt when omitted
    file: Option<PathBuf>,

    /// Print the token stream instead of the parsed program
    #[arg(long)]
    tokens: bool,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.file {
        Some(path) => run_file(path, cli.tokens),
        None => run_prompt(cli.tokens),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn directive_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "mana=warn",
        1 => "mana=debug",
        _ => "mana=trace",
    }
}

/// Returns whether the file parsed without errors.
fn run_file(path: &Path, show_tokens: bool) -> Result<bool, DriverError> {
    let source = fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    info!(file = %path.display(), bytes = source.len(), "parsing file");

    if show_tokens {
        print_tokens(&source, file_name);
        return Ok(true);
    }

    let (program, errors) = parse(&source, file_name);
    if errors.is_empty() {
        println!("{program}");
        return Ok(true);
    }

    let display_name = path.display().to_string();
    for error in &errors {
        display_error(error, &source, &display_name);
    }

    Ok(false)
}

fn run_prompt(show_tokens: bool) -> Result<bool, DriverError> {
    let mut editor = DefaultEditor::new()?;

    println!("Welcome to the Mana prompt! Input is parsed and printed back.");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str())?;

                if show_tokens {
                    print_tokens(&line, None);
                    continue;
                }

                let (program, errors) = parse(&line, None);
                if errors.is_empty() {
                    println!("{program}");
                } else {
                    println!("ParseError:");
                    for error in &errors {
                        println!("\t{error}");
                    }
                }
            }
            // Ctrl+C drops the current line
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error.into()),
        }
    }

    debug!("prompt closed");
    Ok(true)
}

fn print_tokens(source: &str, file: Option<String>) {
    for token in tokenize(source, file) {
        println!(
            "{:>5}..{:<5} {}",
            token.span.start.0, token.span.end.0, token
        );
    }
}

fn display_error(error: &Error, source: &str, file: &str) {
    /*
        Error[UnexpectedToken]: expected next token to be =, got INT instead
        -> main.mana:2:7
          |
        2 | let y 2;
          | ------^
    */

    match error.get_tip() {
        ErrorTip::None => eprintln!("Error[{}]: {}", error.get_error_name(), error),
        tip => eprintln!("Error[{}]: {} ({})", error.get_error_name(), error, tip),
    }

    let Some((line, line_text, line_pos)) = get_line_at_position(source, error.get_position().0)
    else {
        eprintln!("-> {file}");
        return;
    };

    // Caret column counts characters, not bytes
    let column = line_text
        .get(..line_pos)
        .map_or(line_pos, |prefix| prefix.chars().count());

    let line_str = line.to_string();
    let padding = line_str.len() + 2;

    eprintln!("-> {}:{}:{}", file, line, column + 1);
    eprintln!("{:>padding$}", "|");

    let text = line_text.trim_end();
    let indent = text.chars().take_while(|c| c.is_whitespace()).count();
    eprintln!("{} | {}", line_str, text.trim_start());

    let arrows = column.saturating_sub(indent) + 1;
    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}
