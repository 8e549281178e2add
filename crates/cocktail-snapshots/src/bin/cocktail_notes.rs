//! Convert plain-text cocktail notes into a bulk import file.
//!
//! This binary delegates to `cocktail_snapshots::notes_cli` for parsing and
//! conversion, keeping the CLI behaviour testable without spawning a process.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use cocktail_snapshots::notes_cli::{CliError, ParseOutcome, convert, parse_args, success_message};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    match parse_args(env::args().skip(1))? {
        ParseOutcome::Help => {
            print_usage(io::stdout().lock());
            Ok(())
        }
        ParseOutcome::Options(options) => {
            let conversion = convert(&options)?;
            let message = success_message(&conversion, options.output_path());
            if let Err(err) = writeln!(io::stdout().lock(), "{message}") {
                drop(err);
            }
            Ok(())
        }
    }
}

fn print_usage(mut out: impl Write) {
    let usage = concat!(
        "Usage: cocktail-notes --notes <path> [options]\n",
        "\n",
        "Options:\n",
        "  --notes <path>       Plain-text cocktail notes to convert\n",
        "  --output <path>      Import file to write (defaults to cocktailsOutput.json)\n",
        "  --keywords <path>    JSON table of ingredient tag keywords\n",
        "  -h, --help           Print this help output\n",
    );
    if let Err(err) = out.write_all(usage.as_bytes()) {
        drop(err);
    }
}
