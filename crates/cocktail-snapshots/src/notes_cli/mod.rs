//! CLI support for converting cocktail notes into an import file.
//!
//! The `cocktail-notes` binary delegates to these functions so the parsing
//! and conversion flow can be exercised without spawning a process.

mod error;

use std::path::{Path, PathBuf};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};

pub use self::error::CliError;
use crate::atomic_io::write_replace;
use crate::codec::encode;
use crate::notes::{TagKeywords, parse_notes};

/// Default name of the generated import file.
pub const DEFAULT_OUTPUT: &str = "cocktailsOutput.json";

/// Parsed options for the notes CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    notes_path: PathBuf,
    output_path: PathBuf,
    keywords_path: Option<PathBuf>,
}

impl Options {
    /// Path of the notes file to convert.
    #[must_use]
    pub fn notes_path(&self) -> &Path {
        &self.notes_path
    }

    /// Path the import file is written to.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Outcome of parsing CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Show help output and exit successfully.
    Help,
    /// Continue with the parsed options.
    Options(Options),
}

/// Summary of a completed conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Number of cocktails written.
    pub cocktails: usize,
    /// Number of ingredient lines written across all cocktails.
    pub ingredients: usize,
}

/// Parses CLI arguments.
///
/// # Errors
///
/// Returns [`CliError`] when `--notes` is missing, a flag lacks its value,
/// or an unknown argument is supplied.
///
/// # Example
///
/// ```
/// use cocktail_snapshots::notes_cli::{ParseOutcome, parse_args};
///
/// let args = ["--notes", "cocktailsNote.txt"].map(str::to_owned);
/// let ParseOutcome::Options(options) = parse_args(args.into_iter()).expect("parse") else {
///     panic!("expected options");
/// };
///
/// assert!(options.output_path().ends_with("cocktailsOutput.json"));
/// ```
pub fn parse_args<I>(mut args: I) -> Result<ParseOutcome, CliError>
where
    I: Iterator<Item = String>,
{
    let mut notes_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut keywords_path: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(ParseOutcome::Help),
            "--notes" => notes_path = Some(next_value(&mut args, "--notes")?.into()),
            "--output" => output_path = Some(next_value(&mut args, "--output")?.into()),
            "--keywords" => keywords_path = Some(next_value(&mut args, "--keywords")?.into()),
            _ => return Err(CliError::UnknownArgument { value: arg }),
        }
    }

    Ok(ParseOutcome::Options(Options {
        notes_path: notes_path.ok_or(CliError::MissingNotesPath)?,
        output_path: output_path.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        keywords_path,
    }))
}

fn next_value<I>(args: &mut I, flag: &'static str) -> Result<String, CliError>
where
    I: Iterator<Item = String>,
{
    args.next().ok_or(CliError::MissingValue { flag })
}

/// Converts the notes file named in `options` and writes the import file.
///
/// # Errors
///
/// Returns [`CliError`] when an input cannot be read, the keyword table is
/// malformed, or the output cannot be written.
pub fn convert(options: &Options) -> Result<Conversion, CliError> {
    let keywords = match &options.keywords_path {
        Some(path) => TagKeywords::from_json(&read_to_string(path)?)?,
        None => TagKeywords::default(),
    };
    let notes = read_to_string(&options.notes_path)?;
    let cocktails = parse_notes(&notes, &keywords);
    let bytes = encode(&cocktails)?;

    let (dir, file_name) = open_parent(&options.output_path)?;
    write_replace(&dir, &file_name, &bytes)?;

    Ok(Conversion {
        cocktails: cocktails.len(),
        ingredients: cocktails.iter().map(|cocktail| cocktail.ingredients.len()).sum(),
    })
}

/// Message printed after a successful conversion.
#[must_use]
pub fn success_message(conversion: &Conversion, output: &Path) -> String {
    format!(
        "Wrote {} cocktails ({} ingredients) to {}",
        conversion.cocktails,
        conversion.ingredients,
        output.display()
    )
}

fn read_to_string(path: &Path) -> Result<String, CliError> {
    let read_error = |message: String| CliError::Read {
        path: path.to_path_buf(),
        message,
    };
    let (dir, file_name) = open_parent(path).map_err(|err| read_error(err.to_string()))?;
    dir.read_to_string(file_name.as_str())
        .map_err(|err| read_error(err.to_string()))
}

fn open_parent(path: &Path) -> Result<(Dir, Utf8PathBuf), CliError> {
    let utf8 = Utf8Path::from_path(path).ok_or_else(|| CliError::Read {
        path: path.to_path_buf(),
        message: "path is not valid UTF-8".to_owned(),
    })?;
    let file_name = utf8.file_name().ok_or_else(|| CliError::Read {
        path: path.to_path_buf(),
        message: "path does not name a file".to_owned(),
    })?;
    let parent = match utf8.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| CliError::Read {
        path: parent.as_std_path().to_path_buf(),
        message: err.to_string(),
    })?;
    Ok((dir, Utf8PathBuf::from(file_name)))
}

#[cfg(test)]
mod tests;
