//! Unit tests for the notes CLI parsing and conversion flow.

use rstest::rstest;
use tempfile::TempDir;

use super::*;
use crate::codec::decode;
use crate::records::CocktailRecord;

fn args(raw: &[&str]) -> impl Iterator<Item = String> {
    raw.iter()
        .map(|value| (*value).to_owned())
        .collect::<Vec<_>>()
        .into_iter()
}

fn temp_dir() -> TempDir {
    match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(err) => panic!("temp dir: {err}"),
    }
}

#[rstest]
#[case(&["--help"])]
#[case(&["--notes", "notes.txt", "-h"])]
fn help_short_circuits(#[case] raw: &[&str]) {
    assert_eq!(parse_args(args(raw)), Ok(ParseOutcome::Help));
}

#[rstest]
fn notes_flag_is_required() {
    assert_eq!(
        parse_args(args(&["--output", "out.json"])),
        Err(CliError::MissingNotesPath)
    );
}

#[rstest]
fn flags_need_values() {
    assert_eq!(
        parse_args(args(&["--notes"])),
        Err(CliError::MissingValue { flag: "--notes" })
    );
}

#[rstest]
fn unknown_flags_are_rejected() {
    assert_eq!(
        parse_args(args(&["--notes", "n.txt", "--verbose"])),
        Err(CliError::UnknownArgument {
            value: "--verbose".to_owned()
        })
    );
}

#[rstest]
fn convert_writes_canonical_import_file() {
    let temp = temp_dir();
    let notes_path = temp.path().join("cocktailsNote.txt");
    let output_path = temp.path().join(DEFAULT_OUTPUT);
    let written = std::fs::write(
        &notes_path,
        "Negroni\n- 30 ml gin\n- 30 ml Campari\n- 30 ml sweet vermouth\nstyle: Stirred\n\nDaiquiri\n- 60 ml white rum\n",
    );
    assert!(written.is_ok());

    let options = Options {
        notes_path,
        output_path: output_path.clone(),
        keywords_path: None,
    };
    let conversion = convert(&options);

    assert_eq!(
        conversion,
        Ok(Conversion {
            cocktails: 2,
            ingredients: 4
        })
    );
    let bytes = std::fs::read(&output_path).unwrap_or_default();
    let cocktails: Vec<CocktailRecord> = decode(&bytes).unwrap_or_default();
    let tags: Vec<Option<&str>> = cocktails
        .iter()
        .flat_map(|cocktail| cocktail.ingredients.iter().map(|i| i.tag.as_deref()))
        .collect();
    assert_eq!(tags, [Some("gin"), None, None, Some("rum")]);
}

#[rstest]
fn missing_notes_file_is_a_read_error() {
    let temp = temp_dir();
    let options = Options {
        notes_path: temp.path().join("absent.txt"),
        output_path: temp.path().join(DEFAULT_OUTPUT),
        keywords_path: None,
    };

    assert!(matches!(convert(&options), Err(CliError::Read { .. })));
}
