//! Integration tests for reading ini documents from readers and disk.

use std::io::Write;

use ini::{Config, ConfigErrorKind, PropertyValue};
use proptest::prelude::*;

// ============================================================================
// Readers and files
// ============================================================================

/// A document read from a file keeps its sections and properties.
#[test]
fn reads_document_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[suppress_type]").unwrap();
    writeln!(file, "  name_regexp = ^priv_").unwrap();
    writeln!(file, "  has_data_member_inserted_between = {{8, end}}").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    let section = &config.sections()[0];
    assert_eq!(section.properties().len(), 2);
    assert_eq!(
        section
            .find_property("has_data_member_inserted_between")
            .and_then(|p| p.value().as_tuple())
            .map(<[PropertyValue]>::len),
        Some(1)
    );
}

/// Syntax errors from a file carry the path and line.
#[test]
fn file_errors_carry_path_and_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[ok]\nname = x\n[broken\n").unwrap();

    let err = Config::from_file(file.path()).unwrap_err();
    assert_eq!(err.kind(), ConfigErrorKind::Syntax);
    assert_eq!(err.line(), Some(3));
    assert_eq!(err.path(), Some(file.path()));
    assert!(err.to_string().starts_with(&file.path().display().to_string()));
}

/// A missing file is an I/O error.
#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(&dir.path().join("absent.abignore")).unwrap_err();
    assert_eq!(err.kind(), ConfigErrorKind::Io);
    assert_eq!(err.line(), None);
    assert!(std::error::Error::source(&err).is_some());
}

/// Reading from a byte slice matches parsing the string.
#[test]
fn reader_matches_string_parse() {
    let text = "[suppress_function]\nname = f\nparameter = '0 int\n";
    let from_reader = Config::from_reader(text.as_bytes()).unwrap();
    let from_str: Config = text.parse().unwrap();
    assert_eq!(from_reader, from_str);
}

/// Unbalanced brackets in a plain value are text, not syntax, and do not
/// disturb the following sections.
#[test]
fn unbalanced_brackets_in_plain_values() {
    let text = "[t]\nname_regexp = ^a(\n[u]\nname_regexp = ^[)]x$\n[v]\nname = f\n";
    let config = Config::parse(text).unwrap();
    let values: Vec<_> = config
        .sections()
        .iter()
        .map(|s| s.properties()[0].value().as_str().unwrap().to_owned())
        .collect();
    assert_eq!(values, ["^a(", "^[)]x$", "f"]);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Any plain word survives as a simple string value.
    #[test]
    fn plain_words_round_trip(word in "[A-Za-z_][A-Za-z0-9_:.*^$]{0,24}") {
        let config = Config::parse(&format!("[s]\nname = {word}\n")).unwrap();
        let value = config.sections()[0].find_property("name").unwrap().value();
        prop_assert_eq!(value.as_str(), Some(word.as_str()));
    }

    /// Comma-joined words become a list of exactly those words.
    #[test]
    fn comma_joined_words_form_list(
        words in prop::collection::vec("[A-Za-z][A-Za-z0-9_]{0,8}", 2..6),
    ) {
        let config = Config::parse(&format!("[s]\nk = {}\n", words.join(" , "))).unwrap();
        let value = config.sections()[0].find_property("k").unwrap().value();
        prop_assert_eq!(value.as_list(), Some(words.as_slice()));
    }
}
