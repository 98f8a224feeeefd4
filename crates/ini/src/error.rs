use std::io;
use std::path::{Path, PathBuf};

/// Category of a [`ConfigError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigErrorKind {
    /// The input could not be read.
    Io,
    /// The input was read but is not well-formed.
    Syntax,
}

/// Error produced while reading an ini-style document.
#[derive(Debug, thiserror::Error)]
#[error("{}{}{message}", path_prefix(.path), line_prefix(.line))]
pub struct ConfigError {
    kind: ConfigErrorKind,
    line: Option<usize>,
    message: String,
    path: Option<PathBuf>,
    #[source]
    source: Option<io::Error>,
}

impl ConfigError {
    pub(crate) fn io_error(path: Option<&Path>, source: io::Error) -> Self {
        let message = match path {
            Some(path) => format!("failed to read '{}': {source}", path.display()),
            None => format!("failed to read input: {source}"),
        };
        Self {
            kind: ConfigErrorKind::Io,
            line: None,
            message,
            path: None,
            source: Some(source),
        }
    }

    pub(crate) fn syntax_error(line: usize, message: impl Into<String>) -> Self {
        Self {
            kind: ConfigErrorKind::Syntax,
            line: Some(line),
            message: message.into(),
            path: None,
            source: None,
        }
    }

    pub(crate) fn with_path(mut self, path: &Path) -> Self {
        if self.kind == ConfigErrorKind::Syntax {
            self.path = Some(path.to_path_buf());
        }
        self
    }

    /// Returns the category of the failure.
    pub fn kind(&self) -> ConfigErrorKind {
        self.kind
    }

    /// Returns the 1-based line number where the error occurred, if available.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Returns the file the document was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the message without location information.
    pub fn message(&self) -> &str {
        &self.message
    }
}

fn path_prefix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!("{}: ", p.display()))
        .unwrap_or_default()
}

fn line_prefix(line: &Option<usize>) -> String {
    line.map(|l| format!("line {l}: ")).unwrap_or_default()
}
