use std::fmt;
use std::path::Path;

/// A source location: file path, line and column.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    path: String,
    line: u32,
    column: u32,
}

impl Location {
    /// Creates a location.
    #[must_use]
    pub fn new(path: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }

    /// Returns the path exactly as recorded by the producer.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the final component of the path.
    pub fn base_name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }

    /// Returns the 1-based line.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the 1-based column.
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_directories() {
        let loc = Location::new("/usr/include/foo/bar.h", 10, 2);
        assert_eq!(loc.base_name(), "bar.h");
        assert_eq!(loc.to_string(), "/usr/include/foo/bar.h:10:2");
    }

    #[test]
    fn base_name_of_bare_file() {
        assert_eq!(Location::new("bar.h", 1, 1).base_name(), "bar.h");
    }
}
