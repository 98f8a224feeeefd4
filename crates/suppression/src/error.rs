use std::fmt;

/// Why a single property value could not be converted.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// A single string was expected.
    #[error("expected a single value, found '{0}'")]
    NotSimple(String),
    /// A string or a comma-separated list was expected.
    #[error("expected a value or a list, found '{0}'")]
    NotWords(String),
    /// A brace-delimited tuple was expected.
    #[error("expected a tuple such as {{8, end}}, found '{0}'")]
    NotTuple(String),
    /// A boolean other than `yes`, `true`, `no` or `false`.
    #[error("invalid boolean '{0}' (expected yes, true, no or false)")]
    InvalidBoolean(String),
    /// A keyword outside the property's fixed vocabulary.
    #[error("unknown keyword '{value}' (expected one of: {expected})")]
    UnknownKeyword {
        /// The rejected text.
        value: String,
        /// The accepted keywords, comma-separated.
        expected: &'static str,
    },
    /// Not `end`, an integer, `offset_of(member)` or `offset_after(member)`.
    #[error("invalid offset '{0}'")]
    InvalidOffset(String),
    /// A range that is not a pair of offsets.
    #[error("invalid insertion range '{0}' (expected {{begin, end}})")]
    InvalidRange(String),
    /// A `parameter` value that is not `'<index> <type>` or `'<index> /<regex>/`.
    #[error("invalid parameter specification '{0}'")]
    InvalidParameter(String),
}

/// What was wrong with a rejected section.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SectionErrorKind {
    /// The section name is not one of the four suppression kinds.
    #[error("unknown section name")]
    UnknownSection,
    /// A property the section kind does not define.
    #[error("unknown property '{name}' at line {line}")]
    UnknownProperty {
        /// Property name.
        name: String,
        /// Line of the property.
        line: usize,
    },
    /// A non-repeatable property given more than once.
    #[error("property '{name}' repeated at line {line} (first given at line {first_line})")]
    RepeatedProperty {
        /// Property name.
        name: String,
        /// Line of the repetition.
        line: usize,
        /// Line of the first occurrence.
        first_line: usize,
    },
    /// None of the properties that identify what to suppress is present.
    #[error("no identifying property (expected one of: {expected})")]
    MissingSufficientProperty {
        /// The sufficient properties of this section kind, comma-separated.
        expected: String,
    },
    /// A property value that could not be converted.
    #[error("invalid value for '{name}' at line {line}: {source}")]
    InvalidValue {
        /// Property name.
        name: String,
        /// Line of the property.
        line: usize,
        /// Conversion failure.
        #[source]
        source: ValueError,
    },
}

/// A section that was rejected; it contributes no suppression.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("[{section}] at line {line}: {kind}")]
pub struct SectionError {
    section: String,
    line: usize,
    #[source]
    kind: SectionErrorKind,
}

impl SectionError {
    pub(crate) fn new(section: &ini::Section, kind: SectionErrorKind) -> Self {
        Self {
            section: section.name().to_owned(),
            line: section.line(),
            kind,
        }
    }

    /// Returns the section name.
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Returns the line of the section header.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns what was wrong.
    pub fn kind(&self) -> &SectionErrorKind {
        &self.kind
    }
}

/// Failure to obtain any suppression from an input.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The input could not be read or tokenized.
    #[error(transparent)]
    Config(#[from] ini::ConfigError),
    /// One or more sections were rejected.
    #[error("{} suppression section(s) rejected; first: {}", .0.len(), FirstError(.0))]
    Sections(Vec<SectionError>),
}

struct FirstError<'a>(&'a [SectionError]);

impl fmt::Display for FirstError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.first() {
            Some(e) => write!(f, "{e}"),
            None => f.write_str("none"),
        }
    }
}

/// A recoverable problem: the section was kept, minus something.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SuppressionWarning {
    /// A pattern failed to compile and its property was ignored.
    #[error("[{section}] line {line}: ignoring '{property}': invalid regular expression '{pattern}'")]
    PatternDropped {
        /// Section name.
        section: String,
        /// Line of the property.
        line: usize,
        /// Property name.
        property: String,
        /// The rejected pattern text.
        pattern: String,
    },
    /// `drop` was requested without any name or location criterion, and reset.
    #[error("[{section}] line {line}: ignoring 'drop': no name, symbol or location criterion")]
    DropIgnored {
        /// Section name.
        section: String,
        /// Line of the section header.
        line: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn section_error_display_and_source() {
        let section = ini::Section::new("suppress_type");
        let err = SectionError::new(
            &section,
            SectionErrorKind::InvalidValue {
                name: "drop".into(),
                line: 3,
                source: ValueError::InvalidBoolean("maybe".into()),
            },
        );
        assert_eq!(
            err.to_string(),
            "[suppress_type] at line 0: invalid value for 'drop' at line 3: invalid boolean 'maybe' (expected yes, true, no or false)"
        );
        assert!(err.source().is_some());
        assert_eq!(err.section(), "suppress_type");
    }

    #[test]
    fn read_error_summarises_sections() {
        let section = ini::Section::new("suppress_nothing");
        let err = ReadError::Sections(vec![SectionError::new(
            &section,
            SectionErrorKind::UnknownSection,
        )]);
        assert_eq!(
            err.to_string(),
            "1 suppression section(s) rejected; first: [suppress_nothing] at line 0: unknown section name"
        );
    }
}
