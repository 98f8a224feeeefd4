//! Reading suppression specifications from ini documents.

use std::io::Read;
use std::path::Path;

use ini::Config;

use crate::debug_suppr::{trace_section_accepted, trace_section_rejected, trace_warning};
use crate::error::{ReadError, SectionError, SuppressionWarning};
use crate::set::SuppressionSet;
use crate::suppression::Suppression;

/// The outcome of reading suppressions.
///
/// A rejected section contributes nothing; every other section is kept even
/// when a sibling was rejected.
#[derive(Clone, Debug, Default)]
pub struct ReadReport {
    suppressions: SuppressionSet,
    errors: Vec<SectionError>,
    warnings: Vec<SuppressionWarning>,
}

impl ReadReport {
    /// Returns `true` when no section was rejected.
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the suppressions read.
    pub fn suppressions(&self) -> &SuppressionSet {
        &self.suppressions
    }

    /// Returns the rejected sections.
    pub fn errors(&self) -> &[SectionError] {
        &self.errors
    }

    /// Returns the recoverable problems of accepted sections.
    pub fn warnings(&self) -> &[SuppressionWarning] {
        &self.warnings
    }

    /// Returns the suppressions read, discarding the diagnostics.
    pub fn into_suppressions(self) -> SuppressionSet {
        self.suppressions
    }

    /// Returns the suppressions when every section was accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Sections`] with the rejected sections otherwise.
    pub fn into_result(self) -> Result<SuppressionSet, ReadError> {
        if self.errors.is_empty() {
            Ok(self.suppressions)
        } else {
            Err(ReadError::Sections(self.errors))
        }
    }

    /// Appends the contents of `other`.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.suppressions = self.suppressions.merge(&other.suppressions);
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }
}

/// Converts every section of `config`, in order.
pub fn read_suppressions(config: &Config) -> ReadReport {
    let mut suppressions = Vec::new();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for section in config.sections() {
        let first_warning = warnings.len();
        match Suppression::from_section(section, &mut warnings) {
            Ok(suppression) => {
                trace_section_accepted(section.name(), section.line(), suppression.label());
                suppressions.push(suppression);
            }
            Err(error) => {
                trace_section_rejected(&error);
                errors.push(error);
            }
        }
        warnings[first_warning..].iter().for_each(trace_warning);
    }

    ReadReport {
        suppressions: SuppressionSet::new(suppressions),
        errors,
        warnings,
    }
}

/// Reads suppressions from text.
///
/// # Errors
///
/// Returns [`ReadError::Config`] when the text is not a well-formed ini
/// document. Rejected sections are reported in the [`ReadReport`].
///
/// # Examples
///
/// ```
/// use suppression::read_suppressions_from_str;
///
/// let report = read_suppressions_from_str(
///     "[suppress_function]\n  name_regexp = ^internal_\n  drop = yes\n",
/// ).unwrap();
/// assert!(report.succeeded());
/// assert!(report.suppressions().function_is_suppressed("internal_init", "", true));
/// ```
pub fn read_suppressions_from_str(text: &str) -> Result<ReadReport, ReadError> {
    Ok(read_suppressions(&Config::parse(text)?))
}

/// Reads suppressions from a byte stream.
///
/// # Errors
///
/// Returns [`ReadError::Config`] on I/O failure or malformed input.
pub fn read_suppressions_from_reader<R: Read>(reader: R) -> Result<ReadReport, ReadError> {
    Ok(read_suppressions(&Config::from_reader(reader)?))
}

/// Reads suppressions from a file.
///
/// # Errors
///
/// Returns [`ReadError::Config`] on I/O failure or malformed input; the
/// error carries the path.
pub fn read_suppressions_from_file(path: &Path) -> Result<ReadReport, ReadError> {
    Ok(read_suppressions(&Config::from_file(path)?))
}

/// Reads several files and concatenates their suppressions in order.
///
/// # Errors
///
/// Stops at the first file that cannot be read or tokenized.
pub fn read_suppression_files<I, P>(paths: I) -> Result<ReadReport, ReadError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .try_fold(ReadReport::default(), |report, path| {
            Ok(report.merge(read_suppressions_from_file(path.as_ref())?))
        })
}
