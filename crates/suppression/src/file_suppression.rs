//! `[suppress_file]`: skipping whole binaries.

use std::path::Path;

use ini::Section;

use crate::base::SuppressionBase;
use crate::error::{SectionError, SuppressionWarning};
use crate::pattern::Pattern;
use crate::property::{HasBase, read_section};

/// A `[suppress_file]` section: binaries whose file name it selects are not
/// analyzed at all.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileSuppression {
    pub(crate) base: SuppressionBase,
}

impl HasBase for FileSuppression {
    fn base_mut(&mut self) -> &mut SuppressionBase {
        &mut self.base
    }
}

impl FileSuppression {
    /// Creates a suppression selecting files whose base name matches `pattern`.
    #[must_use]
    pub fn new(pattern: Pattern) -> Self {
        Self {
            base: SuppressionBase::default().with_file_name_regex(pattern),
        }
    }

    /// Reads a `[suppress_file]` section.
    ///
    /// A soname pattern always drops the selected binaries from the IR.
    pub(crate) fn from_section(
        section: &Section,
        warnings: &mut Vec<SuppressionWarning>,
    ) -> Result<Self, SectionError> {
        let mut s: Self = read_section(section, &[], true, warnings)?;
        if s.base.has_soname_related_property() {
            s.base.drops_artifact = true;
        }
        Ok(s)
    }

    /// Replaces the shared state.
    #[must_use]
    pub fn with_base(mut self, base: SuppressionBase) -> Self {
        self.base = base;
        self
    }

    /// Returns the shared state.
    pub fn base(&self) -> &SuppressionBase {
        &self.base
    }

    /// Returns `true` if the base name of `path` is selected by the file name
    /// patterns.
    ///
    /// Without file name patterns, or for an empty path, nothing is selected.
    pub fn suppresses_file(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path);
        self.base.matches_binary_name(name)
    }
}
