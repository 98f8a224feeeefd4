use ir::{CorpusInfo, DiffContext};

use crate::pattern::Pattern;

/// State shared by every suppression kind.
///
/// The file and soname patterns restrict a suppression to the binaries whose
/// path or soname they select; a suppression without them applies everywhere.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SuppressionBase {
    pub(crate) label: String,
    pub(crate) is_artificial: bool,
    pub(crate) drops_artifact: bool,
    pub(crate) file_name_regex: Option<Pattern>,
    pub(crate) file_name_not_regex: Option<Pattern>,
    pub(crate) soname_regex: Option<Pattern>,
    pub(crate) soname_not_regex: Option<Pattern>,
}

impl SuppressionBase {
    /// Sets the free-form label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Marks the suppression as generated by tooling rather than read from a
    /// user file.
    #[must_use]
    pub fn artificial(mut self) -> Self {
        self.is_artificial = true;
        self
    }

    /// Requests that matched artifacts be dropped from the IR, not just hidden
    /// from reports.
    #[must_use]
    pub fn with_drops_artifact(mut self, drops: bool) -> Self {
        self.drops_artifact = drops;
        self
    }

    /// Restricts the suppression to binaries whose path matches `pattern`.
    #[must_use]
    pub fn with_file_name_regex(mut self, pattern: Pattern) -> Self {
        self.file_name_regex = Some(pattern);
        self
    }

    /// Restricts the suppression to binaries whose path does not match `pattern`.
    #[must_use]
    pub fn with_file_name_not_regex(mut self, pattern: Pattern) -> Self {
        self.file_name_not_regex = Some(pattern);
        self
    }

    /// Restricts the suppression to binaries whose soname matches `pattern`.
    #[must_use]
    pub fn with_soname_regex(mut self, pattern: Pattern) -> Self {
        self.soname_regex = Some(pattern);
        self
    }

    /// Restricts the suppression to binaries whose soname does not match `pattern`.
    #[must_use]
    pub fn with_soname_not_regex(mut self, pattern: Pattern) -> Self {
        self.soname_not_regex = Some(pattern);
        self
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` for suppressions generated by tooling.
    pub fn is_artificial(&self) -> bool {
        self.is_artificial
    }

    /// Returns `true` if matched artifacts are to be dropped from the IR.
    pub fn drops_artifact_from_ir(&self) -> bool {
        self.drops_artifact
    }

    /// Returns the binary path pattern.
    pub fn file_name_regex(&self) -> Option<&Pattern> {
        self.file_name_regex.as_ref()
    }

    /// Returns the negated binary path pattern.
    pub fn file_name_not_regex(&self) -> Option<&Pattern> {
        self.file_name_not_regex.as_ref()
    }

    /// Returns the soname pattern.
    pub fn soname_regex(&self) -> Option<&Pattern> {
        self.soname_regex.as_ref()
    }

    /// Returns the negated soname pattern.
    pub fn soname_not_regex(&self) -> Option<&Pattern> {
        self.soname_not_regex.as_ref()
    }

    /// Returns `true` if a binary path pattern is set.
    pub fn has_file_name_related_property(&self) -> bool {
        self.file_name_regex.is_some() || self.file_name_not_regex.is_some()
    }

    /// Returns `true` if a soname pattern is set.
    pub fn has_soname_related_property(&self) -> bool {
        self.soname_regex.is_some() || self.soname_not_regex.is_some()
    }

    /// Returns `true` if the soname patterns select `soname`.
    ///
    /// A suppression without soname patterns selects no soname.
    pub fn matches_soname(&self, soname: &str) -> bool {
        select(
            self.soname_regex.as_ref(),
            self.soname_not_regex.as_ref(),
            soname,
        )
    }

    /// Returns `true` if the binary path patterns select `path`.
    ///
    /// A suppression without path patterns selects no path.
    pub fn matches_binary_name(&self, path: &str) -> bool {
        select(
            self.file_name_regex.as_ref(),
            self.file_name_not_regex.as_ref(),
            path,
        )
    }

    /// Returns `true` if either the soname or the path is selected.
    pub fn matches_soname_or_filename(&self, soname: &str, path: &str) -> bool {
        self.matches_soname(soname) || self.matches_binary_name(path)
    }

    /// Returns `false` when a binary criterion rules `corpus` out.
    pub fn can_match_corpus(&self, corpus: &CorpusInfo) -> bool {
        if self.has_soname_related_property() && !self.matches_soname(corpus.soname()) {
            return false;
        }
        !(self.has_file_name_related_property() && !self.matches_binary_name(corpus.path()))
    }

    /// Checks the binary criteria against the two compared binaries.
    ///
    /// Without a context there is nothing to rule out.
    pub(crate) fn binaries_match(&self, ctxt: Option<&DiffContext>) -> bool {
        let Some(ctxt) = ctxt else {
            return true;
        };
        let (first, second) = (ctxt.first(), ctxt.second());

        if self.has_file_name_related_property()
            && !self.matches_binary_name(first.path())
            && !self.matches_binary_name(second.path())
        {
            return false;
        }

        !(self.has_soname_related_property()
            && !self.matches_soname(first.soname())
            && !self.matches_soname(second.soname()))
    }
}

fn select(regex: Option<&Pattern>, not_regex: Option<&Pattern>, text: &str) -> bool {
    if regex.is_none() && not_regex.is_none() {
        return false;
    }
    crate::pattern::matches_or_absent(regex, text)
        && crate::pattern::misses_or_absent(not_regex, text)
}
