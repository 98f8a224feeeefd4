use std::sync::Arc;

use ir::{CorpusInfo, Diff, DiffContext, Location, SymbolKind};

use crate::debug_suppr::trace_suppressed;
use crate::file_suppression::FileSuppression;
use crate::suppression::Suppression;

/// Whether a type is suppressed, and why.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypeVerdict {
    /// No suppression selects the type.
    Kept,
    /// A user suppression selects the type.
    Suppressed,
    /// The generated private-types suppression selects the type.
    SuppressedAsPrivate,
}

impl TypeVerdict {
    /// Returns `true` unless the type is kept.
    pub fn is_suppressed(self) -> bool {
        self != Self::Kept
    }

    /// Returns `true` if the type is private to the binary.
    pub fn is_private(self) -> bool {
        self == Self::SuppressedAsPrivate
    }
}

/// An immutable, ordered collection of suppressions.
///
/// Queries are existential: an artifact is suppressed when any member
/// suppresses it, so the order of members never changes an answer. Cloning
/// is cheap: the members live behind an [`Arc`].
///
/// # Examples
///
/// ```
/// use suppression::{FunctionSuppression, SuppressionSet};
///
/// let set = SuppressionSet::new(vec![
///     FunctionSuppression::new().with_name("internal_init").into(),
/// ]);
/// assert!(set.function_is_suppressed("internal_init", "", false));
/// assert!(!set.function_is_suppressed("public_init", "", false));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SuppressionSet {
    inner: Arc<Vec<Suppression>>,
}

impl SuppressionSet {
    /// Creates a set from suppressions in order.
    #[must_use]
    pub fn new(suppressions: Vec<Suppression>) -> Self {
        Self {
            inner: Arc::new(suppressions),
        }
    }

    /// Returns the members in order.
    pub fn suppressions(&self) -> &[Suppression] {
        &self.inner
    }

    /// Iterates over the members.
    pub fn iter(&self) -> std::slice::Iter<'_, Suppression> {
        self.inner.iter()
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` when there are no members.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns a set holding the members of `self` followed by those of `other`.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        self.iter().chain(other.iter()).cloned().collect()
    }

    /// Returns the members whose binary criteria do not rule out `corpus`.
    #[must_use]
    pub fn applicable_to(&self, corpus: &CorpusInfo) -> Self {
        self.iter()
            .filter(|s| s.base().can_match_corpus(corpus))
            .cloned()
            .collect()
    }

    /// Returns `true` if any member hides the change carried by `diff`.
    pub fn suppresses_diff(&self, diff: &Diff, ctxt: Option<&DiffContext>) -> bool {
        self.iter()
            .find(|s| s.suppresses_diff(diff, ctxt))
            .inspect(|s| trace_suppressed(s.section_name(), s.label(), "diff"))
            .is_some()
    }

    fn candidates(&self, require_drop: bool) -> impl Iterator<Item = &Suppression> {
        self.iter()
            .filter(move |s| !require_drop || s.drops_artifact_from_ir())
    }

    /// Returns `true` if a function suppression selects the function by name
    /// or by linkage name. Empty names are not considered.
    ///
    /// With `require_drop`, only suppressions that drop artifacts from the IR
    /// count.
    pub fn function_is_suppressed(
        &self,
        name: &str,
        linkage_name: &str,
        require_drop: bool,
    ) -> bool {
        self.candidates(require_drop)
            .filter_map(Suppression::as_function)
            .find(|s| {
                (!name.is_empty() && s.matches_name(name))
                    || (!linkage_name.is_empty() && s.matches_symbol_name(linkage_name))
            })
            .inspect(|s| trace_suppressed("suppress_function", s.base().label(), name))
            .is_some()
    }

    /// Variable counterpart of [`SuppressionSet::function_is_suppressed`].
    pub fn variable_is_suppressed(
        &self,
        name: &str,
        linkage_name: &str,
        require_drop: bool,
    ) -> bool {
        self.candidates(require_drop)
            .filter_map(Suppression::as_variable)
            .find(|s| {
                (!name.is_empty() && s.matches_name(name))
                    || (!linkage_name.is_empty() && s.matches_symbol_name(linkage_name))
            })
            .inspect(|s| trace_suppressed("suppress_variable", s.base().label(), name))
            .is_some()
    }

    /// Returns whether a type suppression selects a type known by its
    /// qualified name and, when it has one, its location.
    pub fn type_is_suppressed(
        &self,
        name: &str,
        location: Option<&Location>,
        require_drop: bool,
    ) -> TypeVerdict {
        self.candidates(require_drop)
            .filter_map(Suppression::as_type)
            .find(|s| s.matches_type_name_or_location(name, location))
            .map_or(TypeVerdict::Kept, |s| {
                trace_suppressed("suppress_type", s.base().label(), name);
                if s.is_private_type_suppression() {
                    TypeVerdict::SuppressedAsPrivate
                } else {
                    TypeVerdict::Suppressed
                }
            })
    }

    /// Returns the first file suppression selecting `path`.
    pub fn file_is_suppressed(&self, path: &str) -> Option<&FileSuppression> {
        self.iter()
            .filter_map(Suppression::as_file)
            .find(|s| s.suppresses_file(path))
            .inspect(|s| trace_suppressed("suppress_file", s.base().label(), path))
    }

    /// Returns `true` if an ELF symbol is to be dropped: a dropping function
    /// or variable suppression selects its name.
    pub fn is_elf_symbol_suppressed(&self, name: &str, kind: SymbolKind) -> bool {
        match kind {
            SymbolKind::Function => self.function_is_suppressed("", name, true),
            SymbolKind::Variable => self.variable_is_suppressed("", name, true),
            SymbolKind::Other => false,
        }
    }
}

impl FromIterator<Suppression> for SuppressionSet {
    fn from_iter<I: IntoIterator<Item = Suppression>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SuppressionSet {
    type Item = &'a Suppression;
    type IntoIter = std::slice::Iter<'a, Suppression>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
