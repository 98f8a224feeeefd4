//! `[suppress_variable]`: suppression of global variable changes.

use ini::Section;
use ir::{Diff, DiffContext, ElfSymbol, VarDecl};

use crate::base::SuppressionBase;
use crate::change_kind::ChangeKind;
use crate::error::{SectionError, SuppressionWarning};
use crate::function_suppression::parse_change_kinds;
use crate::pattern::{Pattern, matches_or_absent, misses_or_absent};
use crate::property::{HasBase, PropertyInfo, Setter, property, read_section};

/// A `[suppress_variable]` section.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariableSuppression {
    pub(crate) base: SuppressionBase,
    pub(crate) change_kind: ChangeKind,
    pub(crate) name: String,
    pub(crate) name_regex: Option<Pattern>,
    pub(crate) name_not_regex: Option<Pattern>,
    pub(crate) symbol_name: String,
    pub(crate) symbol_name_regex: Option<Pattern>,
    pub(crate) symbol_name_not_regex: Option<Pattern>,
    pub(crate) symbol_version: String,
    pub(crate) symbol_version_regex: Option<Pattern>,
    pub(crate) type_name: String,
    pub(crate) type_name_regex: Option<Pattern>,
}

impl Default for VariableSuppression {
    fn default() -> Self {
        Self {
            base: SuppressionBase::default(),
            change_kind: ChangeKind::ALL,
            name: String::new(),
            name_regex: None,
            name_not_regex: None,
            symbol_name: String::new(),
            symbol_name_regex: None,
            symbol_name_not_regex: None,
            symbol_version: String::new(),
            symbol_version_regex: None,
            type_name: String::new(),
            type_name_regex: None,
        }
    }
}

static VARIABLE_PROPERTIES: &[PropertyInfo<VariableSuppression>] = &[
    property!(
        "change_kind",
        Setter::Custom(|s, v| {
            s.change_kind = parse_change_kinds(v, ChangeKind::parse_variable)?;
            Ok(())
        })
    ),
    property!("name", Setter::Text(|s, v| s.name = v), sufficient),
    property!("name_regexp", Setter::Pattern(|s, p| s.name_regex = Some(p)), sufficient),
    property!("name_not_regexp", Setter::Pattern(|s, p| s.name_not_regex = Some(p)), sufficient),
    property!("symbol_name", Setter::Text(|s, v| s.symbol_name = v), sufficient),
    property!(
        "symbol_name_regexp",
        Setter::Pattern(|s, p| s.symbol_name_regex = Some(p)),
        sufficient
    ),
    property!(
        "symbol_name_not_regexp",
        Setter::Pattern(|s, p| s.symbol_name_not_regex = Some(p)),
        sufficient
    ),
    property!("symbol_version", Setter::Text(|s, v| s.symbol_version = v), sufficient),
    property!(
        "symbol_version_regexp",
        Setter::Pattern(|s, p| s.symbol_version_regex = Some(p)),
        sufficient
    ),
    property!("type_name", Setter::Text(|s, v| s.type_name = v), sufficient),
    property!("type_name_regexp", Setter::Pattern(|s, p| s.type_name_regex = Some(p)), sufficient),
];

impl HasBase for VariableSuppression {
    fn base_mut(&mut self) -> &mut SuppressionBase {
        &mut self.base
    }
}

impl VariableSuppression {
    /// Creates a suppression applying to every change kind.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a `[suppress_variable]` section.
    pub(crate) fn from_section(
        section: &Section,
        warnings: &mut Vec<SuppressionWarning>,
    ) -> Result<Self, SectionError> {
        let mut s: Self = read_section(section, VARIABLE_PROPERTIES, false, warnings)?;
        if s.base.drops_artifact && !s.has_name_or_symbol_criteria() {
            s.base.drops_artifact = false;
            warnings.push(SuppressionWarning::DropIgnored {
                section: section.name().to_owned(),
                line: section.line(),
            });
        }
        Ok(s)
    }

    /// Returns `true` if any property that identifies variables is set.
    ///
    /// A suppression without one never suppresses anything.
    pub fn has_identifying_criteria(&self) -> bool {
        self.has_name_or_symbol_criteria()
            || !self.symbol_version.is_empty()
            || self.symbol_version_regex.is_some()
            || !self.type_name.is_empty()
            || self.type_name_regex.is_some()
    }

    fn has_name_or_symbol_criteria(&self) -> bool {
        !self.name.is_empty()
            || self.name_regex.is_some()
            || self.name_not_regex.is_some()
            || !self.symbol_name.is_empty()
            || self.symbol_name_regex.is_some()
            || self.symbol_name_not_regex.is_some()
    }

    /// Replaces the shared state.
    #[must_use]
    pub fn with_base(mut self, base: SuppressionBase) -> Self {
        self.base = base;
        self
    }

    /// Restricts the change kinds the suppression applies to.
    #[must_use]
    pub fn with_change_kind(mut self, kind: ChangeKind) -> Self {
        self.change_kind = kind;
        self
    }

    /// Selects the variable whose qualified name is `name`.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Selects variables whose qualified name matches `pattern`.
    #[must_use]
    pub fn with_name_regex(mut self, pattern: Pattern) -> Self {
        self.name_regex = Some(pattern);
        self
    }

    /// Selects variables whose qualified name does not match `pattern`.
    #[must_use]
    pub fn with_name_not_regex(mut self, pattern: Pattern) -> Self {
        self.name_not_regex = Some(pattern);
        self
    }

    /// Selects variables bound to the symbol `name`.
    #[must_use]
    pub fn with_symbol_name(mut self, name: impl Into<String>) -> Self {
        self.symbol_name = name.into();
        self
    }

    /// Selects variables whose symbol name matches `pattern`.
    #[must_use]
    pub fn with_symbol_name_regex(mut self, pattern: Pattern) -> Self {
        self.symbol_name_regex = Some(pattern);
        self
    }

    /// Selects variables whose symbol name does not match `pattern`.
    #[must_use]
    pub fn with_symbol_name_not_regex(mut self, pattern: Pattern) -> Self {
        self.symbol_name_not_regex = Some(pattern);
        self
    }

    /// Requires the symbol version to be `version`.
    #[must_use]
    pub fn with_symbol_version(mut self, version: impl Into<String>) -> Self {
        self.symbol_version = version.into();
        self
    }

    /// Requires the symbol version to match `pattern`.
    #[must_use]
    pub fn with_symbol_version_regex(mut self, pattern: Pattern) -> Self {
        self.symbol_version_regex = Some(pattern);
        self
    }

    /// Requires the variable type to be named `name`.
    #[must_use]
    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = name.into();
        self
    }

    /// Requires the variable type name to match `pattern`.
    #[must_use]
    pub fn with_type_name_regex(mut self, pattern: Pattern) -> Self {
        self.type_name_regex = Some(pattern);
        self
    }

    /// Returns the shared state.
    pub fn base(&self) -> &SuppressionBase {
        &self.base
    }

    /// Returns the change kinds the suppression applies to.
    pub fn change_kind(&self) -> ChangeKind {
        self.change_kind
    }

    /// Returns the exact name, empty when unset.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name pattern.
    pub fn name_regex(&self) -> Option<&Pattern> {
        self.name_regex.as_ref()
    }

    /// Returns the negated name pattern.
    pub fn name_not_regex(&self) -> Option<&Pattern> {
        self.name_not_regex.as_ref()
    }

    /// Returns the exact symbol name, empty when unset.
    pub fn symbol_name(&self) -> &str {
        &self.symbol_name
    }

    /// Returns the symbol name pattern.
    pub fn symbol_name_regex(&self) -> Option<&Pattern> {
        self.symbol_name_regex.as_ref()
    }

    /// Returns the negated symbol name pattern.
    pub fn symbol_name_not_regex(&self) -> Option<&Pattern> {
        self.symbol_name_not_regex.as_ref()
    }

    /// Returns the exact symbol version, empty when unset.
    pub fn symbol_version(&self) -> &str {
        &self.symbol_version
    }

    /// Returns the symbol version pattern.
    pub fn symbol_version_regex(&self) -> Option<&Pattern> {
        self.symbol_version_regex.as_ref()
    }

    /// Returns the exact type name, empty when unset.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the type name pattern.
    pub fn type_name_regex(&self) -> Option<&Pattern> {
        self.type_name_regex.as_ref()
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Returns `true` if the suppression hides a change of kind `kind` to
    /// `variable`, compared within `ctxt`.
    ///
    /// A variable without a symbol is seen as having an empty symbol name and
    /// version.
    pub fn suppresses_variable(
        &self,
        variable: &VarDecl,
        kind: ChangeKind,
        ctxt: Option<&DiffContext>,
    ) -> bool {
        if !self.has_identifying_criteria()
            || !self.change_kind.intersects(kind)
            || !self.base.binaries_match(ctxt)
        {
            return false;
        }

        let name = variable.qualified_name();
        if !self.name.is_empty() {
            if self.name != name {
                return false;
            }
        } else if !matches_or_absent(self.name_regex.as_ref(), &name)
            || !misses_or_absent(self.name_not_regex.as_ref(), &name)
        {
            return false;
        }

        let symbol_name = variable.symbol().map_or("", ElfSymbol::name);
        if !self.symbol_name.is_empty() {
            if self.symbol_name != symbol_name {
                return false;
            }
        } else if !matches_or_absent(self.symbol_name_regex.as_ref(), symbol_name)
            || !misses_or_absent(self.symbol_name_not_regex.as_ref(), symbol_name)
        {
            return false;
        }

        let symbol_version = variable.symbol().map_or("", ElfSymbol::version);
        if !self.symbol_version.is_empty() {
            if self.symbol_version != symbol_version {
                return false;
            }
        } else if !matches_or_absent(self.symbol_version_regex.as_ref(), symbol_version) {
            return false;
        }

        let type_name = variable.ty().name();
        if !self.type_name.is_empty() {
            self.type_name == type_name
        } else {
            matches_or_absent(self.type_name_regex.as_ref(), &type_name)
        }
    }

    /// Returns `true` if the suppression hides the addition or deletion of
    /// `symbol`, which has no debug information.
    ///
    /// The variable name stands in for the symbol name when set, since a C
    /// variable is named after its symbol.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is neither [`ChangeKind::ADDED`] nor
    /// [`ChangeKind::DELETED`].
    pub fn suppresses_variable_symbol(
        &self,
        symbol: &ElfSymbol,
        kind: ChangeKind,
        ctxt: Option<&DiffContext>,
    ) -> bool {
        if !self.change_kind.intersects(kind) || !symbol.is_variable() {
            return false;
        }
        assert!(
            kind.intersects(ChangeKind::ADDED | ChangeKind::DELETED),
            "symbol changes are additions or deletions"
        );
        if !self.base.binaries_match(ctxt) {
            return false;
        }

        let name_selected = if !self.name.is_empty() {
            Some(self.name == symbol.name())
        } else if !self.symbol_name.is_empty() {
            Some(self.symbol_name == symbol.name())
        } else {
            self.symbol_name_regex.as_ref().map(|re| re.is_match(symbol.name()))
        };
        let version_selected = if !self.symbol_version.is_empty() {
            Some(self.symbol_version == symbol.version())
        } else {
            self.symbol_version_regex
                .as_ref()
                .map(|re| re.is_match(symbol.version()))
        };

        match (name_selected, version_selected) {
            (None, None) => false,
            (name, version) => name.unwrap_or(true) && version.unwrap_or(true),
        }
    }

    /// Returns `true` if a variable diff is hidden: either side is
    /// suppressed as a subtype change.
    pub fn suppresses_diff(&self, diff: &Diff, ctxt: Option<&DiffContext>) -> bool {
        diff.as_var_diff().is_some_and(|d| {
            self.suppresses_variable(d.first(), ChangeKind::SUBTYPE, ctxt)
                || self.suppresses_variable(d.second(), ChangeKind::SUBTYPE, ctxt)
        })
    }

    /// Name test used while reading binaries, before any declaration exists.
    pub fn matches_name(&self, name: &str) -> bool {
        match (&self.name_regex, &self.name_not_regex) {
            (Some(re), _) => re.is_match(name),
            (None, Some(re)) => !re.is_match(name),
            (None, None) => !self.name.is_empty() && self.name == name,
        }
    }

    /// Symbol name counterpart of [`VariableSuppression::matches_name`].
    pub fn matches_symbol_name(&self, linkage_name: &str) -> bool {
        match (&self.symbol_name_regex, &self.symbol_name_not_regex) {
            (Some(re), _) => re.is_match(linkage_name),
            (None, Some(re)) => !re.is_match(linkage_name),
            (None, None) => !self.symbol_name.is_empty() && self.symbol_name == linkage_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ir::{BuiltinType, Type};

    use super::*;

    fn var(name: &str, symbol: Option<ElfSymbol>) -> VarDecl {
        let decl = VarDecl::new(name, Arc::new(Type::Builtin(BuiltinType::new("int", 32))));
        match symbol {
            Some(sym) => decl.with_symbol(sym),
            None => decl,
        }
    }

    #[test]
    fn symbolless_variable_has_empty_symbol_name() {
        let by_regex =
            VariableSuppression::new().with_symbol_name_regex(Pattern::compile("^$").unwrap());
        assert!(by_regex.suppresses_variable(&var("v", None), ChangeKind::SUBTYPE, None));
        let by_name = VariableSuppression::new().with_symbol_name("v");
        assert!(!by_name.suppresses_variable(&var("v", None), ChangeKind::SUBTYPE, None));
        assert!(by_name.suppresses_variable(
            &var("v", Some(ElfSymbol::variable("v"))),
            ChangeKind::SUBTYPE,
            None
        ));
    }

    #[test]
    fn type_name_criteria() {
        let s = VariableSuppression::new().with_type_name("int");
        assert!(s.suppresses_variable(&var("v", None), ChangeKind::SUBTYPE, None));
        let s = VariableSuppression::new().with_type_name_regex(Pattern::compile("^long").unwrap());
        assert!(!s.suppresses_variable(&var("v", None), ChangeKind::SUBTYPE, None));
    }

    #[test]
    fn variable_name_stands_in_for_symbol_name() {
        let s = VariableSuppression::new().with_name("errno_copy");
        let sym = ElfSymbol::variable("errno_copy");
        assert!(s.suppresses_variable_symbol(&sym, ChangeKind::ADDED, None));
        let function = ElfSymbol::function("errno_copy");
        assert!(!s.suppresses_variable_symbol(&function, ChangeKind::ADDED, None));
    }
}
