//! `[suppress_function]`: suppression of function changes.

use std::fmt;
use std::str::FromStr;

use ini::Section;
use ir::{Diff, DiffContext, ElfSymbol, FunctionDecl};

use crate::base::SuppressionBase;
use crate::change_kind::ChangeKind;
use crate::error::{SectionError, SuppressionWarning, ValueError};
use crate::pattern::{Pattern, matches_or_absent, misses_or_absent};
use crate::property::{HasBase, PropertyInfo, Setter, property, read_section};

/// A constraint on one parameter, written `'<index> <type name>` or
/// `'<index> /<type name pattern>/`.
///
/// The index counts from the first parameter that is not the implicit `this`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParameterSpec {
    index: usize,
    type_name: String,
    type_name_regex: Option<Pattern>,
}

impl ParameterSpec {
    /// Requires parameter `index` to have type `type_name`.
    #[must_use]
    pub fn new(index: usize, type_name: impl Into<String>) -> Self {
        Self {
            index,
            type_name: type_name.into(),
            type_name_regex: None,
        }
    }

    /// Requires the type name of parameter `index` to match `pattern`.
    #[must_use]
    pub fn with_regex(index: usize, pattern: Pattern) -> Self {
        Self {
            index,
            type_name: String::new(),
            type_name_regex: Some(pattern),
        }
    }

    /// Returns the parameter index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the exact type name, empty when unset.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the type name pattern.
    pub fn type_name_regex(&self) -> Option<&Pattern> {
        self.type_name_regex.as_ref()
    }

    /// Returns `true` if `function` has a parameter at the index satisfying
    /// the type constraint.
    pub fn matches(&self, function: &FunctionDecl) -> bool {
        let Some(parameter) = function.ty().parameter_from_first_non_implicit(self.index) else {
            return false;
        };
        let type_name = parameter.ty().name();
        if !self.type_name.is_empty() {
            return self.type_name == type_name;
        }
        matches_or_absent(self.type_name_regex.as_ref(), &type_name)
    }
}

impl FromStr for ParameterSpec {
    type Err = ValueError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidParameter(text.to_owned());
        let trimmed = text.trim();

        let (index, rest) = match trimmed.strip_prefix('\'') {
            Some(after) => {
                let digits = after
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(after.len());
                let (index, rest) = after.split_at(digits);
                (index.parse().map_err(|_| invalid())?, rest.trim())
            }
            None if trimmed.is_empty() => return Err(invalid()),
            None => (0, trimmed),
        };

        match rest.strip_prefix('/') {
            Some(body) => {
                let pattern = body
                    .strip_suffix('/')
                    .and_then(Pattern::compile)
                    .ok_or_else(invalid)?;
                Ok(Self::with_regex(index, pattern))
            }
            None => Ok(Self::new(index, rest)),
        }
    }
}

impl fmt::Display for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_name_regex {
            Some(p) => write!(f, "'{} /{p}/", self.index),
            None => write!(f, "'{} {}", self.index, self.type_name),
        }
    }
}

/// A `[suppress_function]` section.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionSuppression {
    pub(crate) base: SuppressionBase,
    pub(crate) change_kind: ChangeKind,
    pub(crate) name: String,
    pub(crate) name_regex: Option<Pattern>,
    pub(crate) name_not_regex: Option<Pattern>,
    pub(crate) return_type_name: String,
    pub(crate) return_type_regex: Option<Pattern>,
    pub(crate) parameter_specs: Vec<ParameterSpec>,
    pub(crate) symbol_name: String,
    pub(crate) symbol_name_regex: Option<Pattern>,
    pub(crate) symbol_name_not_regex: Option<Pattern>,
    pub(crate) symbol_version: String,
    pub(crate) symbol_version_regex: Option<Pattern>,
    pub(crate) allow_other_aliases: bool,
}

impl Default for FunctionSuppression {
    fn default() -> Self {
        Self {
            base: SuppressionBase::default(),
            change_kind: ChangeKind::ALL,
            name: String::new(),
            name_regex: None,
            name_not_regex: None,
            return_type_name: String::new(),
            return_type_regex: None,
            parameter_specs: Vec::new(),
            symbol_name: String::new(),
            symbol_name_regex: None,
            symbol_name_not_regex: None,
            symbol_version: String::new(),
            symbol_version_regex: None,
            allow_other_aliases: true,
        }
    }
}

static FUNCTION_PROPERTIES: &[PropertyInfo<FunctionSuppression>] = &[
    property!(
        "change_kind",
        Setter::Custom(|s, v| {
            s.change_kind = parse_change_kinds(v, ChangeKind::parse_function)?;
            Ok(())
        })
    ),
    property!("name", Setter::Text(|s, v| s.name = v), sufficient),
    property!("name_regexp", Setter::Pattern(|s, p| s.name_regex = Some(p)), sufficient),
    property!("name_not_regexp", Setter::Pattern(|s, p| s.name_not_regex = Some(p)), sufficient),
    property!(
        "parameter",
        Setter::Custom(|s, v| {
            let text = v
                .to_words()
                .ok_or_else(|| ValueError::InvalidParameter(v.to_string()))?
                .join(", ");
            s.parameter_specs.push(text.parse()?);
            Ok(())
        }),
        sufficient,
        repeatable
    ),
    property!("return_type_name", Setter::Text(|s, v| s.return_type_name = v), sufficient),
    property!(
        "return_type_regexp",
        Setter::Pattern(|s, p| s.return_type_regex = Some(p)),
        sufficient
    ),
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
    property!(
        "allow_other_aliases",
        Setter::Flag(|s, b| s.allow_other_aliases = b)
    ),
];

/// ORs together every keyword of a `change_kind` value.
pub(crate) fn parse_change_kinds(
    value: &ini::PropertyValue,
    parse: fn(&str) -> Result<ChangeKind, ValueError>,
) -> Result<ChangeKind, ValueError> {
    let words = value
        .to_words()
        .ok_or_else(|| ValueError::NotWords(value.to_string()))?;
    words
        .iter()
        .try_fold(ChangeKind::NONE, |kinds, word| Ok(kinds | parse(word)?))
}

impl HasBase for FunctionSuppression {
    fn base_mut(&mut self) -> &mut SuppressionBase {
        &mut self.base
    }
}

impl FunctionSuppression {
    /// Creates a suppression applying to every change kind and tolerating
    /// aliases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a `[suppress_function]` section.
    pub(crate) fn from_section(
        section: &Section,
        warnings: &mut Vec<SuppressionWarning>,
    ) -> Result<Self, SectionError> {
        let mut s: Self = read_section(section, FUNCTION_PROPERTIES, false, warnings)?;
        if s.base.drops_artifact && !s.has_name_or_symbol_criteria() {
            s.base.drops_artifact = false;
            warnings.push(SuppressionWarning::DropIgnored {
                section: section.name().to_owned(),
                line: section.line(),
            });
        }
        Ok(s)
    }

    /// Returns `true` if any property that identifies functions is set.
    ///
    /// A suppression without one never suppresses anything.
    pub fn has_identifying_criteria(&self) -> bool {
        self.has_name_or_symbol_criteria()
            || !self.parameter_specs.is_empty()
            || !self.return_type_name.is_empty()
            || self.return_type_regex.is_some()
            || !self.symbol_version.is_empty()
            || self.symbol_version_regex.is_some()
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

    /// Selects the function whose qualified name is `name`.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Selects functions whose qualified name matches `pattern`.
    #[must_use]
    pub fn with_name_regex(mut self, pattern: Pattern) -> Self {
        self.name_regex = Some(pattern);
        self
    }

    /// Selects functions whose qualified name does not match `pattern`.
    #[must_use]
    pub fn with_name_not_regex(mut self, pattern: Pattern) -> Self {
        self.name_not_regex = Some(pattern);
        self
    }

    /// Requires the return type to be named `name`.
    #[must_use]
    pub fn with_return_type_name(mut self, name: impl Into<String>) -> Self {
        self.return_type_name = name.into();
        self
    }

    /// Requires the return type name to match `pattern`.
    #[must_use]
    pub fn with_return_type_regex(mut self, pattern: Pattern) -> Self {
        self.return_type_regex = Some(pattern);
        self
    }

    /// Adds a parameter constraint.
    #[must_use]
    pub fn with_parameter_spec(mut self, spec: ParameterSpec) -> Self {
        self.parameter_specs.push(spec);
        self
    }

    /// Selects functions bound to the symbol `name`.
    #[must_use]
    pub fn with_symbol_name(mut self, name: impl Into<String>) -> Self {
        self.symbol_name = name.into();
        self
    }

    /// Selects functions whose symbol name matches `pattern`.
    #[must_use]
    pub fn with_symbol_name_regex(mut self, pattern: Pattern) -> Self {
        self.symbol_name_regex = Some(pattern);
        self
    }

    /// Selects functions whose symbol name does not match `pattern`.
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

    /// Sets whether the criteria must also hold for every alias of the symbol.
    #[must_use]
    pub fn with_allow_other_aliases(mut self, allow: bool) -> Self {
        self.allow_other_aliases = allow;
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

    /// Returns the exact return type name, empty when unset.
    pub fn return_type_name(&self) -> &str {
        &self.return_type_name
    }

    /// Returns the return type name pattern.
    pub fn return_type_regex(&self) -> Option<&Pattern> {
        self.return_type_regex.as_ref()
    }

    /// Returns the parameter constraints in input order.
    pub fn parameter_specs(&self) -> &[ParameterSpec] {
        &self.parameter_specs
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

    /// Returns whether aliases must satisfy the criteria too.
    pub fn allow_other_aliases(&self) -> bool {
        self.allow_other_aliases
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Returns `true` if the suppression hides a change of kind `kind` to
    /// `function`, compared within `ctxt`.
    ///
    /// With `allow_other_aliases`, a name criterion applied to a function
    /// whose name is also its symbol name must hold for every alias of the
    /// symbol too.
    pub fn suppresses_function(
        &self,
        function: &FunctionDecl,
        kind: ChangeKind,
        ctxt: Option<&DiffContext>,
    ) -> bool {
        if !self.has_identifying_criteria()
            || !self.change_kind.intersects(kind)
            || !self.base.binaries_match(ctxt)
        {
            return false;
        }

        let name = function.qualified_name();
        let symbol = function.symbol();
        let name_aliases: &[String] = if self.allow_other_aliases {
            symbol
                .filter(|sym| sym.alias_from_name(&name))
                .map(ElfSymbol::aliases)
                .unwrap_or_default()
        } else {
            &[]
        };

        if !self.name.is_empty() {
            if self.name != name {
                return false;
            }
            if let Some(sym) = symbol {
                if name_aliases.iter().any(|alias| alias != sym.name()) {
                    return false;
                }
            }
        }
        if let Some(re) = &self.name_regex {
            if !re.is_match(&name) || name_aliases.iter().any(|alias| !re.is_match(alias)) {
                return false;
            }
        }
        if let Some(re) = &self.name_not_regex {
            if re.is_match(&name) || name_aliases.iter().any(|alias| re.is_match(alias)) {
                return false;
            }
        }

        let return_type = function
            .ty()
            .return_type()
            .map_or_else(|| "void".to_owned(), |ty| ty.name());
        if !self.return_type_name.is_empty() {
            if self.return_type_name != return_type {
                return false;
            }
        } else if !matches_or_absent(self.return_type_regex.as_ref(), &return_type) {
            return false;
        }

        if let Some(sym) = symbol {
            if !self.symbol_matches(sym) {
                return false;
            }
        }

        self.parameter_specs.iter().all(|spec| spec.matches(function))
    }

    fn symbol_matches(&self, sym: &ElfSymbol) -> bool {
        let aliases: &[String] = if self.allow_other_aliases {
            sym.aliases()
        } else {
            &[]
        };

        if !self.symbol_name.is_empty() {
            if self.symbol_name != sym.name() || aliases.iter().any(|alias| alias != sym.name()) {
                return false;
            }
        } else {
            let selected = |candidate: &str| {
                matches_or_absent(self.symbol_name_regex.as_ref(), candidate)
                    && misses_or_absent(self.symbol_name_not_regex.as_ref(), candidate)
            };
            if !selected(sym.name()) || !aliases.iter().all(|alias| selected(alias.as_str())) {
                return false;
            }
        }

        if !self.symbol_version.is_empty() {
            self.symbol_version == sym.version()
        } else {
            matches_or_absent(self.symbol_version_regex.as_ref(), sym.version())
        }
    }

    /// Returns `true` if the suppression hides the addition or deletion of
    /// `symbol`, which has no debug information.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is neither [`ChangeKind::ADDED`] nor
    /// [`ChangeKind::DELETED`].
    pub fn suppresses_function_symbol(
        &self,
        symbol: &ElfSymbol,
        kind: ChangeKind,
        ctxt: Option<&DiffContext>,
    ) -> bool {
        if !self.change_kind.intersects(kind) || !symbol.is_function() {
            return false;
        }
        assert!(
            kind.intersects(ChangeKind::ADDED | ChangeKind::DELETED),
            "symbol changes are additions or deletions"
        );
        if !self.base.binaries_match(ctxt) {
            return false;
        }

        let name_selected = if !self.symbol_name.is_empty() {
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

    /// Returns `true` if a function declaration diff is hidden: either side
    /// is suppressed as a subtype change.
    pub fn suppresses_diff(&self, diff: &Diff, ctxt: Option<&DiffContext>) -> bool {
        diff.as_function_decl_diff().is_some_and(|d| {
            self.suppresses_function(d.first(), ChangeKind::SUBTYPE, ctxt)
                || self.suppresses_function(d.second(), ChangeKind::SUBTYPE, ctxt)
        })
    }

    /// Name test used while reading binaries, before any declaration exists.
    ///
    /// A pattern takes precedence over a negated pattern, which takes
    /// precedence over the exact name. Without any, nothing is selected.
    pub fn matches_name(&self, name: &str) -> bool {
        match (&self.name_regex, &self.name_not_regex) {
            (Some(re), _) => re.is_match(name),
            (None, Some(re)) => !re.is_match(name),
            (None, None) => !self.name.is_empty() && self.name == name,
        }
    }

    /// Symbol name counterpart of [`FunctionSuppression::matches_name`].
    pub fn matches_symbol_name(&self, linkage_name: &str) -> bool {
        match (&self.symbol_name_regex, &self.symbol_name_not_regex) {
            (Some(re), _) => re.is_match(linkage_name),
            (None, Some(re)) => !re.is_match(linkage_name),
            (None, None) => !self.symbol_name.is_empty() && self.symbol_name == linkage_name,
        }
    }
}
