//! `[suppress_type]`: suppression of type changes.

use ini::Section;
use ir::{ClassDiff, DataMember, Diff, DiffContext, EnumDiff, Location, Type, peel_typedef};
use rustc_hash::FxHashSet;

use crate::base::SuppressionBase;
use crate::error::{SectionError, SuppressionWarning, ValueError};
use crate::offset::{END, Offset, OffsetRange};
use crate::pattern::{Pattern, matches_or_absent, misses_or_absent};
use crate::property::{HasBase, PropertyInfo, Setter, keyword, property, read_section, simple};

/// Label of the generated suppression that hides types not defined in public
/// headers.
pub const PRIVATE_TYPES_LABEL: &str = "Artificial private types suppression specification";

/// The kind of type a suppression is restricted to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TypeKind {
    /// `class`: a class or a struct.
    Class,
    /// `struct`.
    Struct,
    /// `union`.
    Union,
    /// `enum`.
    Enum,
    /// `array`.
    Array,
    /// `typedef`.
    Typedef,
    /// `builtin`.
    Builtin,
}

impl TypeKind {
    fn parse(text: &str) -> Result<Self, ValueError> {
        keyword(
            text,
            &[
                ("class", Self::Class),
                ("struct", Self::Struct),
                ("union", Self::Union),
                ("enum", Self::Enum),
                ("array", Self::Array),
                ("typedef", Self::Typedef),
                ("builtin", Self::Builtin),
            ],
            "class, struct, union, enum, array, typedef, builtin",
        )
    }

    /// Returns `true` if `ty` is of this kind.
    pub fn matches(self, ty: &Type) -> bool {
        match self {
            Self::Class => ty.is_class_or_struct(),
            Self::Struct => ty.is_struct(),
            Self::Union => ty.is_union(),
            Self::Enum => matches!(ty, Type::Enum(_)),
            Self::Array => matches!(ty, Type::Array(_)),
            Self::Typedef => matches!(ty, Type::Typedef(_)),
            Self::Builtin => matches!(ty, Type::Builtin(_)),
        }
    }
}

/// How the changed type must be reached for the suppression to apply.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReachKind {
    /// `direct`: the type itself changed.
    Direct,
    /// `pointer`: the change is seen through a pointer.
    Pointer,
    /// `reference`: the change is seen through a reference.
    Reference,
    /// `reference-or-pointer`: through either.
    ReferenceOrPointer,
}

impl ReachKind {
    fn parse(text: &str) -> Result<Self, ValueError> {
        keyword(
            text,
            &[
                ("direct", Self::Direct),
                ("pointer", Self::Pointer),
                ("reference", Self::Reference),
                ("reference-or-pointer", Self::ReferenceOrPointer),
            ],
            "direct, pointer, reference, reference-or-pointer",
        )
    }

    /// Returns the node to evaluate once `diff` has been reached this way.
    fn reach(self, diff: &Diff) -> Option<&Diff> {
        let wrapped = match (self, diff) {
            (Self::Direct, _) => return Some(diff),
            (Self::Pointer | Self::ReferenceOrPointer, Diff::Pointer(w))
            | (Self::Reference | Self::ReferenceOrPointer, Diff::Reference(w)) => w.underlying(),
            _ => return None,
        };
        wrapped.is_type_diff().then(|| wrapped.peel_qualified())
    }
}

/// A `[suppress_type]` section.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TypeSuppression {
    pub(crate) base: SuppressionBase,
    pub(crate) type_name: String,
    pub(crate) type_name_regex: Option<Pattern>,
    pub(crate) type_name_not_regex: Option<Pattern>,
    pub(crate) type_kind: Option<TypeKind>,
    pub(crate) reach_kind: Option<ReachKind>,
    pub(crate) source_locations_to_keep: FxHashSet<String>,
    pub(crate) source_location_to_keep_regex: Option<Pattern>,
    pub(crate) insertion_ranges: Vec<OffsetRange>,
    pub(crate) changed_enumerator_names: Vec<String>,
}

static TYPE_PROPERTIES: &[PropertyInfo<TypeSuppression>] = &[
    property!("name", Setter::Text(|s, v| s.type_name = v), sufficient),
    property!("name_regexp", Setter::Pattern(|s, p| s.type_name_regex = Some(p)), sufficient),
    property!(
        "name_not_regexp",
        Setter::Pattern(|s, p| s.type_name_not_regex = Some(p)),
        sufficient
    ),
    property!(
        "type_kind",
        Setter::Custom(|s, v| {
            s.type_kind = Some(TypeKind::parse(simple(v)?)?);
            Ok(())
        }),
        sufficient
    ),
    property!(
        "source_location_not_in",
        Setter::Words(|s, words| s.source_locations_to_keep.extend(words)),
        sufficient
    ),
    property!(
        "source_location_not_regexp",
        Setter::Pattern(|s, p| s.source_location_to_keep_regex = Some(p)),
        sufficient
    ),
    property!(
        "accessed_through",
        Setter::Custom(|s, v| {
            s.reach_kind = Some(ReachKind::parse(simple(v)?)?);
            Ok(())
        })
    ),
    property!(
        "has_data_member_inserted_at",
        Setter::Custom(|s, v| {
            let at: Offset = simple(v)?.parse()?;
            s.insertion_ranges.push(OffsetRange::at(at));
            Ok(())
        })
    ),
    property!(
        "has_data_member_inserted_between",
        Setter::Custom(|s, v| {
            s.insertion_ranges.push(OffsetRange::from_value(v)?);
            Ok(())
        })
    ),
    property!(
        "has_data_members_inserted_between",
        Setter::Custom(|s, v| {
            s.insertion_ranges.extend(OffsetRange::list_from_value(v)?);
            Ok(())
        })
    ),
    property!(
        "changed_enumerators",
        Setter::Words(|s, words| s.changed_enumerator_names = words)
    ),
];

impl HasBase for TypeSuppression {
    fn base_mut(&mut self) -> &mut SuppressionBase {
        &mut self.base
    }
}

impl TypeSuppression {
    /// Creates a suppression with no criteria, which selects nothing until
    /// one is set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a `[suppress_type]` section.
    pub(crate) fn from_section(
        section: &Section,
        warnings: &mut Vec<SuppressionWarning>,
    ) -> Result<Self, SectionError> {
        let mut s: Self = read_section(section, TYPE_PROPERTIES, false, warnings)?;

        // Only a positive name or a kept location makes `drop` stick.
        let names_a_type = !s.type_name.is_empty() || s.type_name_regex.is_some();
        if s.base.drops_artifact && !names_a_type && !s.has_location_criteria() {
            s.base.drops_artifact = false;
            warnings.push(SuppressionWarning::DropIgnored {
                section: section.name().to_owned(),
                line: section.line(),
            });
        }
        if s.type_kind != Some(TypeKind::Enum) {
            s.changed_enumerator_names.clear();
        }
        Ok(s)
    }

    /// Replaces the shared state.
    #[must_use]
    pub fn with_base(mut self, base: SuppressionBase) -> Self {
        self.base = base;
        self
    }

    /// Restricts the suppression to the type named exactly `name`.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = name.into();
        self
    }

    /// Restricts the suppression to types whose name matches `pattern`.
    #[must_use]
    pub fn with_name_regex(mut self, pattern: Pattern) -> Self {
        self.type_name_regex = Some(pattern);
        self
    }

    /// Restricts the suppression to types whose name does not match `pattern`.
    #[must_use]
    pub fn with_name_not_regex(mut self, pattern: Pattern) -> Self {
        self.type_name_not_regex = Some(pattern);
        self
    }

    /// Restricts the suppression to one kind of type.
    #[must_use]
    pub fn with_type_kind(mut self, kind: TypeKind) -> Self {
        self.type_kind = Some(kind);
        self
    }

    /// Restricts the suppression to changes reached in a given way.
    #[must_use]
    pub fn with_reach_kind(mut self, reach: ReachKind) -> Self {
        self.reach_kind = Some(reach);
        self
    }

    /// Keeps types defined in `path`, compared against full paths and base names.
    #[must_use]
    pub fn with_source_location_to_keep(mut self, path: impl Into<String>) -> Self {
        self.source_locations_to_keep.insert(path.into());
        self
    }

    /// Keeps types defined in files whose path matches `pattern`.
    #[must_use]
    pub fn with_source_location_to_keep_regex(mut self, pattern: Pattern) -> Self {
        self.source_location_to_keep_regex = Some(pattern);
        self
    }

    /// Adds a range where data member insertions are tolerated.
    #[must_use]
    pub fn with_insertion_range(mut self, range: OffsetRange) -> Self {
        self.insertion_ranges.push(range);
        self
    }

    /// Tolerates a value change of the enumerator `name`.
    #[must_use]
    pub fn with_changed_enumerator(mut self, name: impl Into<String>) -> Self {
        self.changed_enumerator_names.push(name.into());
        self
    }

    /// Returns the shared state.
    pub fn base(&self) -> &SuppressionBase {
        &self.base
    }

    /// Returns the exact type name, empty when unset.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the type name pattern.
    pub fn type_name_regex(&self) -> Option<&Pattern> {
        self.type_name_regex.as_ref()
    }

    /// Returns the negated type name pattern.
    pub fn type_name_not_regex(&self) -> Option<&Pattern> {
        self.type_name_not_regex.as_ref()
    }

    /// Returns the type kind restriction.
    pub fn type_kind(&self) -> Option<TypeKind> {
        self.type_kind
    }

    /// Returns the reach restriction.
    pub fn reach_kind(&self) -> Option<ReachKind> {
        self.reach_kind
    }

    /// Returns the paths whose types are kept.
    pub fn source_locations_to_keep(&self) -> &FxHashSet<String> {
        &self.source_locations_to_keep
    }

    /// Returns the pattern of paths whose types are kept.
    pub fn source_location_to_keep_regex(&self) -> Option<&Pattern> {
        self.source_location_to_keep_regex.as_ref()
    }

    /// Returns the tolerated insertion ranges.
    pub fn insertion_ranges(&self) -> &[OffsetRange] {
        &self.insertion_ranges
    }

    /// Returns the enumerators whose value changes are tolerated.
    pub fn changed_enumerator_names(&self) -> &[String] {
        &self.changed_enumerator_names
    }

    /// Returns `true` for the generated private-types suppression.
    pub fn is_private_type_suppression(&self) -> bool {
        self.base.label == PRIVATE_TYPES_LABEL
    }

    /// Returns `true` if any property that identifies types is set.
    ///
    /// A suppression without one never suppresses anything.
    pub fn has_identifying_criteria(&self) -> bool {
        self.has_name_criteria() || self.type_kind.is_some() || self.has_location_criteria()
    }

    fn has_name_criteria(&self) -> bool {
        !self.type_name.is_empty()
            || self.type_name_regex.is_some()
            || self.type_name_not_regex.is_some()
    }

    fn has_location_criteria(&self) -> bool {
        !self.source_locations_to_keep.is_empty() || self.source_location_to_keep_regex.is_some()
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Returns `true` if the name criteria select `name`.
    ///
    /// An exact name takes precedence over the patterns. Without name
    /// criteria every name is selected.
    pub fn matches_type_name(&self, name: &str) -> bool {
        if !self.type_name.is_empty() {
            return self.type_name == name;
        }
        matches_or_absent(self.type_name_regex.as_ref(), name)
            && misses_or_absent(self.type_name_not_regex.as_ref(), name)
    }

    /// Returns `true` unless `location` is in a kept source file.
    pub fn matches_location(&self, location: &Location) -> bool {
        if self
            .source_location_to_keep_regex
            .as_ref()
            .is_some_and(|p| p.is_match(location.path()))
        {
            return false;
        }
        !self.source_locations_to_keep.contains(location.base_name())
            && !self.source_locations_to_keep.contains(location.path())
    }

    /// Location check for a type known only by name.
    ///
    /// With no location, location criteria cannot be satisfied.
    fn matches_optional_location(&self, location: Option<&Location>) -> bool {
        match location {
            Some(location) => self.matches_location(location),
            None => !self.has_location_criteria(),
        }
    }

    fn matches_type_location(&self, ty: &Type) -> bool {
        if let Some(location) = ty.location() {
            return self.matches_location(location);
        }
        // An unlocated class or struct is opaque: not defined in any public
        // header. Unions are left to the location criteria.
        if self.base.is_artificial
            && ty.is_class_or_struct()
            && self.is_private_type_suppression()
        {
            return true;
        }
        !self.has_location_criteria()
    }

    /// Returns `true` if both the name and the location criteria select a type.
    pub fn matches_type_name_or_location(&self, name: &str, location: Option<&Location>) -> bool {
        self.has_identifying_criteria()
            && self.matches_type_name(name)
            && self.matches_optional_location(location)
    }

    /// Returns `true` if the suppression selects `ty`, compared within `ctxt`.
    pub fn suppresses_type(&self, ty: &Type, ctxt: Option<&DiffContext>) -> bool {
        if !self.has_identifying_criteria() || !self.base.binaries_match(ctxt) {
            return false;
        }
        if self.type_kind.is_some_and(|kind| !kind.matches(ty)) {
            return false;
        }
        self.matches_type_location(ty) && self.matches_type_name(&ty.name())
    }

    /// Returns `true` if the suppression hides the change carried by `diff`.
    ///
    /// A function declaration diff is considered when it changes a virtual
    /// member function: the change is then about the enclosing class.
    pub fn suppresses_diff(&self, diff: &Diff, ctxt: Option<&DiffContext>) -> bool {
        if !diff.is_type_diff() {
            return diff
                .as_function_decl_diff()
                .filter(|d| d.has_virtual_member_function_change())
                .and_then(|d| d.first().class_type())
                .is_some_and(|class| {
                    assert!(
                        class.as_class().is_some(),
                        "a member function is scoped in a class"
                    );
                    self.suppresses_type(class, ctxt)
                });
        }

        let d = match self.reach_kind {
            Some(reach) => match reach.reach(diff) {
                Some(d) => d,
                None => return false,
            },
            None => diff,
        };
        let Some((first, second)) = d.type_subjects() else {
            return false;
        };

        let mut d = d;
        if !self.suppresses_type(first, ctxt) && !self.suppresses_type(second, ctxt) {
            if self.is_private_type_suppression() {
                return false;
            }
            let (first, second) = (peel_typedef(first), peel_typedef(second));
            if !self.suppresses_type(&first, ctxt) && !self.suppresses_type(&second, ctxt) {
                return false;
            }
            d = d.peel_typedef();
        }

        if let Some(class_diff) = d.as_class_diff() {
            if !self.insertion_ranges.is_empty() && !self.insertions_are_tolerated(class_diff) {
                return false;
            }
        }
        if let Some(enum_diff) = d.as_enum_diff() {
            if !self.enumerator_changes_are_tolerated(enum_diff) {
                return false;
            }
        }
        true
    }

    /// Every inserted member must fall in a range, nothing may be deleted and
    /// the class may not shrink.
    fn insertions_are_tolerated(&self, diff: &ClassDiff) -> bool {
        let first = diff.first_class();
        if !diff.deleted_data_members().is_empty()
            || first.size_in_bits() > diff.second_class().size_in_bits()
        {
            return false;
        }

        diff.inserted_data_members().iter().all(|member| {
            let offset = member.offset_in_bits();
            let mut matched = false;
            for range in &self.insertion_ranges {
                let (Some(begin), Some(end)) = (range.begin().eval(first), range.end().eval(first))
                else {
                    break;
                };
                if begin == END && end == END {
                    // Appended after every member of the first version.
                    if first
                        .last_data_member()
                        .map(DataMember::offset_in_bits)
                        .is_none_or(|last| offset > last)
                    {
                        matched = true;
                    }
                    continue;
                }
                if begin <= end && (begin..=end).contains(&offset) {
                    matched = true;
                }
            }
            matched
        })
    }

    /// Value changes are tolerated only on listed enumerators, and only when
    /// no enumerator was deleted and the size is unchanged.
    fn enumerator_changes_are_tolerated(&self, diff: &EnumDiff) -> bool {
        let applies = diff.deleted_enumerators().is_empty()
            && diff.first_enum().size_in_bits() == diff.second_enum().size_in_bits()
            && !diff.changed_enumerators().is_empty();
        !applies
            || diff.changed_enumerators().iter().all(|(old, _)| {
                self.changed_enumerator_names
                    .iter()
                    .any(|name| name == old.name())
            })
    }
}
