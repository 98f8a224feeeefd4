//! Diff nodes.
//!
//! A diff node pairs the two versions of an artifact. Wrapper kinds
//! (pointer, reference, qualified, typedef, array) own the diff of the type
//! they wrap, so a diff tree is finite and acyclic by construction.

use crate::decls::{FunctionDecl, VarDecl};
use crate::types::{ClassType, DataMember, EnumType, Enumerator, TypeRef};

/// Path and SONAME of one compared binary.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorpusInfo {
    path: String,
    soname: String,
}

impl CorpusInfo {
    /// Creates a corpus description.
    #[must_use]
    pub fn new(path: impl Into<String>, soname: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            soname: soname.into(),
        }
    }

    /// Returns the path of the binary.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the SONAME, empty when the binary has none.
    pub fn soname(&self) -> &str {
        &self.soname
    }
}

/// The two binaries under comparison.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiffContext {
    first: CorpusInfo,
    second: CorpusInfo,
}

impl DiffContext {
    /// Creates a context comparing `first` against `second`.
    #[must_use]
    pub fn new(first: CorpusInfo, second: CorpusInfo) -> Self {
        Self { first, second }
    }

    /// Returns the old binary.
    pub fn first(&self) -> &CorpusInfo {
        &self.first
    }

    /// Returns the new binary.
    pub fn second(&self) -> &CorpusInfo {
        &self.second
    }
}

/// A node of the diff tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Diff {
    /// Two versions of a class, struct or union.
    Class(ClassDiff),
    /// Two versions of an enum.
    Enum(EnumDiff),
    /// Two pointer types and the diff of their pointees.
    Pointer(WrapperDiff),
    /// Two reference types and the diff of their referenced types.
    Reference(WrapperDiff),
    /// Two qualified types and the diff of their unqualified types.
    Qualified(WrapperDiff),
    /// Two typedefs and the diff of their underlying types.
    Typedef(WrapperDiff),
    /// Two array types and the diff of their element types.
    Array(WrapperDiff),
    /// Two builtin types.
    Base(TypePair),
    /// Two artifacts of different kinds.
    Distinct(TypePair),
    /// Two versions of a function declaration.
    FunctionDecl(FunctionDeclDiff),
    /// Two versions of a variable declaration.
    Var(VarDiff),
}

impl Diff {
    /// Returns `true` for nodes comparing two types of the same kind.
    pub fn is_type_diff(&self) -> bool {
        !matches!(self, Self::Distinct(_) | Self::FunctionDecl(_) | Self::Var(_))
    }

    /// Returns the compared types of a type diff.
    pub fn type_subjects(&self) -> Option<(&TypeRef, &TypeRef)> {
        match self {
            Self::Class(d) => Some((&d.first, &d.second)),
            Self::Enum(d) => Some((&d.first, &d.second)),
            Self::Pointer(d)
            | Self::Reference(d)
            | Self::Qualified(d)
            | Self::Typedef(d)
            | Self::Array(d) => Some((&d.first, &d.second)),
            Self::Base(d) => Some((&d.first, &d.second)),
            Self::Distinct(_) | Self::FunctionDecl(_) | Self::Var(_) => None,
        }
    }

    /// Returns the diff wrapped by a pointer, reference, qualified,
    /// typedef or array diff.
    pub fn underlying(&self) -> Option<&Self> {
        match self {
            Self::Pointer(d)
            | Self::Reference(d)
            | Self::Qualified(d)
            | Self::Typedef(d)
            | Self::Array(d) => Some(&d.underlying),
            _ => None,
        }
    }

    /// Strips qualified-type diffs.
    pub fn peel_qualified(&self) -> &Self {
        let mut current = self;
        while let Self::Qualified(d) = current {
            current = &d.underlying;
        }
        current
    }

    /// Strips typedef diffs.
    pub fn peel_typedef(&self) -> &Self {
        let mut current = self;
        while let Self::Typedef(d) = current {
            current = &d.underlying;
        }
        current
    }

    /// Returns the class diff behind this node.
    pub fn as_class_diff(&self) -> Option<&ClassDiff> {
        match self {
            Self::Class(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the enum diff behind this node.
    pub fn as_enum_diff(&self) -> Option<&EnumDiff> {
        match self {
            Self::Enum(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the function declaration diff behind this node.
    pub fn as_function_decl_diff(&self) -> Option<&FunctionDeclDiff> {
        match self {
            Self::FunctionDecl(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the variable diff behind this node.
    pub fn as_var_diff(&self) -> Option<&VarDiff> {
        match self {
            Self::Var(d) => Some(d),
            _ => None,
        }
    }
}

/// Two compared types with no further structure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypePair {
    first: TypeRef,
    second: TypeRef,
}

impl TypePair {
    /// Pairs `first` with `second`.
    #[must_use]
    pub fn new(first: TypeRef, second: TypeRef) -> Self {
        Self { first, second }
    }

    /// Returns the old type.
    pub fn first(&self) -> &TypeRef {
        &self.first
    }

    /// Returns the new type.
    pub fn second(&self) -> &TypeRef {
        &self.second
    }
}

/// Two wrapper types and the diff of what they wrap.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WrapperDiff {
    first: TypeRef,
    second: TypeRef,
    underlying: Box<Diff>,
}

impl WrapperDiff {
    /// Creates a wrapper diff.
    #[must_use]
    pub fn new(first: TypeRef, second: TypeRef, underlying: Diff) -> Self {
        Self {
            first,
            second,
            underlying: Box::new(underlying),
        }
    }

    /// Returns the old type.
    pub fn first(&self) -> &TypeRef {
        &self.first
    }

    /// Returns the new type.
    pub fn second(&self) -> &TypeRef {
        &self.second
    }

    /// Returns the diff of the wrapped types.
    pub fn underlying(&self) -> &Diff {
        &self.underlying
    }
}

/// Two versions of a class-like type and their data member changes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassDiff {
    first: TypeRef,
    second: TypeRef,
    inserted_data_members: Vec<DataMember>,
    deleted_data_members: Vec<DataMember>,
    changed_data_members: Vec<(DataMember, DataMember)>,
}

impl ClassDiff {
    /// Creates a class diff with no member changes.
    ///
    /// # Panics
    ///
    /// Panics if either type is not a class, struct or union.
    #[must_use]
    pub fn new(first: TypeRef, second: TypeRef) -> Self {
        assert!(
            first.as_class().is_some() && second.as_class().is_some(),
            "class diff subjects must be class types"
        );
        Self {
            first,
            second,
            inserted_data_members: Vec::new(),
            deleted_data_members: Vec::new(),
            changed_data_members: Vec::new(),
        }
    }

    /// Records a member present only in the new version.
    #[must_use]
    pub fn with_inserted_data_member(mut self, member: DataMember) -> Self {
        self.inserted_data_members.push(member);
        self
    }

    /// Records a member present only in the old version.
    #[must_use]
    pub fn with_deleted_data_member(mut self, member: DataMember) -> Self {
        self.deleted_data_members.push(member);
        self
    }

    /// Records a member whose type or offset changed.
    #[must_use]
    pub fn with_changed_data_member(mut self, old: DataMember, new: DataMember) -> Self {
        self.changed_data_members.push((old, new));
        self
    }

    /// Returns the old class.
    pub fn first_class(&self) -> &ClassType {
        class_of(&self.first)
    }

    /// Returns the new class.
    pub fn second_class(&self) -> &ClassType {
        class_of(&self.second)
    }

    /// Returns members present only in the new version.
    pub fn inserted_data_members(&self) -> &[DataMember] {
        &self.inserted_data_members
    }

    /// Returns members present only in the old version.
    pub fn deleted_data_members(&self) -> &[DataMember] {
        &self.deleted_data_members
    }

    /// Returns `(old, new)` pairs of changed members.
    pub fn changed_data_members(&self) -> &[(DataMember, DataMember)] {
        &self.changed_data_members
    }
}

fn class_of(ty: &TypeRef) -> &ClassType {
    match ty.as_class() {
        Some(class) => class,
        None => unreachable!("checked in ClassDiff::new"),
    }
}

fn enum_of(ty: &TypeRef) -> &EnumType {
    match ty.as_enum() {
        Some(e) => e,
        None => unreachable!("checked in EnumDiff::new"),
    }
}

/// Two versions of an enum and their enumerator changes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumDiff {
    first: TypeRef,
    second: TypeRef,
    deleted_enumerators: Vec<Enumerator>,
    inserted_enumerators: Vec<Enumerator>,
    changed_enumerators: Vec<(Enumerator, Enumerator)>,
}

impl EnumDiff {
    /// Compares the enumerators of two enums by name.
    ///
    /// # Panics
    ///
    /// Panics if either type is not an enum.
    #[must_use]
    pub fn new(first: TypeRef, second: TypeRef) -> Self {
        assert!(
            first.as_enum().is_some() && second.as_enum().is_some(),
            "enum diff subjects must be enum types"
        );
        let old = enum_of(&first).enumerators();
        let new = enum_of(&second).enumerators();

        let find = |list: &[Enumerator], name: &str| {
            list.iter().find(|e| e.name() == name).cloned()
        };

        let mut deleted_enumerators = Vec::new();
        let mut changed_enumerators = Vec::new();
        for e in old {
            match find(new, e.name()) {
                None => deleted_enumerators.push(e.clone()),
                Some(n) if n.value() != e.value() => changed_enumerators.push((e.clone(), n)),
                Some(_) => {}
            }
        }
        let inserted_enumerators = new
            .iter()
            .filter(|e| find(old, e.name()).is_none())
            .cloned()
            .collect();

        Self {
            first,
            second,
            deleted_enumerators,
            inserted_enumerators,
            changed_enumerators,
        }
    }

    /// Returns the old enum.
    pub fn first_enum(&self) -> &EnumType {
        enum_of(&self.first)
    }

    /// Returns the new enum.
    pub fn second_enum(&self) -> &EnumType {
        enum_of(&self.second)
    }

    /// Returns enumerators present only in the old version.
    pub fn deleted_enumerators(&self) -> &[Enumerator] {
        &self.deleted_enumerators
    }

    /// Returns enumerators present only in the new version.
    pub fn inserted_enumerators(&self) -> &[Enumerator] {
        &self.inserted_enumerators
    }

    /// Returns `(old, new)` pairs of enumerators whose value changed.
    pub fn changed_enumerators(&self) -> &[(Enumerator, Enumerator)] {
        &self.changed_enumerators
    }
}

/// Two versions of a function declaration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionDeclDiff {
    first: FunctionDecl,
    second: FunctionDecl,
}

impl FunctionDeclDiff {
    /// Pairs two declarations.
    #[must_use]
    pub fn new(first: FunctionDecl, second: FunctionDecl) -> Self {
        Self { first, second }
    }

    /// Returns the old declaration.
    pub fn first(&self) -> &FunctionDecl {
        &self.first
    }

    /// Returns the new declaration.
    pub fn second(&self) -> &FunctionDecl {
        &self.second
    }

    /// Returns `true` when both sides are member functions, at least one is
    /// virtual, and the virtuality or the vtable slot differs.
    pub fn has_virtual_member_function_change(&self) -> bool {
        let (f, s) = (&self.first, &self.second);
        if !f.is_member_function() || !s.is_member_function() {
            return false;
        }
        if !f.is_virtual() && !s.is_virtual() {
            return false;
        }
        f.is_virtual() != s.is_virtual() || f.vtable_offset() != s.vtable_offset()
    }
}

/// Two versions of a variable declaration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VarDiff {
    first: VarDecl,
    second: VarDecl,
}

impl VarDiff {
    /// Pairs two declarations.
    #[must_use]
    pub fn new(first: VarDecl, second: VarDecl) -> Self {
        Self { first, second }
    }

    /// Returns the old declaration.
    pub fn first(&self) -> &VarDecl {
        &self.first
    }

    /// Returns the new declaration.
    pub fn second(&self) -> &VarDecl {
        &self.second
    }
}
