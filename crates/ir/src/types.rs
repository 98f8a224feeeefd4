//! Type nodes.
//!
//! Types are immutable and shared through [`TypeRef`]. Composite types refer
//! to their parts by `TypeRef`, so a graph built by a reader is a DAG of
//! reference-counted nodes.

use std::sync::Arc;

use crate::location::Location;

/// Shared handle to a type node.
pub type TypeRef = Arc<Type>;

/// A type of the ABI model.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Type {
    /// A fundamental type such as `int`.
    Builtin(BuiltinType),
    /// A class, struct or union.
    Class(ClassType),
    /// An enumeration.
    Enum(EnumType),
    /// An array.
    Array(ArrayType),
    /// A typedef.
    Typedef(TypedefType),
    /// A pointer.
    Pointer(PointerType),
    /// An lvalue or rvalue reference.
    Reference(ReferenceType),
    /// A cv-qualified type.
    Qualified(QualifiedType),
    /// A function or method type.
    Function(FunctionType),
}

impl Type {
    /// Returns the fully qualified name, e.g. `ns::Foo`, `const char*`.
    pub fn name(&self) -> String {
        match self {
            Self::Builtin(t) => t.name.clone(),
            Self::Class(t) => scoped(t.scope.as_deref(), &t.name),
            Self::Enum(t) => scoped(t.scope.as_deref(), &t.name),
            Self::Typedef(t) => scoped(t.scope.as_deref(), &t.name),
            Self::Array(t) => match t.count {
                Some(n) => format!("{}[{n}]", t.element.name()),
                None => format!("{}[]", t.element.name()),
            },
            Self::Pointer(t) => format!("{}*", t.pointee.name()),
            Self::Reference(t) => {
                let sigil = if t.is_lvalue { "&" } else { "&&" };
                format!("{}{sigil}", t.referenced.name())
            }
            Self::Qualified(t) => {
                let mut out = String::new();
                if t.is_const {
                    out.push_str("const ");
                }
                if t.is_volatile {
                    out.push_str("volatile ");
                }
                out.push_str(&t.underlying.name());
                out
            }
            Self::Function(t) => {
                let ret = t
                    .return_type
                    .as_ref()
                    .map_or_else(|| "void".to_owned(), |r| r.name());
                let params: Vec<_> = t.parameters.iter().map(|p| p.ty.name()).collect();
                format!("{ret} ({})", params.join(", "))
            }
        }
    }

    /// Returns where the type was declared, when known.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Class(t) => t.location.as_ref(),
            Self::Enum(t) => t.location.as_ref(),
            Self::Typedef(t) => t.location.as_ref(),
            _ => None,
        }
    }

    /// Returns the size in bits.
    pub fn size_in_bits(&self) -> u64 {
        match self {
            Self::Builtin(t) => t.size_in_bits,
            Self::Class(t) => t.size_in_bits,
            Self::Enum(t) => t.size_in_bits,
            Self::Array(t) => t.element.size_in_bits() * t.count.unwrap_or(0),
            Self::Typedef(t) => t.underlying.size_in_bits(),
            Self::Pointer(t) => t.size_in_bits,
            Self::Reference(t) => t.size_in_bits,
            Self::Qualified(t) => t.underlying.size_in_bits(),
            Self::Function(_) => 0,
        }
    }

    /// Returns the class, struct or union behind this node.
    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            Self::Class(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the enum behind this node.
    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the function type behind this node.
    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Self::Function(t) => Some(t),
            _ => None,
        }
    }

    /// Returns `true` for classes and structs, but not unions.
    pub fn is_class_or_struct(&self) -> bool {
        self.as_class().is_some_and(|c| c.kind != ClassKind::Union)
    }

    /// Returns `true` for structs.
    pub fn is_struct(&self) -> bool {
        self.as_class().is_some_and(|c| c.kind == ClassKind::Struct)
    }

    /// Returns `true` for unions.
    pub fn is_union(&self) -> bool {
        self.as_class().is_some_and(|c| c.kind == ClassKind::Union)
    }
}

/// Follows typedefs until a non-typedef type is reached.
pub fn peel_typedef(ty: &TypeRef) -> TypeRef {
    let mut current = Arc::clone(ty);
    while let Type::Typedef(t) = current.as_ref() {
        let next = Arc::clone(&t.underlying);
        current = next;
    }
    current
}

pub(crate) fn scoped(scope: Option<&str>, name: &str) -> String {
    match scope {
        Some(scope) if !scope.is_empty() => format!("{scope}::{name}"),
        _ => name.to_owned(),
    }
}

/// A fundamental type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuiltinType {
    name: String,
    size_in_bits: u64,
}

impl BuiltinType {
    /// Creates a builtin type.
    #[must_use]
    pub fn new(name: impl Into<String>, size_in_bits: u64) -> Self {
        Self {
            name: name.into(),
            size_in_bits,
        }
    }
}

/// Which keyword introduced a class-like type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ClassKind {
    /// `class`
    Class,
    /// `struct`
    Struct,
    /// `union`
    Union,
}

/// A class, struct or union.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassType {
    kind: ClassKind,
    name: String,
    scope: Option<String>,
    size_in_bits: u64,
    location: Option<Location>,
    data_members: Vec<DataMember>,
}

impl ClassType {
    /// Creates an empty class-like type.
    #[must_use]
    pub fn new(kind: ClassKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            scope: None,
            size_in_bits: 0,
            location: None,
            data_members: Vec::new(),
        }
    }

    /// Sets the enclosing scope, e.g. `ns` or `ns::Outer`.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the size.
    #[must_use]
    pub fn with_size_in_bits(mut self, size: u64) -> Self {
        self.size_in_bits = size;
        self
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Appends a data member.
    #[must_use]
    pub fn with_data_member(mut self, member: DataMember) -> Self {
        self.data_members.push(member);
        self
    }

    /// Returns the keyword kind.
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Returns the unqualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the size in bits.
    pub fn size_in_bits(&self) -> u64 {
        self.size_in_bits
    }

    /// Returns the data members in declaration order.
    pub fn data_members(&self) -> &[DataMember] {
        &self.data_members
    }

    /// Returns the last data member in declaration order.
    pub fn last_data_member(&self) -> Option<&DataMember> {
        self.data_members.last()
    }
}

/// A non-static or static data member.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataMember {
    name: String,
    ty: TypeRef,
    offset_in_bits: u64,
    is_laid_out: bool,
}

impl DataMember {
    /// Creates a laid-out member at `offset_in_bits`.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef, offset_in_bits: u64) -> Self {
        Self {
            name: name.into(),
            ty,
            offset_in_bits,
            is_laid_out: true,
        }
    }

    /// Marks the member as not occupying storage in the object (static).
    #[must_use]
    pub fn not_laid_out(mut self) -> Self {
        self.is_laid_out = false;
        self
    }

    /// Returns the member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the member type.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Returns the offset from the start of the object.
    pub fn offset_in_bits(&self) -> u64 {
        self.offset_in_bits
    }

    /// Returns `true` when the member occupies storage in the object.
    pub fn is_laid_out(&self) -> bool {
        self.is_laid_out
    }
}

/// One named value of an enumeration.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Enumerator {
    name: String,
    value: i64,
}

impl Enumerator {
    /// Creates an enumerator.
    #[must_use]
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value.
    pub fn value(&self) -> i64 {
        self.value
    }
}

/// An enumeration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumType {
    name: String,
    scope: Option<String>,
    size_in_bits: u64,
    location: Option<Location>,
    enumerators: Vec<Enumerator>,
}

impl EnumType {
    /// Creates an enumeration with no enumerators.
    #[must_use]
    pub fn new(name: impl Into<String>, size_in_bits: u64) -> Self {
        Self {
            name: name.into(),
            scope: None,
            size_in_bits,
            location: None,
            enumerators: Vec::new(),
        }
    }

    /// Sets the enclosing scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Appends an enumerator.
    #[must_use]
    pub fn with_enumerator(mut self, name: impl Into<String>, value: i64) -> Self {
        self.enumerators.push(Enumerator::new(name, value));
        self
    }

    /// Returns the unqualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the size in bits.
    pub fn size_in_bits(&self) -> u64 {
        self.size_in_bits
    }

    /// Returns the enumerators in declaration order.
    pub fn enumerators(&self) -> &[Enumerator] {
        &self.enumerators
    }
}

/// An array of `count` elements, or of unknown bound.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArrayType {
    element: TypeRef,
    count: Option<u64>,
}

impl ArrayType {
    /// Creates an array type.
    #[must_use]
    pub fn new(element: TypeRef, count: Option<u64>) -> Self {
        Self { element, count }
    }

    /// Returns the element type.
    pub fn element(&self) -> &TypeRef {
        &self.element
    }
}

/// A typedef.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypedefType {
    name: String,
    scope: Option<String>,
    underlying: TypeRef,
    location: Option<Location>,
}

impl TypedefType {
    /// Creates a typedef of `underlying`.
    #[must_use]
    pub fn new(name: impl Into<String>, underlying: TypeRef) -> Self {
        Self {
            name: name.into(),
            scope: None,
            underlying,
            location: None,
        }
    }

    /// Sets the enclosing scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Returns the aliased type.
    pub fn underlying(&self) -> &TypeRef {
        &self.underlying
    }
}

/// A pointer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PointerType {
    pointee: TypeRef,
    size_in_bits: u64,
}

impl PointerType {
    /// Creates a pointer to `pointee`.
    #[must_use]
    pub fn new(pointee: TypeRef, size_in_bits: u64) -> Self {
        Self {
            pointee,
            size_in_bits,
        }
    }

    /// Returns the pointed-to type.
    pub fn pointee(&self) -> &TypeRef {
        &self.pointee
    }
}

/// A reference.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferenceType {
    referenced: TypeRef,
    is_lvalue: bool,
    size_in_bits: u64,
}

impl ReferenceType {
    /// Creates an lvalue (`&`) or rvalue (`&&`) reference.
    #[must_use]
    pub fn new(referenced: TypeRef, is_lvalue: bool, size_in_bits: u64) -> Self {
        Self {
            referenced,
            is_lvalue,
            size_in_bits,
        }
    }

    /// Returns the referenced type.
    pub fn referenced(&self) -> &TypeRef {
        &self.referenced
    }
}

/// A `const` and/or `volatile` qualified type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QualifiedType {
    underlying: TypeRef,
    is_const: bool,
    is_volatile: bool,
}

impl QualifiedType {
    /// Creates `const underlying`.
    #[must_use]
    pub fn constant(underlying: TypeRef) -> Self {
        Self {
            underlying,
            is_const: true,
            is_volatile: false,
        }
    }

    /// Creates `volatile underlying`.
    #[must_use]
    pub fn volatile(underlying: TypeRef) -> Self {
        Self {
            underlying,
            is_const: false,
            is_volatile: true,
        }
    }

    /// Returns the unqualified type.
    pub fn underlying(&self) -> &TypeRef {
        &self.underlying
    }
}

/// A function parameter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameter {
    name: String,
    ty: TypeRef,
    is_artificial: bool,
}

impl Parameter {
    /// Creates a parameter written in the source.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            is_artificial: false,
        }
    }

    /// Creates a compiler-generated parameter such as `this`.
    #[must_use]
    pub fn artificial(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            is_artificial: true,
            ..Self::new(name, ty)
        }
    }

    /// Returns the parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter type.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Returns `true` for compiler-generated parameters.
    pub fn is_artificial(&self) -> bool {
        self.is_artificial
    }
}

/// A function type, or a method type when `class_type` is set.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FunctionType {
    return_type: Option<TypeRef>,
    parameters: Vec<Parameter>,
    class_type: Option<TypeRef>,
}

impl FunctionType {
    /// Creates a function type returning `return_type` (`None` for `void`).
    #[must_use]
    pub fn new(return_type: Option<TypeRef>) -> Self {
        Self {
            return_type,
            parameters: Vec::new(),
            class_type: None,
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Makes this a method type of `class_type`.
    #[must_use]
    pub fn with_class_type(mut self, class_type: TypeRef) -> Self {
        self.class_type = Some(class_type);
        self
    }

    /// Returns the return type, `None` for `void`.
    pub fn return_type(&self) -> Option<&TypeRef> {
        self.return_type.as_ref()
    }

    /// Returns every parameter, including an implicit `this`.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns the enclosing class of a method type.
    pub fn class_type(&self) -> Option<&TypeRef> {
        self.class_type.as_ref()
    }

    /// Returns the parameter at `index`, counting from the first parameter
    /// that is not an implicit leading `this`.
    pub fn parameter_from_first_non_implicit(&self, index: usize) -> Option<&Parameter> {
        let skip = usize::from(self.parameters.first().is_some_and(Parameter::is_artificial));
        self.parameters.get(index.checked_add(skip)?)
    }
}
